use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::session::SessionRecord;
use crate::database::DatabaseError;
use crate::session::SessionLookup;

/// Session store backed by the shared `session` table
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionLookup for PgSessionStore {
    async fn find_session_by_token(
        &self,
        token: &str,
    ) -> Result<Option<SessionRecord>, DatabaseError> {
        let record = sqlx::query_as::<_, SessionRecord>(
            r#"
            SELECT token, "userId", "expiresAt"
            FROM session
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
