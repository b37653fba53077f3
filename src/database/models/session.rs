use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the externally-populated `session` table. The auth issuer writes
/// camel-case column names; this system only ever reads them.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRecord {
    pub token: String,
    #[sqlx(rename = "userId")]
    pub user_id: String,
    #[sqlx(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}
