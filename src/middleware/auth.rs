use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::database::sessions::PgSessionStore;
use crate::error::ApiError;
use crate::session::{parse_bearer_header, SessionValidator};
use crate::state::AppState;

/// Authenticated user context resolved from the session table
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: String,
}

/// Session authentication middleware guarding every resource-scoped route.
///
/// Extracts the bearer token, resolves it against the session store, and
/// injects the owning user id into the request. Any failure short-circuits
/// with a 401 before a handler runs.
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = parse_bearer_header(request.headers())?.to_string();

    let validator = SessionValidator::new(PgSessionStore::new(state.pool.clone()));
    let user_id = validator.validate(&token).await?;

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}
