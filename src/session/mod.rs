use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use chrono::Utc;
use thiserror::Error;

use crate::database::models::session::SessionRecord;
use crate::database::DatabaseError;

/// Session authentication failures. Every variant maps to a 401 at the HTTP
/// boundary; the message carries the reason.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingHeader,

    #[error("Invalid authorization header format. Expected 'Bearer <token>'")]
    MalformedHeader,

    #[error("Invalid session token")]
    InvalidToken,

    #[error("Session has expired")]
    Expired,

    #[error("Session validation failed")]
    ValidationFailed,
}

/// Extract the bearer token from an Authorization header.
///
/// The header value must be exactly two whitespace-separated parts with a
/// case-insensitive `Bearer` scheme.
pub fn parse_bearer_header(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?;

    let value = header.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => Ok(*token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Storage-access capability for session lookup. The production
/// implementation queries the externally-populated `session` table; tests
/// inject in-memory doubles.
#[async_trait]
pub trait SessionLookup: Send + Sync {
    async fn find_session_by_token(
        &self,
        token: &str,
    ) -> Result<Option<SessionRecord>, DatabaseError>;
}

/// Validates opaque session tokens against the session store.
///
/// Read-only: a successful validation never renews or touches the session
/// record.
pub struct SessionValidator<S> {
    store: S,
}

impl<S: SessionLookup> SessionValidator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Resolve a token to its owning user id.
    ///
    /// Unexpected store failures collapse into `ValidationFailed` so callers
    /// can always map the outcome to a 401 rather than a server error.
    pub async fn validate(&self, token: &str) -> Result<String, AuthError> {
        let record = self
            .store
            .find_session_by_token(token)
            .await
            .map_err(|e| {
                tracing::error!("Session lookup failed: {}", e);
                AuthError::ValidationFailed
            })?
            .ok_or(AuthError::InvalidToken)?;

        // A session is valid only while the current time is before its expiry
        if record.expires_at <= Utc::now() {
            return Err(AuthError::Expired);
        }

        Ok(record.user_id)
    }
}
