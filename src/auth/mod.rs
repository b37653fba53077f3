use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried by legacy HS256 tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Token has expired")]
    Expired,

    #[error("Token missing user ID (sub claim)")]
    MissingSubject,

    #[error("Invalid authentication token: {0}")]
    Invalid(String),
}

/// Legacy self-contained token verification over the shared secret.
///
/// The routing layer validates sessions by table lookup instead; this decoder
/// is retained for deployments that still mint HS256 tokens. Returns the user
/// id from the `sub` claim.
pub fn decode_jwt(token: &str, secret: &str) -> Result<String, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Invalid(e.to_string()),
    })?;

    data.claims.sub.ok_or(JwtError::MissingSubject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn sign(claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn claims(sub: Option<&str>, ttl: Duration) -> Claims {
        let now = Utc::now();
        Claims {
            sub: sub.map(str::to_string),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }

    #[test]
    fn valid_token_resolves_subject() {
        let token = sign(&claims(Some("usr_1"), Duration::hours(1)));
        assert_eq!(decode_jwt(&token, SECRET), Ok("usr_1".to_string()));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = sign(&claims(Some("usr_1"), Duration::hours(-1)));
        assert_eq!(decode_jwt(&token, SECRET), Err(JwtError::Expired));
    }

    #[test]
    fn missing_subject_is_rejected() {
        let token = sign(&claims(None, Duration::hours(1)));
        assert_eq!(decode_jwt(&token, SECRET), Err(JwtError::MissingSubject));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign(&claims(Some("usr_1"), Duration::hours(1)));
        assert!(matches!(
            decode_jwt(&token, "other-secret"),
            Err(JwtError::Invalid(_))
        ));
    }
}
