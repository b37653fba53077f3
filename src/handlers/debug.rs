use axum::{http::HeaderMap, response::IntoResponse, Json};
use serde_json::json;

/// GET /debug/check-token - inspect the shape of the Authorization header
/// without validating it. Useful when the frontend and the auth issuer
/// disagree about what is being sent.
pub async fn check_token(headers: HeaderMap) -> impl IntoResponse {
    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok());

    let Some(header) = authorization else {
        return Json(json!({
            "error": "No authorization header provided",
            "authorization": null,
        }));
    };

    let parts: Vec<&str> = header.split_whitespace().collect();
    let token = parts.get(1).copied();

    Json(json!({
        "full_header": header,
        "parts_count": parts.len(),
        "parts": parts,
        "token": token,
        "token_length": token.map(str::len).unwrap_or(0),
        "token_segments": token.map(|t| t.split('.').count()).unwrap_or(0),
    }))
}
