mod common;

use anyhow::Result;
use chrono::Duration;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    // We consider OK or SERVICE_UNAVAILABLE acceptable as a basic liveness check
    assert!(
        res.status() == StatusCode::OK || res.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        res.status()
    );

    // Should be valid JSON
    let _body = res.json::<serde_json::Value>().await?;
    Ok(())
}

#[tokio::test]
async fn missing_header_yields_401() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/usr_nobody/tasks", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert!(
        body["message"].as_str().unwrap_or("").contains("authorization header"),
        "unexpected message: {}",
        body
    );
    Ok(())
}

#[tokio::test]
async fn malformed_headers_yield_401() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for value in ["Token abc", "Bearer", "Bearer a b"] {
        let res = client
            .get(format!("{}/usr_nobody/tasks", server.base_url))
            .header("Authorization", value)
            .send()
            .await?;

        assert_eq!(
            res.status(),
            StatusCode::UNAUTHORIZED,
            "header value: {value:?}"
        );

        let body = res.json::<serde_json::Value>().await?;
        assert!(
            body["message"].as_str().unwrap_or("").contains("Bearer"),
            "unexpected message: {}",
            body
        );
    }
    Ok(())
}

#[tokio::test]
async fn unknown_token_yields_401_with_invalid_reason() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/usr_nobody/tasks", server.base_url))
        .header("Authorization", "Bearer tok_does_not_exist")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Invalid session token");
    Ok(())
}

#[tokio::test]
async fn expired_token_yields_401_with_expiry_reason() -> Result<()> {
    let server = common::ensure_server().await?;
    let pool = common::db_pool().await?;
    let client = reqwest::Client::new();

    let user_id = common::unique_user_id();
    let token = common::seed_session(&pool, &user_id, Duration::hours(-1)).await?;

    let res = client
        .get(format!("{}/{}/tasks", server.base_url, user_id))
        .header("Authorization", common::bearer(&token))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Session has expired");
    Ok(())
}

#[tokio::test]
async fn valid_token_passes_authentication() -> Result<()> {
    let server = common::ensure_server().await?;
    let pool = common::db_pool().await?;
    let client = reqwest::Client::new();

    let user_id = common::unique_user_id();
    let token = common::seed_session(&pool, &user_id, Duration::hours(1)).await?;

    let res = client
        .get(format!("{}/{}/tasks", server.base_url, user_id))
        .header("Authorization", common::bearer(&token))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert!(body.is_array(), "expected a task list, got: {}", body);
    Ok(())
}

#[tokio::test]
async fn bearer_scheme_is_case_insensitive() -> Result<()> {
    let server = common::ensure_server().await?;
    let pool = common::db_pool().await?;
    let client = reqwest::Client::new();

    let user_id = common::unique_user_id();
    let token = common::seed_session(&pool, &user_id, Duration::hours(1)).await?;

    let res = client
        .get(format!("{}/{}/tasks", server.base_url, user_id))
        .header("Authorization", format!("bearer {}", token))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn debug_check_token_echoes_header_shape() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/debug/check-token", server.base_url))
        .header("Authorization", "Bearer abc.def.ghi")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["parts_count"], 2);
    assert_eq!(body["token"], "abc.def.ghi");
    assert_eq!(body["token_segments"], 3);
    Ok(())
}
