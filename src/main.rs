use anyhow::Context;
use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use todo_api_rust::config::AppConfig;
use todo_api_rust::database;
use todo_api_rust::handlers::{debug, tasks};
use todo_api_rust::middleware::session_auth_middleware;
use todo_api_rust::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH_SECRET, etc.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Todo API in {:?} mode", config.environment);

    let pool = database::connect(&config)
        .await
        .context("failed to connect to database")?;

    let cors = cors_layer(&config)?;
    let bind_addr = config.bind_addr();
    let state = AppState::new(pool, config);

    let app = app(state, cors);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    println!("Todo API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}

fn app(state: AppState, cors: CorsLayer) -> Router {
    // Every task route sits behind session authentication; the handlers run
    // the ownership check against the path user id themselves.
    let task_routes = Router::new()
        .route(
            "/:user_id/tasks",
            get(tasks::list_tasks).post(tasks::create_task),
        )
        .route(
            "/:user_id/tasks/:task_id",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route(
            "/:user_id/tasks/:task_id/complete",
            patch(tasks::toggle_task_completion),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_auth_middleware,
        ));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/debug/check-token", get(debug::check_token))
        // Resource-scoped, authenticated
        .merge(task_routes)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Browser access is limited to the configured frontend origin. Credentials
/// are allowed, so the origin and header lists must stay explicit.
fn cors_layer(config: &AppConfig) -> anyhow::Result<CorsLayer> {
    let origin = config
        .frontend_url
        .parse::<HeaderValue>()
        .with_context(|| format!("invalid FRONTEND_URL: {}", config.frontend_url))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true))
}

async fn root(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Todo API (Rust)",
        "version": version,
        "description": "Multi-tenant task backend with delegated session authentication",
        "environment": state.config.environment,
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "debug": "/debug/check-token (public)",
            "tasks": "/:user_id/tasks[/:task_id] (bearer token required)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
