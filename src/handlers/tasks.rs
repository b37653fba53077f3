use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::access;
use crate::database::models::task::Task;
use crate::database::tasks::TaskRepository;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::schemas::task::{TaskCreate, TaskUpdate};
use crate::state::AppState;

/// GET /:user_id/tasks - list the user's tasks, most recent first
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    access::authorize(&auth.user_id, &user_id)?;

    let tasks = TaskRepository::new(state.pool.clone()).list(&user_id).await?;
    Ok(Json(tasks))
}

/// POST /:user_id/tasks - create a task
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<String>,
    Json(body): Json<TaskCreate>,
) -> Result<impl IntoResponse, ApiError> {
    access::authorize(&auth.user_id, &user_id)?;

    let new_task = body.validate()?;
    let task = TaskRepository::new(state.pool.clone())
        .create(&user_id, new_task)
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /:user_id/tasks/:task_id - fetch a single task
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((user_id, task_id)): Path<(String, i64)>,
) -> Result<Json<Task>, ApiError> {
    access::authorize(&auth.user_id, &user_id)?;

    let task = TaskRepository::new(state.pool.clone())
        .get(&user_id, task_id)
        .await?;
    Ok(Json(task))
}

/// PUT /:user_id/tasks/:task_id - partial update; omitted fields are
/// preserved
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((user_id, task_id)): Path<(String, i64)>,
    Json(body): Json<TaskUpdate>,
) -> Result<Json<Task>, ApiError> {
    access::authorize(&auth.user_id, &user_id)?;

    let patch = body.validate()?;
    let task = TaskRepository::new(state.pool.clone())
        .update(&user_id, task_id, patch)
        .await?;

    Ok(Json(task))
}

/// DELETE /:user_id/tasks/:task_id - hard delete
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((user_id, task_id)): Path<(String, i64)>,
) -> Result<StatusCode, ApiError> {
    access::authorize(&auth.user_id, &user_id)?;

    TaskRepository::new(state.pool.clone())
        .delete(&user_id, task_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /:user_id/tasks/:task_id/complete - flip completion status
pub async fn toggle_task_completion(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((user_id, task_id)): Path<(String, i64)>,
) -> Result<Json<Task>, ApiError> {
    access::authorize(&auth.user_id, &user_id)?;

    let task = TaskRepository::new(state.pool.clone())
        .toggle_completion(&user_id, task_id)
        .await?;

    Ok(Json(task))
}
