use chrono::Utc;
use sqlx::PgPool;

use crate::database::models::task::Task;
use crate::database::DatabaseError;
use crate::schemas::task::{NewTask, TaskPatch};

const TASK_COLUMNS: &str = "id, user_id, title, description, is_completed, created_at, updated_at";

/// CRUD over the `tasks` table. Every query is scoped by user id, so a task
/// owned by a different user is indistinguishable from a missing one.
/// Mutations run inside a transaction: committed on success, rolled back on
/// any failure before the response is sent.
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All tasks owned by `user_id`, most recent first
    pub async fn list(&self, user_id: &str) -> Result<Vec<Task>, DatabaseError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Persist a pre-validated task and return the full record
    pub async fn create(&self, user_id: &str, task: NewTask) -> Result<Task, DatabaseError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (user_id, title, description, is_completed, created_at, updated_at) \
             VALUES ($1, $2, $3, false, $4, $4) \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    pub async fn get(&self, user_id: &str, task_id: i64) -> Result<Task, DatabaseError> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2"
        ))
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Task not found".to_string()))
    }

    /// Partial update: absent patch fields keep their stored values via
    /// COALESCE. `updated_at` is refreshed on every successful call, an empty
    /// patch included.
    pub async fn update(
        &self,
        user_id: &str,
        task_id: i64,
        patch: TaskPatch,
    ) -> Result<Task, DatabaseError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks \
             SET title = COALESCE($3, title), \
                 description = COALESCE($4, description), \
                 updated_at = $5 \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task_id)
        .bind(user_id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        match updated {
            Some(task) => {
                tx.commit().await?;
                Ok(task)
            }
            None => {
                tx.rollback().await?;
                Err(DatabaseError::NotFound("Task not found".to_string()))
            }
        }
    }

    /// Hard delete. Deleting an id that no longer exists yields NotFound,
    /// never an error.
    pub async fn delete(&self, user_id: &str, task_id: i64) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DatabaseError::NotFound("Task not found".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Flip completion status and refresh `updated_at`
    pub async fn toggle_completion(
        &self,
        user_id: &str,
        task_id: i64,
    ) -> Result<Task, DatabaseError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let toggled = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks \
             SET is_completed = NOT is_completed, updated_at = $3 \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task_id)
        .bind(user_id)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        match toggled {
            Some(task) => {
                tx.commit().await?;
                Ok(task)
            }
            None => {
                tx.rollback().await?;
                Err(DatabaseError::NotFound("Task not found".to_string()))
            }
        }
    }
}
