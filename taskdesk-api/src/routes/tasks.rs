/// Task endpoints
///
/// - `POST /tasks/?user_id=` - create a task for a user
/// - `GET /tasks/` - list every task
/// - `GET /tasks/user/:user_id` - list one user's tasks
/// - `GET /tasks/:task_id?user_id=` - fetch a task
/// - `PUT /tasks/:task_id?user_id=` - change a task's status
/// - `DELETE /tasks/:task_id?user_id=` - delete a cancelled task
///
/// # Ownership
///
/// Single-task endpoints take the caller's `user_id` and answer
/// `404 Task not found or unauthorized` both when the task does not exist and
/// when it belongs to someone else, so callers cannot probe for other users'
/// task IDs.
///
/// # Lifecycle
///
/// `title` and `description` are fixed at creation. An update may repeat
/// them but not change them. Only tasks in `cancelled` status can be deleted.
///
/// Update and delete run in one transaction with the task row locked, so the
/// ownership check, the rule checks and the write all see the same row. The
/// transaction rolls back on drop if the handler returns early.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{AppJson, AppPath, AppQuery, OwnerQuery, Pagination},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskdesk_shared::{
    models::{
        task::{CreateTask, Task},
        user::User,
    },
    validation::{validate_task_data, validate_task_update, NewTask, TaskChanges},
};
use uuid::Uuid;

/// Delete task response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTaskResponse {
    /// Deleted task ID
    pub task_id: Uuid,

    /// Always true on success
    pub deleted: bool,

    /// Descriptive message
    pub message: String,
}

/// Keeps `task` only if `user_id` owns it
///
/// A missing task and a foreign task produce the same error.
fn owned_task(task: Option<Task>, task_id: Uuid, user_id: Uuid) -> ApiResult<Task> {
    match task {
        Some(task) if task.is_owned_by(user_id) => Ok(task),
        Some(_) => {
            tracing::warn!(task_id = %task_id, user_id = %user_id, "Task belongs to another user");
            Err(ApiError::task_not_found())
        }
        None => {
            tracing::debug!(task_id = %task_id, user_id = %user_id, "Task does not exist");
            Err(ApiError::task_not_found())
        }
    }
}

/// Fails unless the task has reached its terminal `cancelled` status
fn ensure_deletable(task: &Task) -> ApiResult<()> {
    if !task.is_deletable() {
        return Err(ApiError::BadRequest(format!(
            "Only cancelled tasks can be deleted (current status: {})",
            task.status
        )));
    }
    Ok(())
}

async fn require_user(state: &AppState, user_id: Uuid) -> ApiResult<User> {
    User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// Create a task for `user_id`
///
/// # Endpoint
///
/// ```text
/// POST /tasks/?user_id=<uuid>
/// Content-Type: application/json
///
/// { "title": "Buy milk", "description": "2 litres", "status": "pending" }
/// ```
///
/// `description` and `status` are optional; status defaults to `pending`.
///
/// # Errors
///
/// - `400 Bad Request`: empty title, description over 500 characters,
///   unknown status
/// - `404 Not Found`: no such user
pub async fn create_task(
    State(state): State<AppState>,
    AppQuery(owner): AppQuery<OwnerQuery>,
    AppJson(req): AppJson<NewTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let status = validate_task_data(&req)?;
    require_user(&state, owner.user_id).await?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            status,
            owner_id: Some(owner.user_id),
        },
    )
    .await?;

    tracing::info!(
        task_id = %task.id,
        user_id = %owner.user_id,
        status = %task.status,
        "Task created"
    );

    Ok((StatusCode::CREATED, Json(task)))
}

/// List every task with `?skip=&limit=`
pub async fn list_tasks(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Pagination>,
) -> ApiResult<Json<Vec<Task>>> {
    let page = page.validate()?;
    let tasks = Task::list(&state.db, page.limit, page.skip).await?;

    Ok(Json(tasks))
}

/// List the tasks owned by `user_id`
///
/// # Errors
///
/// - `404 Not Found`: no such user
pub async fn list_user_tasks(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<Uuid>,
    AppQuery(page): AppQuery<Pagination>,
) -> ApiResult<Json<Vec<Task>>> {
    let page = page.validate()?;
    require_user(&state, user_id).await?;

    let tasks = Task::list_by_owner(&state.db, user_id, page.limit, page.skip).await?;

    tracing::debug!(user_id = %user_id, count = tasks.len(), "Listed user tasks");
    Ok(Json(tasks))
}

/// Fetch one task owned by the caller
///
/// # Errors
///
/// - `404 Not Found`: task missing or owned by another user
pub async fn get_task(
    State(state): State<AppState>,
    AppPath(task_id): AppPath<Uuid>,
    AppQuery(owner): AppQuery<OwnerQuery>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id(&state.db, task_id).await?;
    let task = owned_task(task, task_id, owner.user_id)?;

    Ok(Json(task))
}

/// Update a task owned by the caller
///
/// # Endpoint
///
/// ```text
/// PUT /tasks/<task_id>?user_id=<uuid>
/// Content-Type: application/json
///
/// { "status": "in_progress" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: changed title or description, unknown status
/// - `404 Not Found`: task missing or owned by another user
pub async fn update_task(
    State(state): State<AppState>,
    AppPath(task_id): AppPath<Uuid>,
    AppQuery(owner): AppQuery<OwnerQuery>,
    AppJson(changes): AppJson<TaskChanges>,
) -> ApiResult<Json<Task>> {
    let mut tx = state.db.begin().await?;

    let existing = Task::find_by_id_for_update(&mut *tx, task_id).await?;
    let existing = owned_task(existing, task_id, owner.user_id)?;

    let update = validate_task_update(&existing, &changes)?;

    let updated = Task::update(&mut *tx, task_id, update)
        .await?
        .ok_or_else(|| ApiError::InternalError(format!("Task {} vanished during update", task_id)))?;

    tx.commit().await?;

    tracing::info!(
        task_id = %task_id,
        user_id = %owner.user_id,
        from = %existing.status,
        to = %updated.status,
        "Task updated"
    );

    Ok(Json(updated))
}

/// Delete a cancelled task owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: task is not in `cancelled` status
/// - `404 Not Found`: task missing or owned by another user
pub async fn delete_task(
    State(state): State<AppState>,
    AppPath(task_id): AppPath<Uuid>,
    AppQuery(owner): AppQuery<OwnerQuery>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    let mut tx = state.db.begin().await?;

    let task = Task::find_by_id_for_update(&mut *tx, task_id).await?;
    let task = owned_task(task, task_id, owner.user_id)?;
    ensure_deletable(&task)?;

    if !Task::delete(&mut *tx, task_id).await? {
        return Err(ApiError::task_not_found());
    }

    tx.commit().await?;

    tracing::info!(task_id = %task_id, user_id = %owner.user_id, "Task deleted");

    Ok(Json(DeleteTaskResponse {
        task_id,
        deleted: true,
        message: "Task deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taskdesk_shared::models::task::TaskStatus;

    fn task(status: TaskStatus, owner_id: Uuid) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Buy milk".to_string(),
            description: None,
            status,
            owner_id: Some(owner_id),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn message(err: ApiError) -> (StatusCode, String) {
        let status = err.status_code();
        match err {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) => (status, msg),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_owned_task_accepts_owner() {
        let owner = Uuid::new_v4();
        let t = task(TaskStatus::Pending, owner);
        let id = t.id;

        assert_eq!(owned_task(Some(t), id, owner).unwrap().id, id);
    }

    #[test]
    fn test_foreign_and_missing_tasks_are_indistinguishable() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let t = task(TaskStatus::Pending, owner);
        let id = t.id;

        let foreign = message(owned_task(Some(t), id, stranger).unwrap_err());
        let missing = message(owned_task(None, id, stranger).unwrap_err());

        assert_eq!(foreign, missing);
        assert_eq!(foreign.0, StatusCode::NOT_FOUND);
        assert_eq!(foreign.1, "Task not found or unauthorized");
    }

    #[test]
    fn test_unowned_task_is_not_found() {
        let mut t = task(TaskStatus::Pending, Uuid::new_v4());
        t.owner_id = None;
        let id = t.id;

        let (status, _) = message(owned_task(Some(t), id, Uuid::new_v4()).unwrap_err());
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_only_cancelled_tasks_are_deletable() {
        let owner = Uuid::new_v4();
        for status in TaskStatus::ALL {
            let result = ensure_deletable(&task(status, owner));
            if status == TaskStatus::Cancelled {
                assert!(result.is_ok());
            } else {
                let (code, msg) = message(result.unwrap_err());
                assert_eq!(code, StatusCode::BAD_REQUEST);
                assert!(msg.starts_with("Only cancelled tasks can be deleted"));
                assert!(msg.contains(status.as_str()));
            }
        }
    }

    #[test]
    fn test_delete_response_serialization() {
        let response = DeleteTaskResponse {
            task_id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            deleted: true,
            message: "Task deleted successfully".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"deleted\":true"));
        assert!(json.contains("550e8400-e29b-41d4-a716-446655440000"));
    }
}
