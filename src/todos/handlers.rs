use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{auth::jwt::AuthUser, error::ApiError, state::AppState};

use super::{
    dto::{CreateTodoRequest, TodoFilter, UpdateTodoRequest},
    repo::{Status, Todo, TodoStats},
};

/// Single-owner rule: only the user referenced by the row may touch it.
fn ensure_owner(todo: &Todo, requester: Uuid) -> Result<(), ApiError> {
    if todo.user_id != requester {
        warn!(todo_id = %todo.id, owner = %todo.user_id, requester = %requester, "ownership check failed");
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

/// Load a task and enforce ownership: absent is 404, someone else's is 403.
async fn find_owned(state: &AppState, id: Uuid, requester: Uuid) -> Result<Todo, ApiError> {
    let todo = Todo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Todo"))?;
    ensure_owner(&todo, requester)?;
    Ok(todo)
}

/// A title supplied in a patch must stay non-empty after trimming.
fn trimmed_title(title: Option<&str>) -> Result<Option<&str>, ApiError> {
    match title.map(str::trim) {
        Some("") => Err(ApiError::Validation("Title is required".into())),
        other => Ok(other),
    }
}

#[instrument(skip(state, payload))]
pub async fn create_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("Title is required".into()));
    }

    // The owner always comes from the verified token, never from the body.
    let todo = Todo::create(
        &state.db,
        user_id,
        title,
        &payload.description,
        payload.priority,
        payload.status,
    )
    .await?;

    info!(todo_id = %todo.id, user_id = %user_id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

#[instrument(skip(state))]
pub async fn list_todos(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filter): Query<TodoFilter>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = Todo::list(
        &state.db,
        user_id,
        filter.status.as_deref(),
        filter.priority_filter(),
        filter.search.as_deref(),
    )
    .await?;
    Ok(Json(todos))
}

#[instrument(skip(state))]
pub async fn get_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Todo>, ApiError> {
    let todo = find_owned(&state, id, user_id).await?;
    Ok(Json(todo))
}

#[instrument(skip(state, patch))]
pub async fn update_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<UpdateTodoRequest>,
) -> Result<Json<Todo>, ApiError> {
    find_owned(&state, id, user_id).await?;

    let title = trimmed_title(patch.title.as_deref())?;

    // A supplied status drives the completed flag.
    let completed = patch.status.map(|s| s == Status::Completed);

    let todo = Todo::update(
        &state.db,
        id,
        title,
        patch.description.as_deref(),
        patch.priority,
        patch.status,
        completed,
    )
    .await?
    .ok_or(ApiError::NotFound("Todo"))?;

    info!(todo_id = %id, user_id = %user_id, "todo updated");
    Ok(Json(todo))
}

#[instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    find_owned(&state, id, user_id).await?;
    Todo::delete(&state.db, id).await?;

    info!(todo_id = %id, user_id = %user_id, "todo deleted");
    Ok(Json(serde_json::json!({ "message": "Todo deleted" })))
}

#[instrument(skip(state))]
pub async fn get_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<TodoStats>, ApiError> {
    let stats = Todo::stats(&state.db, user_id).await?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todos::repo::Priority;
    use time::OffsetDateTime;

    fn todo_owned_by(user_id: Uuid) -> Todo {
        Todo {
            id: Uuid::new_v4(),
            user_id,
            title: "Buy milk".into(),
            description: String::new(),
            priority: Priority::Low,
            status: Status::Pending,
            completed: false,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn owner_passes_ownership_check() {
        let owner = Uuid::new_v4();
        let todo = todo_owned_by(owner);
        assert!(ensure_owner(&todo, owner).is_ok());
    }

    #[test]
    fn other_user_is_forbidden() {
        let todo = todo_owned_by(Uuid::new_v4());
        let err = ensure_owner(&todo, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }

    #[test]
    fn patch_title_trims_and_passes_through() {
        assert_eq!(trimmed_title(Some("  Buy milk  ")).unwrap(), Some("Buy milk"));
        assert_eq!(trimmed_title(None).unwrap(), None);
    }

    #[test]
    fn patch_title_rejects_whitespace_only() {
        let err = trimmed_title(Some("   ")).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        let err = trimmed_title(Some("")).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn completed_follows_supplied_status() {
        let patch: UpdateTodoRequest =
            serde_json::from_str(r#"{"status":"completed"}"#).unwrap();
        assert_eq!(patch.status.map(|s| s == Status::Completed), Some(true));

        let patch: UpdateTodoRequest = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert_eq!(patch.status.map(|s| s == Status::Completed), Some(false));

        let patch: UpdateTodoRequest = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(patch.status.map(|s| s == Status::Completed), None);
    }
}
