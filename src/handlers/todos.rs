use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{todo::Todo, user::PublicUser},
    services::todos as todo_service,
    state::AppState,
};

/// The request payload for creating a todo.
#[derive(Deserialize)]
pub struct CreateTodoRequest {
    pub text: Option<String>,
}

/// The request payload for updating a todo. Exactly one field may be set.
#[derive(Deserialize)]
pub struct UpdateTodoRequest {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Lists the authenticated user's todos.
#[axum::debug_handler]
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
) -> Result<Json<Vec<Todo>>> {
    let todos = todo_service::list_todos(&state, user.id).await?;
    Ok(Json(todos))
}

/// Creates a todo from non-empty text.
#[axum::debug_handler]
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    payload: std::result::Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload.map_err(|_| AppError::InvalidJson)?;

    let text = match payload.text.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => {
            return Err(AppError::BadRequest(
                "Invalid todo text provided".to_string(),
            ));
        }
    };

    let todo = todo_service::create_todo(&state, user.id, &text).await?;
    tracing::debug!("Todo created: {} for user {}", todo.id, user.id);

    Ok((StatusCode::CREATED, Json(todo)).into_response())
}

/// Fetches a single todo by id.
#[axum::debug_handler]
pub async fn get_todo(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(todo_id): Path<Uuid>,
) -> Result<Json<Todo>> {
    let todo = todo_service::get_todo(&state, user.id, todo_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(todo))
}

/// Updates a todo's text XOR its completed flag, never both in one call.
#[axum::debug_handler]
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(todo_id): Path<Uuid>,
    payload: std::result::Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload.map_err(|_| AppError::InvalidJson)?;

    let (updated, message) = match (payload.text.as_deref(), payload.completed) {
        (Some(text), None) if !text.trim().is_empty() => (
            todo_service::update_text(&state, user.id, todo_id, text.trim()).await?,
            "Todo text updated successfully",
        ),
        (None, Some(completed)) => (
            todo_service::update_completed(&state, user.id, todo_id, completed).await?,
            "Todo completion status updated successfully",
        ),
        (Some(_), Some(_)) => {
            return Err(AppError::BadRequest(
                "Only one field (text or completed) can be updated at a time".to_string(),
            ));
        }
        _ => {
            return Err(AppError::BadRequest("Invalid fields to update".to_string()));
        }
    };

    if !updated {
        return Err(AppError::NotFound);
    }

    let response = MessageResponse {
        message: message.to_string(),
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Deletes a todo by id.
#[axum::debug_handler]
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(todo_id): Path<Uuid>,
) -> Result<Response> {
    let deleted = todo_service::delete_todo(&state, user.id, todo_id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    let response = MessageResponse {
        message: "Todo deleted successfully".to_string(),
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}
