use uuid::Uuid;

use crate::{error::Result, models::todo::Todo, state::AppState};

/// Creates a new todo for a user.
pub async fn create_todo(state: &AppState, user_id: Uuid, text: &str) -> Result<Todo> {
    state
        .store
        .insert_todo(Uuid::new_v4(), user_id, text)
        .await
}

/// Lists all todos owned by a user.
pub async fn list_todos(state: &AppState, user_id: Uuid) -> Result<Vec<Todo>> {
    state.store.list_todos(user_id).await
}

/// Finds a single todo, scoped to its owner.
pub async fn get_todo(state: &AppState, user_id: Uuid, todo_id: Uuid) -> Result<Option<Todo>> {
    state.store.find_todo(user_id, todo_id).await
}

/// Updates a todo's text, scoped to its owner. Returns whether a row matched.
pub async fn update_text(
    state: &AppState,
    user_id: Uuid,
    todo_id: Uuid,
    text: &str,
) -> Result<bool> {
    state.store.set_todo_text(user_id, todo_id, text).await
}

/// Updates a todo's completed flag, scoped to its owner. Returns whether a row matched.
pub async fn update_completed(
    state: &AppState,
    user_id: Uuid,
    todo_id: Uuid,
    completed: bool,
) -> Result<bool> {
    state
        .store
        .set_todo_completed(user_id, todo_id, completed)
        .await
}

/// Deletes a todo, scoped to its owner. Returns whether a row matched.
pub async fn delete_todo(state: &AppState, user_id: Uuid, todo_id: Uuid) -> Result<bool> {
    state.store.delete_todo(user_id, todo_id).await
}
