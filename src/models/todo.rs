use serde::Serialize;
use uuid::Uuid;

/// Represents a single todo item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// The unique identifier for the todo.
    pub id: Uuid,
    /// The ID of the user who owns the todo.
    pub user_id: Uuid,
    /// The todo text, trimmed and non-empty.
    pub text: String,
    /// Whether the todo has been completed.
    pub completed: bool,
}
