//! Store trait definition for testability and dependency injection.
//!
//! The rest of the application only sees this capability; the PostgreSQL
//! implementation and the in-memory implementation are interchangeable.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{session::Session, todo::Todo, user::User},
};

/// Document-store operations the application depends on.
///
/// Expiry is a store capability: `find_session` and `count_sessions` only
/// consider live sessions, and `delete_expired_sessions` reclaims dead rows.
#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a new user. Fails with `AppError::DuplicateEmail` when the
    /// email is already taken.
    async fn insert_user(
        &self,
        id: Uuid,
        fullname: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User>;

    /// Finds a user by normalized email, password hash included.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Finds a user by id.
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Inserts a new session.
    async fn insert_session(&self, session: &Session) -> Result<()>;

    /// Finds a live session by id. Expired sessions are not returned.
    async fn find_session(&self, id: Uuid) -> Result<Option<Session>>;

    /// Counts a user's live sessions.
    async fn count_sessions(&self, user_id: Uuid) -> Result<i64>;

    /// Deletes the single oldest session of a user, by creation time.
    async fn delete_oldest_session(&self, user_id: Uuid) -> Result<()>;

    /// Deletes a session by id. Deleting a missing id is not an error.
    async fn delete_session(&self, id: Uuid) -> Result<()>;

    /// Deletes all expired sessions, returning how many were removed.
    async fn delete_expired_sessions(&self) -> Result<u64>;

    /// Inserts a new todo, completed flag false.
    async fn insert_todo(&self, id: Uuid, user_id: Uuid, text: &str) -> Result<Todo>;

    /// Lists all todos owned by a user.
    async fn list_todos(&self, user_id: Uuid) -> Result<Vec<Todo>>;

    /// Finds a todo by id, scoped to its owner.
    async fn find_todo(&self, user_id: Uuid, todo_id: Uuid) -> Result<Option<Todo>>;

    /// Updates a todo's text, scoped to its owner. Returns whether a row matched.
    async fn set_todo_text(&self, user_id: Uuid, todo_id: Uuid, text: &str) -> Result<bool>;

    /// Updates a todo's completed flag, scoped to its owner. Returns whether a row matched.
    async fn set_todo_completed(
        &self,
        user_id: Uuid,
        todo_id: Uuid,
        completed: bool,
    ) -> Result<bool>;

    /// Deletes a todo, scoped to its owner. Returns whether a row matched.
    async fn delete_todo(&self, user_id: Uuid, todo_id: Uuid) -> Result<bool>;
}
