use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{session::Session, todo::Todo, user::User},
    store::Store,
};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    sessions: HashMap<Uuid, Session>,
    todos: HashMap<Uuid, Todo>,
}

/// An in-memory store. Selected when no `DATABASE_URL` is configured and
/// used by the test suite. Expiry is enforced lazily on lookup.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    /// Creates a new, empty `MemStore`.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn insert_user(
        &self,
        id: Uuid,
        fullname: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.values().any(|u| u.email == email) {
            return Err(AppError::DuplicateEmail);
        }
        let user = User {
            id,
            fullname: fullname.to_string(),
            email: email.to_string(),
            password: password_hash.to_string(),
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.get(&id).cloned())
    }

    async fn insert_session(&self, session: &Session) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn find_session(&self, id: Uuid) -> Result<Option<Session>> {
        let mut inner = self.inner.lock().unwrap();
        let now = Utc::now();
        match inner.sessions.get(&id) {
            Some(session) if session.is_expired(now) => {
                inner.sessions.remove(&id);
                Ok(None)
            }
            Some(session) => Ok(Some(session.clone())),
            None => Ok(None),
        }
    }

    async fn count_sessions(&self, user_id: Uuid) -> Result<i64> {
        let inner = self.inner.lock().unwrap();
        let now = Utc::now();
        Ok(inner
            .sessions
            .values()
            .filter(|s| s.user_id == user_id && !s.is_expired(now))
            .count() as i64)
    }

    async fn delete_oldest_session(&self, user_id: Uuid) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let oldest = inner
            .sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .min_by_key(|s| s.created_at)
            .map(|s| s.id);
        if let Some(id) = oldest {
            inner.sessions.remove(&id);
        }
        Ok(())
    }

    async fn delete_session(&self, id: Uuid) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.sessions.remove(&id);
        Ok(())
    }

    async fn delete_expired_sessions(&self) -> Result<u64> {
        let mut inner = self.inner.lock().unwrap();
        let now = Utc::now();
        let before = inner.sessions.len();
        inner.sessions.retain(|_, s| !s.is_expired(now));
        Ok((before - inner.sessions.len()) as u64)
    }

    async fn insert_todo(&self, id: Uuid, user_id: Uuid, text: &str) -> Result<Todo> {
        let mut inner = self.inner.lock().unwrap();
        let todo = Todo {
            id,
            user_id,
            text: text.to_string(),
            completed: false,
        };
        inner.todos.insert(id, todo.clone());
        Ok(todo)
    }

    async fn list_todos(&self, user_id: Uuid) -> Result<Vec<Todo>> {
        let inner = self.inner.lock().unwrap();
        let mut todos: Vec<Todo> = inner
            .todos
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        todos.sort_by_key(|t| t.id);
        Ok(todos)
    }

    async fn find_todo(&self, user_id: Uuid, todo_id: Uuid) -> Result<Option<Todo>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .todos
            .get(&todo_id)
            .filter(|t| t.user_id == user_id)
            .cloned())
    }

    async fn set_todo_text(&self, user_id: Uuid, todo_id: Uuid, text: &str) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        match inner.todos.get_mut(&todo_id) {
            Some(todo) if todo.user_id == user_id => {
                todo.text = text.to_string();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_todo_completed(
        &self,
        user_id: Uuid,
        todo_id: Uuid,
        completed: bool,
    ) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        match inner.todos.get_mut(&todo_id) {
            Some(todo) if todo.user_id == user_id => {
                todo.completed = completed;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_todo(&self, user_id: Uuid, todo_id: Uuid) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        match inner.todos.get(&todo_id) {
            Some(todo) if todo.user_id == user_id => {
                inner.todos.remove(&todo_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(user_id: Uuid, created_offset_secs: i64, expires_offset_secs: i64) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            user_id,
            created_at: now + Duration::seconds(created_offset_secs),
            expires_at: now + Duration::seconds(expires_offset_secs),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_distinct_error() {
        let store = MemStore::new();
        store
            .insert_user(Uuid::new_v4(), "Alice", "a@x.com", "hash-a")
            .await
            .unwrap();
        let err = store
            .insert_user(Uuid::new_v4(), "Another Alice", "a@x.com", "hash-b")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[tokio::test]
    async fn expired_sessions_are_invisible_and_purgeable() {
        let store = MemStore::new();
        let user_id = Uuid::new_v4();

        let live = session(user_id, 0, 3600);
        let expired = session(user_id, -7200, -3600);
        store.insert_session(&live).await.unwrap();
        store.insert_session(&expired).await.unwrap();

        assert!(store.find_session(expired.id).await.unwrap().is_none());
        assert!(store.find_session(live.id).await.unwrap().is_some());
        assert_eq!(store.count_sessions(user_id).await.unwrap(), 1);

        // The expired row was already dropped by the lookup above.
        assert_eq!(store.delete_expired_sessions().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_oldest_session_picks_by_creation_time() {
        let store = MemStore::new();
        let user_id = Uuid::new_v4();

        let oldest = session(user_id, -300, 3600);
        let newer = session(user_id, -200, 3600);
        let newest = session(user_id, -100, 3600);
        for s in [&oldest, &newer, &newest] {
            store.insert_session(s).await.unwrap();
        }

        store.delete_oldest_session(user_id).await.unwrap();

        assert!(store.find_session(oldest.id).await.unwrap().is_none());
        assert!(store.find_session(newer.id).await.unwrap().is_some());
        assert!(store.find_session(newest.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_session_is_idempotent() {
        let store = MemStore::new();
        store.delete_session(Uuid::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn todo_access_is_owner_scoped() {
        let store = MemStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let todo = store
            .insert_todo(Uuid::new_v4(), alice, "buy milk")
            .await
            .unwrap();

        assert!(store.find_todo(bob, todo.id).await.unwrap().is_none());
        assert!(!store.set_todo_completed(bob, todo.id, true).await.unwrap());
        assert!(!store.delete_todo(bob, todo.id).await.unwrap());
        assert!(store.list_todos(bob).await.unwrap().is_empty());

        assert!(store.set_todo_completed(alice, todo.id, true).await.unwrap());
        let found = store.find_todo(alice, todo.id).await.unwrap().unwrap();
        assert!(found.completed);
        assert!(store.delete_todo(alice, todo.id).await.unwrap());
        assert!(store.list_todos(alice).await.unwrap().is_empty());
    }
}
