use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::{NoTls, Row, error::SqlState};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{session::Session, todo::Todo, user::User},
    store::Store,
};

const POOL_MAX_SIZE: usize = 100;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    fullname TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL,
    expires_at TIMESTAMPTZ NOT NULL
);
CREATE INDEX IF NOT EXISTS sessions_user_id_idx ON sessions (user_id);
CREATE INDEX IF NOT EXISTS sessions_expires_at_idx ON sessions (expires_at);

CREATE TABLE IF NOT EXISTS todos (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    text TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT FALSE
);
CREATE INDEX IF NOT EXISTS todos_user_id_idx ON todos (user_id);
"#;

/// The PostgreSQL-backed store.
pub struct PgStore {
    pool: Pool,
}

/// A helper function to map a `tokio_postgres::Row` to a `User`.
fn row_to_user(row: &Row) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        fullname: row.try_get("fullname")?,
        email: row.try_get("email")?,
        password: row.try_get("password")?,
    })
}

/// A helper function to map a `tokio_postgres::Row` to a `Session`.
fn row_to_session(row: &Row) -> Result<Session> {
    Ok(Session {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
        expires_at: row.try_get("expires_at")?,
    })
}

/// A helper function to map a `tokio_postgres::Row` to a `Todo`.
fn row_to_todo(row: &Row) -> Result<Todo> {
    Ok(Todo {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        text: row.try_get("text")?,
        completed: row.try_get("completed")?,
    })
}

/// Maps a unique-constraint violation to the duplicate-email condition.
fn map_insert_error(e: tokio_postgres::Error) -> AppError {
    if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        AppError::DuplicateEmail
    } else {
        AppError::Database(e)
    }
}

impl PgStore {
    /// Connects to the database and ensures the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pg_config: tokio_postgres::Config = database_url.parse()?;

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let pool = Pool::builder(manager)
            .max_size(POOL_MAX_SIZE)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build database pool: {}", e)))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<()> {
        let client = self.pool.get().await?;
        client.batch_execute(SCHEMA).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(
        &self,
        id: Uuid,
        fullname: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO users (id, fullname, email, password)
                VALUES ($1, $2, $3, $4)
                RETURNING id, fullname, email, password
                "#,
                &[&id, &fullname, &email, &password_hash],
            )
            .await
            .map_err(map_insert_error)?;
        row_to_user(&row)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT id, fullname, email, password
                FROM users
                WHERE email = $1
                "#,
                &[&email],
            )
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT id, fullname, email, password
                FROM users
                WHERE id = $1
                "#,
                &[&id],
            )
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn insert_session(&self, session: &Session) -> Result<()> {
        let client = self.pool.get().await?;
        client
            .execute(
                r#"
                INSERT INTO sessions (id, user_id, created_at, expires_at)
                VALUES ($1, $2, $3, $4)
                "#,
                &[
                    &session.id,
                    &session.user_id,
                    &session.created_at,
                    &session.expires_at,
                ],
            )
            .await?;
        Ok(())
    }

    async fn find_session(&self, id: Uuid) -> Result<Option<Session>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT id, user_id, created_at, expires_at
                FROM sessions
                WHERE id = $1 AND expires_at > NOW()
                "#,
                &[&id],
            )
            .await?;
        row.map(|r| row_to_session(&r)).transpose()
    }

    async fn count_sessions(&self, user_id: Uuid) -> Result<i64> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                r#"
                SELECT COUNT(*) AS total
                FROM sessions
                WHERE user_id = $1 AND expires_at > NOW()
                "#,
                &[&user_id],
            )
            .await?;
        Ok(row.try_get("total")?)
    }

    async fn delete_oldest_session(&self, user_id: Uuid) -> Result<()> {
        let client = self.pool.get().await?;
        client
            .execute(
                r#"
                DELETE FROM sessions
                WHERE id = (
                    SELECT id FROM sessions
                    WHERE user_id = $1
                    ORDER BY created_at ASC
                    LIMIT 1
                )
                "#,
                &[&user_id],
            )
            .await?;
        Ok(())
    }

    async fn delete_session(&self, id: Uuid) -> Result<()> {
        let client = self.pool.get().await?;
        client
            .execute("DELETE FROM sessions WHERE id = $1", &[&id])
            .await?;
        Ok(())
    }

    async fn delete_expired_sessions(&self) -> Result<u64> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM sessions WHERE expires_at <= NOW()", &[])
            .await?;
        Ok(deleted)
    }

    async fn insert_todo(&self, id: Uuid, user_id: Uuid, text: &str) -> Result<Todo> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO todos (id, user_id, text)
                VALUES ($1, $2, $3)
                RETURNING id, user_id, text, completed
                "#,
                &[&id, &user_id, &text],
            )
            .await?;
        row_to_todo(&row)
    }

    async fn list_todos(&self, user_id: Uuid) -> Result<Vec<Todo>> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                r#"
                SELECT id, user_id, text, completed
                FROM todos
                WHERE user_id = $1
                ORDER BY id
                "#,
                &[&user_id],
            )
            .await?;
        rows.iter().map(row_to_todo).collect()
    }

    async fn find_todo(&self, user_id: Uuid, todo_id: Uuid) -> Result<Option<Todo>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT id, user_id, text, completed
                FROM todos
                WHERE id = $1 AND user_id = $2
                "#,
                &[&todo_id, &user_id],
            )
            .await?;
        row.map(|r| row_to_todo(&r)).transpose()
    }

    async fn set_todo_text(&self, user_id: Uuid, todo_id: Uuid, text: &str) -> Result<bool> {
        let client = self.pool.get().await?;
        let updated = client
            .execute(
                "UPDATE todos SET text = $1 WHERE id = $2 AND user_id = $3",
                &[&text, &todo_id, &user_id],
            )
            .await?;
        Ok(updated > 0)
    }

    async fn set_todo_completed(
        &self,
        user_id: Uuid,
        todo_id: Uuid,
        completed: bool,
    ) -> Result<bool> {
        let client = self.pool.get().await?;
        let updated = client
            .execute(
                "UPDATE todos SET completed = $1 WHERE id = $2 AND user_id = $3",
                &[&completed, &todo_id, &user_id],
            )
            .await?;
        Ok(updated > 0)
    }

    async fn delete_todo(&self, user_id: Uuid, todo_id: Uuid) -> Result<bool> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute(
                "DELETE FROM todos WHERE id = $1 AND user_id = $2",
                &[&todo_id, &user_id],
            )
            .await?;
        Ok(deleted > 0)
    }
}
