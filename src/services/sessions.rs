use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{error::Result, models::session::Session, state::AppState};

/// Creates a new session for a user, stamped with the configured lifetime.
pub async fn create_session(state: &AppState, user_id: Uuid) -> Result<Session> {
    let now = Utc::now();
    let session = Session {
        id: Uuid::new_v4(),
        user_id,
        created_at: now,
        expires_at: now + Duration::days(state.config.session_duration_days),
    };
    state.store.insert_session(&session).await?;
    Ok(session)
}

/// Caps a user's live sessions at the configured maximum.
///
/// Checked after insertion: the count may transiently exceed the limit by
/// one before the oldest session is pruned. Concurrent logins race on the
/// count and the cap is eventually consistent.
pub async fn enforce_concurrency_limit(state: &AppState, user_id: Uuid) -> Result<()> {
    let total = state.store.count_sessions(user_id).await?;
    if total > state.config.max_sessions_per_user {
        state.store.delete_oldest_session(user_id).await?;
        tracing::debug!("Evicted oldest session for user {}", user_id);
    }
    Ok(())
}

/// Destroys a session by id. Destroying a missing session is not an error.
pub async fn destroy_session(state: &AppState, session_id: Uuid) -> Result<()> {
    state.store.delete_session(session_id).await
}

/// Removes all expired sessions from the store.
pub async fn purge_expired(state: &AppState) -> Result<u64> {
    state.store.delete_expired_sessions().await
}
