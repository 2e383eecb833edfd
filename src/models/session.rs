use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Represents a server-side session record.
///
/// The session id only ever reaches the client wrapped in a signed token;
/// the record itself stays in the store.
#[derive(Debug, Clone)]
pub struct Session {
    /// The unique identifier for the session.
    pub id: Uuid,
    /// The ID of the user this session belongs to.
    pub user_id: Uuid,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Returns whether the session is past its expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
