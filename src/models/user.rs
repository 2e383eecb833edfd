use serde::Serialize;
use uuid::Uuid;

/// Represents a user account as stored, password hash included.
///
/// Never serialized. Anything that crosses the HTTP boundary goes through
/// [`PublicUser`].
#[derive(Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's full name.
    pub fullname: String,
    /// The user's email address, lower-cased and trimmed.
    pub email: String,
    /// The Argon2 hash of the user's password.
    pub password: String,
}

/// The client-safe projection of a [`User`].
#[derive(Clone, Debug, Serialize)]
pub struct PublicUser {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's full name.
    pub fullname: String,
    /// The user's email address.
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname,
            email: user.email,
        }
    }
}
