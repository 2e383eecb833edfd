use argon2::{
    Argon2, ParamsBuilder,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::{RngCore, rngs::OsRng};
use uuid::Uuid;
use zeroize::Zeroize;

use crate::{
    error::{AppError, Result},
    models::user::{PublicUser, User},
    services::sessions,
    state::AppState,
    validation::auth::normalize_email,
};

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 3;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 6;

/// Hashes a password using Argon2id.
fn hash_password(password: &str) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();

    let mut salt_bytes = [0u8; 16];
    OsRng.fill_bytes(&mut salt_bytes);

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Hashing(format!("Salt encoding error: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        ParamsBuilder::new()
            .m_cost(ARGON2_MEMORY_MB * 1024)
            .t_cost(ARGON2_ITERATIONS)
            .p_cost(ARGON2_PARALLELISM)
            .build()
            .map_err(|e| AppError::Hashing(format!("Argon2 params: {}", e)))?,
    );

    let password_hash = argon2
        .hash_password(&password_bytes, &salt)
        .map_err(|e| AppError::Hashing(format!("Argon2 hash error: {}", e)))?
        .to_string();

    password_bytes.zeroize();
    Ok(password_hash)
}

/// Verifies a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let mut password_bytes = password.as_bytes().to_vec();
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Hashing(format!("Hash parse error: {}", e)))?;
    let argon2 = Argon2::default();
    let result = argon2.verify_password(&password_bytes, &parsed_hash).is_ok();

    password_bytes.zeroize();
    Ok(result)
}

/// Creates a new user account.
///
/// The email is normalized (trimmed, lower-cased) before the insert; a
/// collision with an existing email surfaces as `AppError::DuplicateEmail`.
pub async fn signup(
    state: &AppState,
    fullname: &str,
    email: &str,
    password: &str,
) -> Result<User> {
    let email = normalize_email(email);
    tracing::debug!("🔐 Creating user: {}", email);

    let password_hash = hash_password(password)?;
    let user = state
        .store
        .insert_user(Uuid::new_v4(), fullname.trim(), &email, &password_hash)
        .await?;

    tracing::info!("✅ User created with ID: {}", user.id);
    Ok(user)
}

/// Authenticates a user and opens a session for them.
///
/// Unknown email and wrong password both collapse to the same
/// `InvalidCredentials` error. On success the session count is capped by
/// evicting the oldest session, and the returned token is the only form in
/// which the session id leaves the server.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<(PublicUser, String)> {
    let email = normalize_email(email);
    tracing::debug!("🔐 Authenticating user: {}", email);

    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(password, &user.password)? {
        return Err(AppError::InvalidCredentials);
    }

    let session = sessions::create_session(state, user.id).await?;
    sessions::enforce_concurrency_limit(state, user.id).await?;

    let token = state.tokens.sign(session.id);

    tracing::info!("✅ User authenticated: {}", user.id);
    Ok((PublicUser::from(user), token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_never_the_plaintext_and_verifies() {
        let hash = hash_password("password1").unwrap();
        assert_ne!(hash, "password1");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("password1", &hash).unwrap());
        assert!(!verify_password("password2", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently_per_salt() {
        let first = hash_password("password1").unwrap();
        let second = hash_password("password1").unwrap();
        assert_ne!(first, second);
    }
}
