use std::env;
use anyhow::{Context, Result};
use zeroize::{Zeroize, Zeroizing};

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// The duration of a session in days.
    pub session_duration_days: i64,
    /// The maximum number of concurrent sessions per user.
    pub max_sessions_per_user: i64,
    /// The key used to sign session tokens.
    pub secret_key: Zeroizing<Vec<u8>>,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let mut secret_key_hex = env::var("SECRET_KEY")
            .context("SECRET_KEY must be set (generate with: openssl rand -hex 32)")?;

        let secret_key_bytes = hex::decode(&secret_key_hex)
            .context("SECRET_KEY must be valid hexadecimal")?;

        secret_key_hex.zeroize();

        if secret_key_bytes.len() < 32 {
            anyhow::bail!("SECRET_KEY must be at least 32 bytes (64 hex characters)");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok(),
            session_duration_days: env::var("SESSION_DURATION_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .context("Invalid SESSION_DURATION_DAYS")?,
            max_sessions_per_user: env::var("MAX_SESSIONS_PER_USER")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .context("Invalid MAX_SESSIONS_PER_USER")?,
            secret_key: Zeroizing::new(secret_key_bytes),
        })
    }
}
