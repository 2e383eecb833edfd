use std::sync::Arc;

use crate::config::Config;
use crate::crypto::token::TokenSigner;
use crate::error::Result;
use crate::store::{Store, memory::MemStore, postgres::PgStore};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The backing document store.
    pub store: Arc<dyn Store>,
    /// The session token signer.
    pub tokens: TokenSigner,
    /// The application's configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new `AppState`, selecting the store backend from the
    /// configuration.
    pub async fn new(config: &Config) -> Result<Self> {
        let store: Arc<dyn Store> = match &config.database_url {
            Some(url) => {
                let store = PgStore::connect(url).await?;
                tracing::info!("✅ PostgreSQL store initialized with deadpool-postgres");
                Arc::new(store)
            }
            None => {
                tracing::warn!(
                    "DATABASE_URL not set; using the in-memory store (data will not survive a restart)"
                );
                Arc::new(MemStore::new())
            }
        };

        Ok(Self::with_store(store, config.clone()))
    }

    /// Creates an `AppState` over an explicit store. Used by tests and by
    /// `new` once the backend is chosen.
    pub fn with_store(store: Arc<dyn Store>, config: Config) -> Self {
        let tokens = TokenSigner::new(&config.secret_key);
        AppState {
            store,
            tokens,
            config,
        }
    }
}
