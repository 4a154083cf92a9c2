use std::sync::Arc;

use crate::{
    auth::{BcryptHasher, TokenSigner},
    config::Config,
    store::{AccountStore, MemoryStore},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub signer: Arc<TokenSigner>,
    pub hasher: BcryptHasher,
}

impl AppState {
    pub fn new(config: &Config, store: Arc<dyn AccountStore>) -> Self {
        Self {
            store,
            signer: Arc::new(TokenSigner::new(&config.secret_key, config.token_ttl_ms)),
            hasher: BcryptHasher::new(config.hash_cost),
        }
    }

    pub fn in_memory(config: &Config) -> Self {
        Self::new(config, Arc::new(MemoryStore::new()))
    }
}
