use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::store::StoreError;

/// Whitelist of access tokens that are currently logged in.
///
/// A token is valid only between `add` (login) and `remove` (logout).
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn add(&self, token: &str) -> Result<(), StoreError>;

    async fn remove(&self, token: &str) -> Result<(), StoreError>;

    async fn contains(&self, token: &str) -> Result<bool, StoreError>;
}

/// [`SessionStore`] held in memory; sessions end when the value is dropped
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    tokens: RwLock<HashSet<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn add(&self, token: &str) -> Result<(), StoreError> {
        self.tokens.write().await.insert(token.to_string());
        Ok(())
    }

    async fn remove(&self, token: &str) -> Result<(), StoreError> {
        self.tokens.write().await.remove(token);
        Ok(())
    }

    async fn contains(&self, token: &str) -> Result<bool, StoreError> {
        Ok(self.tokens.read().await.contains(token))
    }
}
