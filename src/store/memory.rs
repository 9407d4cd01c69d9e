use crate::store::traits::{Result, SessionToken, TokenStore};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory token store for tests and the demo.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn set_access_token(&self, username: &str, access_token: &str) -> Result<()> {
        self.tokens
            .write()
            .await
            .insert(username.to_string(), access_token.to_string());
        Ok(())
    }

    async fn access_token(&self, username: &str) -> Result<Option<String>> {
        Ok(self.tokens.read().await.get(username).cloned())
    }

    async fn access_tokens(&self) -> Result<Vec<SessionToken>> {
        Ok(self
            .tokens
            .read()
            .await
            .iter()
            .map(|(username, access_token)| SessionToken {
                username: username.clone(),
                access_token: access_token.clone(),
            })
            .collect())
    }

    async fn remove_all_access_tokens(&self) -> Result<()> {
        self.tokens.write().await.clear();
        Ok(())
    }
}
