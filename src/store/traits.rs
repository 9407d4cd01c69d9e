//! Session token storage boundary.
//!
//! The platform's secure storage (keychain or equivalent) sits behind this
//! trait; the crate ships a file-backed and an in-memory implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// One stored login: the username and its restore token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub username: String,
    pub access_token: String,
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn set_access_token(&self, username: &str, access_token: &str) -> Result<()>;
    async fn access_token(&self, username: &str) -> Result<Option<String>>;

    /// All stored logins, in no particular order.
    async fn access_tokens(&self) -> Result<Vec<SessionToken>>;

    async fn remove_all_access_tokens(&self) -> Result<()>;
}
