use crate::store::traits::{Result, SessionToken, StoreError, TokenStore};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Token store persisting one JSON file per username under a base directory.
pub struct FileTokenStore {
    base_path: PathBuf,
}

impl FileTokenStore {
    pub async fn new(path: impl Into<PathBuf>) -> io::Result<Self> {
        let base_path = path.into();
        let store = Self { base_path };

        fs::create_dir_all(store.tokens_dir()).await?;

        Ok(store)
    }

    fn tokens_dir(&self) -> PathBuf {
        self.base_path.join("tokens")
    }

    fn token_path(&self, username: &str) -> PathBuf {
        self.tokens_dir()
            .join(format!("{}.json", Self::sanitize_filename(username)))
    }

    fn sanitize_filename(key: &str) -> String {
        key.replace(|c: char| !c.is_alphanumeric() && c != '.' && c != '-', "_")
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        match fs::read(path).await {
            Ok(data) => serde_json::from_slice(&data)
                .map(Some)
                .map_err(|e| StoreError::Serialization(e.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let data = serde_json::to_vec_pretty(value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(path, data).await.map_err(StoreError::Io)
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn set_access_token(&self, username: &str, access_token: &str) -> Result<()> {
        let token = SessionToken {
            username: username.to_string(),
            access_token: access_token.to_string(),
        };
        self.write_json(&self.token_path(username), &token).await
    }

    async fn access_token(&self, username: &str) -> Result<Option<String>> {
        let token: Option<SessionToken> = self.read_json(&self.token_path(username)).await?;
        Ok(token.map(|t| t.access_token))
    }

    async fn access_tokens(&self) -> Result<Vec<SessionToken>> {
        let mut tokens = Vec::new();
        let mut entries = fs::read_dir(self.tokens_dir()).await.map_err(StoreError::Io)?;

        while let Some(entry) = entries.next_entry().await.map_err(StoreError::Io)? {
            // The stored token carries the unsanitized username.
            if let Some(token) = self.read_json::<SessionToken>(&entry.path()).await? {
                tokens.push(token);
            }
        }

        Ok(tokens)
    }

    async fn remove_all_access_tokens(&self) -> Result<()> {
        let mut entries = fs::read_dir(self.tokens_dir()).await.map_err(StoreError::Io)?;

        while let Some(entry) = entries.next_entry().await.map_err(StoreError::Io)? {
            fs::remove_file(entry.path()).await.map_err(StoreError::Io)?;
        }

        Ok(())
    }
}
