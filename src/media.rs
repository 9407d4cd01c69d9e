//! Media loading through the SDK, with an in-process byte cache.

use crate::sdk::{MediaSource, SdkClient};
use log::error;
use moka::future::Cache;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Duration;

#[derive(Debug, Error)]
pub enum MediaProviderError {
    #[error("failed loading media content")]
    FailedLoadingMedia,
}

pub struct MediaProvider {
    sdk: Arc<dyn SdkClient>,
    cache: Cache<MediaSource, Arc<Vec<u8>>>,
}

impl MediaProvider {
    pub fn new(sdk: Arc<dyn SdkClient>) -> Self {
        Self {
            sdk,
            cache: Cache::builder()
                .time_to_live(Duration::from_secs(300)) // 5 minute TTL
                .max_capacity(256) // Avatars and thumbnails, not full media
                .build(),
        }
    }

    pub async fn load_media(&self, source: &MediaSource) -> Result<Arc<Vec<u8>>, MediaProviderError> {
        if let Some(bytes) = self.cache.get(source).await {
            return Ok(bytes);
        }

        let bytes = self.sdk.media_content(source).await.map_err(|err| {
            error!(target: "MediaProvider", "Failed loading media for {}: {}", source.url(), err);
            MediaProviderError::FailedLoadingMedia
        })?;

        let bytes = Arc::new(bytes);
        self.cache.insert(source.clone(), Arc::clone(&bytes)).await;
        Ok(bytes)
    }

    pub async fn load_image_from_url(&self, url: &str) -> Result<Arc<Vec<u8>>, MediaProviderError> {
        self.load_media(&MediaSource::from_url(url)).await
    }
}
