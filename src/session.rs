//! User session wiring.

use crate::client::ClientProxy;
use crate::media::MediaProvider;
use crate::sdk::SdkClient;
use crate::summary::RoomSummaryFactory;
use std::sync::Arc;

/// Bundles a [`ClientProxy`] with the media provider its summaries share.
pub struct UserSession {
    pub client_proxy: Arc<ClientProxy>,
    pub media_provider: Arc<MediaProvider>,
}

impl UserSession {
    pub fn new(sdk: Arc<dyn SdkClient>) -> Self {
        let media_provider = Arc::new(MediaProvider::new(Arc::clone(&sdk)));
        let summary_factory = RoomSummaryFactory::new(Arc::clone(&media_provider));
        let client_proxy = ClientProxy::new(sdk, summary_factory);

        Self {
            client_proxy,
            media_provider,
        }
    }
}
