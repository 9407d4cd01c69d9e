//! The client proxy: adapts SDK sync callbacks into an observable,
//! incrementally reconciled room list.

use crate::reconcile;
use crate::sdk::{MediaSource, RoomId, SdkClient, SdkDelegate, SdkRoom};
use crate::summary::{RoomSummary, RoomSummaryFactory};
use indexmap::IndexMap;
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use thiserror::Error;
use tokio::sync::{Notify, RwLock, broadcast};

// The size of the broadcast channel buffer.
const EVENT_CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, Error)]
pub enum ClientProxyError {
    #[error("failed retrieving user identifier")]
    FailedRetrievingUserIdentifier,
    #[error("failed retrieving display name")]
    FailedRetrievingDisplayName,
    #[error("failed retrieving avatar URL")]
    FailedRetrievingAvatarUrl,
    #[error("failed loading media content")]
    FailedLoadingMedia,
}

/// Events published to subscribers. `RoomListUpdated` carries the full,
/// fully-applied snapshot and is sent exactly once per completed pass.
#[derive(Debug, Clone)]
pub enum ClientProxyEvent {
    RoomListUpdated(Arc<Vec<Arc<RoomSummary>>>),
}

/// Delegate adapter installed into the SDK.
///
/// Holds only a weak back-reference so the SDK never extends the proxy's
/// lifetime; once the proxy is gone, notifications are dropped on the floor.
struct WeakClientDelegate {
    proxy: Weak<ClientProxy>,
}

impl SdkDelegate for WeakClientDelegate {
    fn room_list_changed(&self) {
        if let Some(proxy) = self.proxy.upgrade() {
            proxy.did_receive_sync_update();
        }
    }
}

pub struct ClientProxy {
    sdk: Arc<dyn SdkClient>,
    summary_factory: RoomSummaryFactory,

    /// Ordered room cache. Written only by the update loop; read locks hand
    /// out fully-applied snapshots.
    rooms: RwLock<IndexMap<RoomId, Arc<RoomSummary>>>,

    events: broadcast::Sender<ClientProxyEvent>,

    /// Collapsed "reconciliation needed" signal. Any number of pending sync
    /// notifications store a single permit.
    sync_update: Arc<Notify>,
    shutdown: Arc<Notify>,
    is_running: Arc<AtomicBool>,
}

impl ClientProxy {
    pub fn new(sdk: Arc<dyn SdkClient>, summary_factory: RoomSummaryFactory) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let proxy = Arc::new(Self {
            sdk: Arc::clone(&sdk),
            summary_factory,
            rooms: RwLock::new(IndexMap::new()),
            events,
            sync_update: Arc::new(Notify::new()),
            shutdown: Arc::new(Notify::new()),
            is_running: Arc::new(AtomicBool::new(true)),
        });

        sdk.set_delegate(Some(Arc::new(WeakClientDelegate {
            proxy: Arc::downgrade(&proxy),
        })));
        sdk.start_sync();

        proxy.spawn_update_loop();
        // Kick off the initial pass without waiting for the first sync.
        proxy.sync_update.notify_one();

        proxy
    }

    pub fn user_id(&self) -> Result<String, ClientProxyError> {
        self.sdk.user_id().map_err(|err| {
            error!(target: "ClientProxy", "Failed retrieving user identifier: {err}");
            ClientProxyError::FailedRetrievingUserIdentifier
        })
    }

    pub async fn load_user_display_name(&self) -> Result<String, ClientProxyError> {
        self.sdk
            .display_name()
            .await
            .map_err(|_| ClientProxyError::FailedRetrievingDisplayName)
    }

    pub async fn load_user_avatar_url(&self) -> Result<String, ClientProxyError> {
        self.sdk
            .avatar_url()
            .await
            .map_err(|_| ClientProxyError::FailedRetrievingAvatarUrl)
    }

    pub fn media_source_for_url(&self, url: &str) -> MediaSource {
        MediaSource::from_url(url)
    }

    pub async fn load_media_content(
        &self,
        source: &MediaSource,
    ) -> Result<Vec<u8>, ClientProxyError> {
        self.sdk
            .media_content(source)
            .await
            .map_err(|_| ClientProxyError::FailedLoadingMedia)
    }

    /// Current room list snapshot, in backend order.
    pub async fn rooms(&self) -> Vec<Arc<RoomSummary>> {
        self.rooms.read().await.values().cloned().collect()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientProxyEvent> {
        self.events.subscribe()
    }

    /// Detaches from the SDK and stops the update loop. In-flight passes are
    /// abandoned before they touch the cache. Idempotent; also runs on drop.
    pub fn stop(&self) {
        if self.is_running.swap(false, Ordering::AcqRel) {
            self.sdk.set_delegate(None);
            // notify_one also covers a loop that is mid-pass rather than
            // parked: the stored permit fires on its next wait.
            self.shutdown.notify_one();
            info!(target: "ClientProxy", "Client proxy stopped");
        }
    }

    fn did_receive_sync_update(&self) {
        self.sync_update.notify_one();
    }

    fn spawn_update_loop(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let sync_update = Arc::clone(&self.sync_update);
        let shutdown = Arc::clone(&self.shutdown);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.notified() => break,
                    _ = sync_update.notified() => {}
                }

                // Upgrade per pass; the loop must not keep the proxy alive.
                let Some(proxy) = weak.upgrade() else { break };
                if !proxy.is_running.load(Ordering::Acquire) {
                    break;
                }

                proxy.update_rooms().await;
            }
            debug!(target: "ClientProxy", "Update loop stopped");
        });
    }

    /// One reconciliation pass: fetch, filter, diff, apply, publish.
    async fn update_rooms(&self) {
        let sdk_rooms = self.sdk.rooms().await;

        // The fetch may have suspended across a teardown.
        if !self.is_running.load(Ordering::Acquire) {
            return;
        }

        debug!(target: "ClientProxy", "Retrieved {} rooms", sdk_rooms.len());

        // Spaces and tombstoned rooms never surface, including previously
        // cached rooms whose flag flipped since the last pass.
        let surfaced: Vec<Arc<dyn SdkRoom>> = sdk_rooms
            .into_iter()
            .filter(|room| !room.is_space() && !room.is_tombstoned())
            .collect();
        let new_ids: Vec<RoomId> = surfaced.iter().map(|room| room.id()).collect();
        let handles: HashMap<RoomId, Arc<dyn SdkRoom>> = surfaced
            .iter()
            .map(|room| (room.id(), Arc::clone(room)))
            .collect();

        let mut rooms = self.rooms.write().await;
        let outcome = reconcile::reconcile(&rooms, &new_ids, |id| match handles.get(id) {
            Some(handle) => Some(Arc::new(self.summary_factory.build(handle))),
            None => {
                error!(target: "ClientProxy", "Failed retrieving sdk room with id: {id}");
                None
            }
        });

        if !outcome.skipped.is_empty() {
            warn!(
                target: "ClientProxy",
                "Skipped {} unresolvable room insertion(s)",
                outcome.skipped.len()
            );
        }
        debug!(
            target: "ClientProxy",
            "Reconciled {} rooms ({} newly built)",
            outcome.entries.len(),
            outcome.built
        );

        *rooms = outcome.entries;
        let snapshot: Arc<Vec<Arc<RoomSummary>>> = Arc::new(rooms.values().cloned().collect());
        drop(rooms);

        // Publish only after the full mutation is applied.
        let _ = self
            .events
            .send(ClientProxyEvent::RoomListUpdated(snapshot));
    }
}

impl Drop for ClientProxy {
    fn drop(&mut self) {
        self.stop();
    }
}
