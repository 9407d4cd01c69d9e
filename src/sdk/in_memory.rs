//! In-memory SDK session for tests and the demo binary.

use super::{
    MediaSource, RoomId, SdkClient, SdkDelegate, SdkError, SdkEvent, SdkResult, SdkRoom,
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

pub struct InMemoryRoom {
    id: RoomId,
    display_name: RwLock<Option<String>>,
    topic: RwLock<Option<String>>,
    avatar_url: RwLock<Option<String>>,
    is_direct: bool,
    is_space: AtomicBool,
    is_tombstoned: AtomicBool,
    latest_event: RwLock<Option<SdkEvent>>,
    members: DashMap<String, String>,
}

impl InMemoryRoom {
    pub fn new(id: impl Into<RoomId>) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            display_name: RwLock::new(None),
            topic: RwLock::new(None),
            avatar_url: RwLock::new(None),
            is_direct: false,
            is_space: AtomicBool::new(false),
            is_tombstoned: AtomicBool::new(false),
            latest_event: RwLock::new(None),
            members: DashMap::new(),
        })
    }

    pub fn space(id: impl Into<RoomId>) -> Arc<Self> {
        let room = Self::new(id);
        room.is_space.store(true, Ordering::Release);
        room
    }

    pub fn set_display_name(&self, name: impl Into<String>) {
        *self.display_name.write().unwrap() = Some(name.into());
    }

    pub fn set_avatar_url(&self, url: impl Into<String>) {
        *self.avatar_url.write().unwrap() = Some(url.into());
    }

    pub fn set_tombstoned(&self, tombstoned: bool) {
        self.is_tombstoned.store(tombstoned, Ordering::Release);
    }

    pub fn set_latest_event(&self, event: SdkEvent) {
        *self.latest_event.write().unwrap() = Some(event);
    }

    pub fn add_member(&self, user_id: impl Into<String>, display_name: impl Into<String>) {
        self.members.insert(user_id.into(), display_name.into());
    }
}

impl SdkRoom for InMemoryRoom {
    fn id(&self) -> RoomId {
        self.id.clone()
    }

    fn is_space(&self) -> bool {
        self.is_space.load(Ordering::Acquire)
    }

    fn is_tombstoned(&self) -> bool {
        self.is_tombstoned.load(Ordering::Acquire)
    }

    fn display_name(&self) -> Option<String> {
        self.display_name.read().unwrap().clone()
    }

    fn topic(&self) -> Option<String> {
        self.topic.read().unwrap().clone()
    }

    fn avatar_url(&self) -> Option<String> {
        self.avatar_url.read().unwrap().clone()
    }

    fn is_direct(&self) -> bool {
        self.is_direct
    }

    fn latest_event(&self) -> Option<SdkEvent> {
        self.latest_event.read().unwrap().clone()
    }

    fn member_display_name(&self, user_id: &str) -> Option<String> {
        self.members.get(user_id).map(|name| name.clone())
    }
}

/// Fake session handle. Room mutations notify the installed delegate, which
/// is how tests and the demo drive reconciliation passes.
pub struct InMemorySdkClient {
    user_id: String,
    display_name: RwLock<Option<String>>,
    avatar_url: RwLock<Option<String>>,
    rooms: RwLock<Vec<Arc<InMemoryRoom>>>,
    delegate: RwLock<Option<Arc<dyn SdkDelegate>>>,
    media: RwLock<HashMap<MediaSource, Vec<u8>>>,
    media_fetches: AtomicUsize,
}

impl InMemorySdkClient {
    pub fn new(user_id: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            user_id: user_id.into(),
            display_name: RwLock::new(None),
            avatar_url: RwLock::new(None),
            rooms: RwLock::new(Vec::new()),
            delegate: RwLock::new(None),
            media: RwLock::new(HashMap::new()),
            media_fetches: AtomicUsize::new(0),
        })
    }

    pub fn set_display_name(&self, name: impl Into<String>) {
        *self.display_name.write().unwrap() = Some(name.into());
    }

    pub fn set_avatar_url(&self, url: impl Into<String>) {
        *self.avatar_url.write().unwrap() = Some(url.into());
    }

    /// Replaces the backend room set and signals a room-list change.
    pub fn set_rooms(&self, rooms: Vec<Arc<InMemoryRoom>>) {
        *self.rooms.write().unwrap() = rooms;
        self.notify_room_list_changed();
    }

    /// Re-delivers the change notification without touching the room set,
    /// e.g. after flipping a flag on an existing room.
    pub fn notify_room_list_changed(&self) {
        let delegate = self.delegate.read().unwrap().clone();
        if let Some(delegate) = delegate {
            delegate.room_list_changed();
        }
    }

    pub fn insert_media(&self, source: MediaSource, bytes: Vec<u8>) {
        self.media.write().unwrap().insert(source, bytes);
    }

    /// How many times media bytes were actually served (cache misses only).
    pub fn media_fetches(&self) -> usize {
        self.media_fetches.load(Ordering::Acquire)
    }
}

#[async_trait]
impl SdkClient for InMemorySdkClient {
    fn set_delegate(&self, delegate: Option<Arc<dyn SdkDelegate>>) {
        *self.delegate.write().unwrap() = delegate;
    }

    fn start_sync(&self) {}

    fn user_id(&self) -> SdkResult<String> {
        Ok(self.user_id.clone())
    }

    async fn rooms(&self) -> Vec<Arc<dyn SdkRoom>> {
        self.rooms
            .read()
            .unwrap()
            .iter()
            .map(|room| Arc::clone(room) as Arc<dyn SdkRoom>)
            .collect()
    }

    async fn display_name(&self) -> SdkResult<String> {
        self.display_name.read().unwrap().clone().ok_or(SdkError::NotFound)
    }

    async fn avatar_url(&self) -> SdkResult<String> {
        self.avatar_url.read().unwrap().clone().ok_or(SdkError::NotFound)
    }

    async fn media_content(&self, source: &MediaSource) -> SdkResult<Vec<u8>> {
        let bytes = self.media.read().unwrap().get(source).cloned();
        match bytes {
            Some(bytes) => {
                self.media_fetches.fetch_add(1, Ordering::AcqRel);
                Ok(bytes)
            }
            None => Err(SdkError::NotFound),
        }
    }
}
