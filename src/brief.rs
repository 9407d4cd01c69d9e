//! Event briefs: the one-line "latest activity" rendering of a room.
//!
//! Sender display names are resolved through a per-room
//! [`MemberDetailProvider`] so repeated briefs for the same sender don't hit
//! the room handle again.

use crate::sdk::{RoomId, SdkEvent, SdkRoom};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct EventBrief {
    pub event_id: String,
    pub sender_id: String,
    pub sender_display_name: Option<String>,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

/// Lazily resolves and caches member display names for one room.
pub struct MemberDetailProvider {
    room: Arc<dyn SdkRoom>,
    display_names: DashMap<String, Option<String>>,
}

impl MemberDetailProvider {
    pub fn new(room: Arc<dyn SdkRoom>) -> Self {
        Self {
            room,
            display_names: DashMap::new(),
        }
    }

    pub fn display_name_for(&self, user_id: &str) -> Option<String> {
        if let Some(cached) = self.display_names.get(user_id) {
            return cached.clone();
        }

        let resolved = self.room.member_display_name(user_id);
        self.display_names
            .insert(user_id.to_string(), resolved.clone());
        resolved
    }
}

/// Hands out one shared [`MemberDetailProvider`] per room.
pub struct MemberDetailProviderManager {
    providers: DashMap<RoomId, Arc<MemberDetailProvider>>,
}

impl MemberDetailProviderManager {
    pub fn new() -> Self {
        Self {
            providers: DashMap::new(),
        }
    }

    pub fn provider_for_room(&self, room: &Arc<dyn SdkRoom>) -> Arc<MemberDetailProvider> {
        self.providers
            .entry(room.id())
            .or_insert_with(|| Arc::new(MemberDetailProvider::new(Arc::clone(room))))
            .clone()
    }
}

impl Default for MemberDetailProviderManager {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventBriefFactory {
    member_details: Arc<MemberDetailProvider>,
}

impl EventBriefFactory {
    pub fn new(member_details: Arc<MemberDetailProvider>) -> Self {
        Self { member_details }
    }

    pub fn build(&self, event: &SdkEvent) -> EventBrief {
        EventBrief {
            event_id: event.event_id.clone(),
            sender_id: event.sender_id.clone(),
            sender_display_name: self.member_details.display_name_for(&event.sender_id),
            body: event.body.clone(),
            timestamp: event.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::in_memory::InMemoryRoom;

    #[test]
    fn resolves_and_caches_sender_display_names() {
        let room = InMemoryRoom::new("!room:example.org");
        room.add_member("@alice:example.org", "Alice");

        let handle: Arc<dyn SdkRoom> = room.clone();
        let provider = MemberDetailProvider::new(handle);
        assert_eq!(
            provider.display_name_for("@alice:example.org"),
            Some("Alice".to_string())
        );

        // A later rename is not observed; the first resolution sticks.
        room.add_member("@alice:example.org", "Alice (renamed)");
        assert_eq!(
            provider.display_name_for("@alice:example.org"),
            Some("Alice".to_string())
        );

        assert_eq!(provider.display_name_for("@ghost:example.org"), None);
    }

    #[test]
    fn manager_returns_the_same_provider_per_room() {
        let room: Arc<dyn SdkRoom> = InMemoryRoom::new("!room:example.org");
        let manager = MemberDetailProviderManager::new();

        let first = manager.provider_for_room(&room);
        let second = manager.provider_for_room(&room);
        assert!(Arc::ptr_eq(&first, &second));
    }
}
