//! UI-facing room summaries.
//!
//! A [`RoomSummary`] is built once per surfaced room identifier and then
//! carried across reconciliation passes unchanged; downstream diffing and
//! animation rely on that identity staying stable. Its media and brief
//! collaborators are wired at construction, never per pass.

use crate::brief::{EventBrief, EventBriefFactory, MemberDetailProviderManager};
use crate::media::{MediaProvider, MediaProviderError};
use crate::sdk::{RoomId, SdkRoom};
use std::fmt;
use std::sync::Arc;

pub struct RoomSummary {
    room: Arc<dyn SdkRoom>,
    media: Arc<MediaProvider>,
    brief_factory: EventBriefFactory,
}

impl RoomSummary {
    fn new(
        room: Arc<dyn SdkRoom>,
        media: Arc<MediaProvider>,
        brief_factory: EventBriefFactory,
    ) -> Self {
        Self {
            room,
            media,
            brief_factory,
        }
    }

    pub fn id(&self) -> RoomId {
        self.room.id()
    }

    pub fn display_name(&self) -> Option<String> {
        self.room.display_name()
    }

    pub fn topic(&self) -> Option<String> {
        self.room.topic()
    }

    pub fn avatar_url(&self) -> Option<String> {
        self.room.avatar_url()
    }

    pub fn is_direct(&self) -> bool {
        self.room.is_direct()
    }

    /// Brief of the room's most recent event, if it has one.
    pub fn latest_event_brief(&self) -> Option<EventBrief> {
        self.room
            .latest_event()
            .map(|event| self.brief_factory.build(&event))
    }

    /// Avatar bytes, or `Ok(None)` when the room has no avatar set.
    pub async fn load_avatar(&self) -> Result<Option<Arc<Vec<u8>>>, MediaProviderError> {
        match self.room.avatar_url() {
            Some(url) => self.media.load_image_from_url(&url).await.map(Some),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for RoomSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomSummary")
            .field("id", &self.id())
            .field("display_name", &self.display_name())
            .finish()
    }
}

/// Builds summaries for rooms entering the cache.
pub struct RoomSummaryFactory {
    media: Arc<MediaProvider>,
    member_details: Arc<MemberDetailProviderManager>,
}

impl RoomSummaryFactory {
    pub fn new(media: Arc<MediaProvider>) -> Self {
        Self {
            media,
            member_details: Arc::new(MemberDetailProviderManager::new()),
        }
    }

    pub fn build(&self, room: &Arc<dyn SdkRoom>) -> RoomSummary {
        let provider = self.member_details.provider_for_room(room);
        RoomSummary::new(
            Arc::clone(room),
            Arc::clone(&self.media),
            EventBriefFactory::new(provider),
        )
    }
}
