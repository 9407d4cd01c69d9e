//! Boundary traits for the external Matrix SDK.
//!
//! Everything protocol-shaped (sync, crypto, room state resolution,
//! networking) lives behind these traits. The rest of the crate only ever
//! sees identifiers, read-only room handles and the delegate callback.

pub mod in_memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("not found")]
    NotFound,
    #[error("sdk backend error: {0}")]
    Backend(String),
}

pub type SdkResult<T> = Result<T, SdkError>;

/// Stable room identifier, valid for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Reference to a piece of media content the SDK can resolve to bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaSource {
    url: String,
}

impl MediaSource {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// The most recent event in a room, as reported by the SDK.
#[derive(Debug, Clone, PartialEq)]
pub struct SdkEvent {
    pub event_id: String,
    pub sender_id: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

/// Read-only handle into one of the SDK's rooms.
pub trait SdkRoom: Send + Sync {
    fn id(&self) -> RoomId;

    /// Whether this entry is a structural grouping (space) rather than a
    /// conversable room.
    fn is_space(&self) -> bool;

    /// Whether the room has been permanently closed or superseded.
    fn is_tombstoned(&self) -> bool;

    fn display_name(&self) -> Option<String>;
    fn topic(&self) -> Option<String>;
    fn avatar_url(&self) -> Option<String>;
    fn is_direct(&self) -> bool;
    fn latest_event(&self) -> Option<SdkEvent>;
    fn member_display_name(&self, user_id: &str) -> Option<String>;
}

/// Push-style callbacks from the SDK's sync engine.
///
/// Delivery is at-least-once and not deduplicated; receivers are expected to
/// collapse bursts themselves.
pub trait SdkDelegate: Send + Sync {
    fn room_list_changed(&self);
}

/// Handle to an established SDK session.
#[async_trait]
pub trait SdkClient: Send + Sync {
    fn set_delegate(&self, delegate: Option<Arc<dyn SdkDelegate>>);
    fn start_sync(&self);

    fn user_id(&self) -> SdkResult<String>;

    /// The current room set, in backend order. May include spaces and
    /// tombstoned rooms; filtering is the caller's job.
    async fn rooms(&self) -> Vec<Arc<dyn SdkRoom>>;

    async fn display_name(&self) -> SdkResult<String>;
    async fn avatar_url(&self) -> SdkResult<String>;
    async fn media_content(&self, source: &MediaSource) -> SdkResult<Vec<u8>>;
}
