//! Presentation layer of a Matrix chat client.
//!
//! The protocol itself (sync, encryption, room state) lives in an external
//! SDK reached through the traits in [`sdk`]; this crate owns the client
//! proxy, the incremental room-list reconciliation and the presentation
//! entities built on top of it.

pub mod brief;
pub mod client;
pub mod media;
pub mod reconcile;
pub mod sdk;
pub mod session;
pub mod store;
pub mod summary;
