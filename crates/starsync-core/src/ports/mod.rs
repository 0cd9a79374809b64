//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the use cases
//! depend on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IStarSource`] - Complete starred-set from the hosting platform (GitHub)
//! - [`ISnapshotStore`] - Local archive of the last known starred-set
//! - [`IBookmarkService`] - Bookmark service operations (Raindrop.io)
//! - [`IArchivePublisher`] - Version-control side effect after an archive write

pub mod bookmark_service;
pub mod publisher;
pub mod snapshot_store;
pub mod star_source;

pub use bookmark_service::IBookmarkService;
pub use publisher::IArchivePublisher;
pub use snapshot_store::ISnapshotStore;
pub use star_source::IStarSource;
