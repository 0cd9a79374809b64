//! Use cases (interactors) for Starsync
//!
//! This module contains the application use cases that orchestrate
//! domain entities and port interfaces. Use cases are thin coordinators
//! that delegate set logic to the domain and I/O to ports.
//!
//! ## Use Cases
//!
//! - [`Reconciler`] - Pure identity-keyed diff between two snapshots
//! - [`ProjectBookmarksUseCase`] - Idempotent projection of a diff onto the bookmark service
//! - [`SyncStarsUseCase`] - One full run: load, fetch, diff, persist, publish, project

pub mod project_bookmarks;
pub mod reconcile;
pub mod sync_stars;

#[cfg(test)]
pub(crate) mod testing;

pub use project_bookmarks::{AdditionReport, ProjectBookmarksUseCase, RemovalReport};
pub use reconcile::Reconciler;
pub use sync_stars::{
    PreviewStarsUseCase, PublishOutcome, SyncOptions, SyncPreview, SyncReport, SyncStarsUseCase,
};
