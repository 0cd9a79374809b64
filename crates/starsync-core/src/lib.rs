//! Starsync Core - Domain logic and reconciliation rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `StarredItem`, `Snapshot`, `DiffResult`, `BookmarkDraft`
//! - **Use cases** - `Reconciler`, `ProjectBookmarksUseCase`, `SyncStarsUseCase`
//! - **Port definitions** - Traits for adapters: `IStarSource`, `ISnapshotStore`,
//!   `IBookmarkService`, `IArchivePublisher`
//!
//! # Architecture
//!
//! The domain module contains pure data and set logic with no I/O.
//! Ports define trait interfaces that adapter crates implement.
//! Use cases orchestrate domain entities through port interfaces.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
