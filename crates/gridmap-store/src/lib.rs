//! Gridmap Store
//!
//! The persistence gateway consumed by the resource handlers, and an
//! in-process implementation of it.
//!
//! # Guarantees
//!
//! - Every mutating call is one atomic transaction
//! - Name and slug uniqueness is decided at commit time and reported as
//!   [`StoreError::UniquenessConflict`]
//! - Deleting a map deletes its observers and obstacles in the same
//!   transaction
//! - Mutations report the rows they committed against, read under the
//!   same lock
//!
//! # Example
//!
//! ```rust,ignore
//! use gridmap_store::{MemoryStore, PersistenceGateway};
//!
//! let store = MemoryStore::new();
//! let map = store.insert_map(draft).await?;
//! let removed = store.delete_map(map.id).await?;
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod gateway;
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use gateway::{Committed, MapChildren, MapUpdate, PersistenceGateway, RemovedMap};
pub use memory::MemoryStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
