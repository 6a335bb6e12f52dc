//! Gridmap Response Cache
//!
//! Rendered response bodies keyed by `(representation, canonical path)`.
//!
//! # Architecture
//!
//! ```text
//! GET  → ResponseCache::get ──miss──→ render from committed state → put_if_current
//! PUT / POST / DELETE → commit → ResponseCache::invalidate(InvalidationSet)
//! ```
//!
//! Entries never expire. They live until a mutation invalidates them.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod key;

pub use cache::{CacheEpoch, CacheStats, ResponseCache};
pub use key::{CacheKey, InvalidationSet};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
