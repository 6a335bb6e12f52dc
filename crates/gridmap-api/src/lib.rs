//! Gridmap API
//!
//! REST surface over the grid world: maps, the observers placed on them
//! and their obstacles, each served as plain JSON or as a Mason
//! hypermedia document.
//!
//! # Architecture
//!
//! ```text
//! warp filter → Router ──► resources::{map, observer, obstacle}
//!                 │              │
//!           negotiation     AppState { store, cache, renderer, validator }
//! ```
//!
//! GET bodies are cached per `(representation, path)`. Every committed
//! mutation drops exactly the paths listed in [`invalidation`].
//!
//! # Example
//!
//! ```rust,ignore
//! use gridmap_api::{ApiRequest, AppState, GridmapConfig, Router};
//!
//! let state = AppState::in_memory(&GridmapConfig::default())?;
//! let router = Router::new(std::sync::Arc::new(state));
//! let response = router.handle(ApiRequest::new(Method::GET, "/api/maps/")).await;
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod invalidation;
pub mod logging;
pub mod management;
pub mod negotiation;
pub mod resources;
pub mod response;
pub mod router;
pub mod server;
pub mod state;

pub use config::{ConfigError, GridmapConfig};
pub use error::{ApiError, ApiResult};
pub use response::ApiResponse;
pub use router::{ApiRequest, Route, Router};
pub use state::AppState;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
