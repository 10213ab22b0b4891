//! Travelmap - world map travel tracker.
//!
//! Click a country on the map and the service counts the visit. Counts live
//! behind the [`store::VisitStore`] trait with two implementations:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      VisitStore Trait                        │
//! └─────────────────────────────────────────────────────────────┘
//!          ↑                              ↑
//!          │                              │
//! ┌────────┴────────┐           ┌────────┴────────┐
//! │   MemoryStore   │           │   DynamoStore   │
//! │  (demo, tests)  │           │  (production)   │
//! └─────────────────┘           └─────────────────┘
//! ```
//!
//! The HTTP front end in [`server`] maps a handful of fixed routes onto the
//! store and renders either JSON or a templated HTML page.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod server;
pub mod store;

// =============================================================================
// Constants
// =============================================================================

/// Default HTTP bind address
pub const HTTP_ADDR_DEFAULT: &str = "0.0.0.0:8080";

/// Per-request timeout applied uniformly to every connection
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Environment variable naming the DynamoDB table backing the remote store
pub const TABLE_NAME_ENV: &str = "TRAVELS_TABLE_NAME";

/// Path of the index page template, resolved against the working directory
pub const INDEX_TEMPLATE_PATH: &str = "templates/index.html";

/// Directory served under /static/
pub const STATIC_DIR: &str = "static";

/// Application name
pub const APP_NAME: &str = "travelmap";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
