//! Daily Papers Client Library
//!
//! Client-side state for the Daily Papers platform:
//! - Paper record and lifecycle status model
//! - Typed transport over the `/api/v1` HTTP contract
//! - Listing, detail and overview controllers
//! - Batch submission reconciliation
//! - Crawl task tracking with a separate polling policy
//! - Conversation session for paper Q&A
//! - Configuration, error types and metrics

pub mod api;
pub mod config;
pub mod conversation;
pub mod detail;
pub mod errors;
pub mod listing;
pub mod metrics;
pub mod models;
pub mod overview;
pub mod submission;
pub mod tasks;

// Re-export commonly used types
pub use api::{HttpPaperApi, PaperApi};
pub use config::ClientConfig;
pub use errors::{ClientError, Result, TransportError, ValidationError};
pub use models::{PaperDetail, PaperListItem, PaperStatus};

/// Client version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base path of the platform's HTTP contract
pub const API_PREFIX: &str = "/api/v1";

/// Default number of papers requested per listing page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum number of identifiers accepted in one submission
pub const MAX_SUBMIT_BATCH: usize = 50;
