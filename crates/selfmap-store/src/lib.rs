//! Selfmap Storage Layer
//!
//! Owns the in-memory mapping of domain name to [`Boundary`] record, enforces
//! the structural invariants on every mutation path, and persists the map as
//! a JSON snapshot with atomic-replace semantics.
//!
//! All writers go through the store's entry points; no caller mutates
//! boundary fields ad hoc. With the pipeline being single-threaded and
//! sequential, that single entry point is what makes each update atomic:
//! no partially-applied boundary is ever observable.
//!
//! # Examples
//!
//! ```
//! use selfmap_store::BoundaryStore;
//! use selfmap_domain::{Outcome, TestRecord};
//!
//! let mut store = BoundaryStore::new();
//! store.record("math", TestRecord::new("t-1", Outcome::Success, 1_000)).unwrap();
//! assert!(store.get("math").unwrap().tested);
//! ```

#![warn(missing_docs)]

mod persist;
mod seed;
mod store;

pub use persist::{load_snapshot, save_snapshot};
pub use seed::{load_seed_file, SeedBoundary, SeedFile};
pub use store::BoundaryStore;

use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The domain name is malformed and cannot name a boundary
    #[error("unknown domain: '{0}' is not a usable domain name")]
    UnknownDomain(String),

    /// The domain was superseded by a refinement split; the caller must
    /// re-classify the task into one of the children
    #[error("domain '{0}' is archived; re-classify into its children")]
    DomainArchived(String),

    /// A snapshot violated the structural invariants; never auto-repaired
    #[error("corrupt state in boundary '{domain}': {reason}")]
    CorruptState {
        /// Offending domain name
        domain: String,
        /// What was wrong
        reason: String,
    },

    /// A boundary with this name already exists and is not archived
    #[error("domain '{0}' already exists")]
    Duplicate(String),

    /// I/O error while reading or writing a snapshot or seed file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization error
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Seed file parsing error
    #[error("seed file error: {0}")]
    Seed(#[from] toml::de::Error),
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
