//! Error types for the boundary maintenance engine

use selfmap_store::StoreError;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine-level errors
///
/// Each variant is recoverable at the scope of a single report except
/// `CorruptState`, which is fatal to the load operation that produced it.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The report names a domain that does not exist and cannot be created
    /// implicitly (malformed name); the single report is rejected
    #[error("unknown domain: '{0}' is not a usable domain name")]
    UnknownDomain(String),

    /// The domain was superseded by a refinement split; the caller must
    /// re-classify the task into one of the children
    #[error("domain '{0}' is archived; re-classify into its children")]
    DomainArchived(String),

    /// A snapshot violated the structural invariants; surfaced with the
    /// offending boundary identified, never auto-repaired
    #[error("corrupt state in boundary '{domain}': {reason}")]
    CorruptState {
        /// Offending domain name
        domain: String,
        /// What was wrong
        reason: String,
    },

    /// The outcome value is outside the defined enum; no mutation occurred
    #[error("invalid outcome: '{0}'")]
    InvalidOutcome(String),

    /// Any other store failure (I/O, serialization, seed parsing)
    #[error("store error: {0}")]
    Store(#[source] StoreError),

    /// Configuration file failure
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownDomain(domain) => EngineError::UnknownDomain(domain),
            StoreError::DomainArchived(domain) => EngineError::DomainArchived(domain),
            StoreError::CorruptState { domain, reason } => {
                EngineError::CorruptState { domain, reason }
            }
            other => EngineError::Store(other),
        }
    }
}
