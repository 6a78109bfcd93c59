//! Selfmap Domain Layer
//!
//! This crate contains the core data model for the boundary-based self-model.
//! It defines the fundamental concepts and the trait interfaces that the
//! infrastructure layers (store, engine) depend upon.
//!
//! ## Key Concepts
//!
//! - **Boundary**: tracked record of competence in one capability domain
//! - **Confidence**: scalar belief in [0, 1] that the capability holds
//! - **Rigidity**: scalar resistance in [0, 1] to future revision
//! - **Provenance**: how a boundary came to exist (training, inference, implicit)
//! - **TestRecord**: one evaluated task instance appended to a boundary's history
//!
//! ## Architecture
//!
//! - Pure data and invariant checks only; no I/O
//! - Trait definitions for the external classifier and evaluator collaborators
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod boundary;
pub mod map;
pub mod outcome;
pub mod traits;

// Re-exports for convenience
pub use boundary::{Boundary, BoundaryStatus, Provenance};
pub use map::{BoundaryMap, InvariantViolation, Revision};
pub use outcome::{now_millis, Judgment, Outcome, TestRecord};
