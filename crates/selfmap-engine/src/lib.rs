//! Selfmap Engine
//!
//! The boundary maintenance engine: consumes evaluated test outcomes one at
//! a time, adjusts per-domain confidence and rigidity, applies the
//! status-transition rules, splits domains whose evidence is too mixed to be
//! explained by a single boundary, and renders deterministic self-descriptions
//! from the resulting map.
//!
//! Task classification, task execution, and outcome evaluation are external
//! collaborators behind the traits in `selfmap_domain::traits`; the engine
//! only requires that the caller supply an evaluated outcome.
//!
//! # Examples
//!
//! ```
//! use selfmap_engine::{EngineConfig, SelfModel};
//! use selfmap_domain::Outcome;
//!
//! let mut model = SelfModel::new(EngineConfig::default()).unwrap();
//! model.report_outcome("math", Outcome::Success, &["arithmetic"]).unwrap();
//! println!("{}", model.describe());
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod describe;
pub mod engine;
pub mod error;
pub mod refine;
pub mod update;

pub use config::EngineConfig;
pub use engine::{Report, SelfModel};
pub use error::{EngineError, Result};
pub use update::StatusChange;
