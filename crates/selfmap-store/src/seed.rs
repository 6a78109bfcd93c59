//! Seed configuration: the boundaries a process starts with

use crate::{Result, StoreError};
use selfmap_domain::{Boundary, BoundaryStatus, Provenance};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A TOML seed file listing initial boundaries
///
/// ```toml
/// [[boundary]]
/// domain = "language_generation"
/// status = "identified_core"
/// confidence = 0.95
/// rigidity = 0.9
/// rigidity_floor = 0.7
///
/// [[boundary]]
/// domain = "math"
/// status = "uncertain"
/// confidence = 0.5
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SeedFile {
    /// Seed entries
    #[serde(default, rename = "boundary")]
    pub boundaries: Vec<SeedBoundary>,
}

/// One pre-configured boundary
#[derive(Debug, Clone, Deserialize)]
pub struct SeedBoundary {
    /// Domain name
    pub domain: String,

    /// Initial status
    pub status: BoundaryStatus,

    /// Initial confidence
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    /// Initial rigidity
    #[serde(default = "default_rigidity")]
    pub rigidity: f64,

    /// Optional rigidity floor (meaningful for `identified_core`)
    #[serde(default)]
    pub rigidity_floor: Option<f64>,
}

fn default_confidence() -> f64 {
    0.5
}

fn default_rigidity() -> f64 {
    0.5
}

impl SeedBoundary {
    /// Build the boundary this seed describes
    ///
    /// Seeded boundaries carry `training` provenance. Out-of-range scalars
    /// are rejected the same way a corrupt snapshot would be.
    pub fn to_boundary(&self) -> Result<Boundary> {
        for (name, value) in [
            ("confidence", self.confidence),
            ("rigidity", self.rigidity),
            ("rigidity_floor", self.rigidity_floor.unwrap_or(0.0)),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(StoreError::CorruptState {
                    domain: self.domain.clone(),
                    reason: format!("seed {} {} outside [0, 1]", name, value),
                });
            }
        }

        let mut boundary = Boundary::new(
            &self.domain,
            self.status,
            self.confidence,
            self.rigidity,
            Provenance::Training,
        );
        boundary.rigidity_floor = self.rigidity_floor;
        Ok(boundary)
    }
}

/// Parse a seed file from disk
pub fn load_seed_file(path: &Path) -> Result<SeedFile> {
    let contents = fs::read_to_string(path)?;
    let seed: SeedFile = toml::from_str(&contents)?;
    tracing::debug!(path = %path.display(), count = seed.boundaries.len(), "loaded seed file");
    Ok(seed)
}
