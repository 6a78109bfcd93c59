//! The full domain-to-boundary mapping and its structural invariants

use crate::boundary::Boundary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Audit entry for one refinement split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    /// Domain that was split
    pub original_domain: String,

    /// Domains the split produced
    pub new_domains: Vec<String>,

    /// What caused the split (e.g. "mixed_evidence")
    pub trigger: String,

    /// When the split happened (millis since epoch)
    pub timestamp: i64,
}

/// The full mapping of domain name to boundary
///
/// A `BTreeMap` keeps iteration order deterministic, which the description
/// generator and the snapshot format both rely on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryMap {
    /// All boundaries, archived ones included, keyed by domain name
    pub boundaries: BTreeMap<String, Boundary>,

    /// Append-only audit log of refinement splits
    #[serde(default)]
    pub revisions: Vec<Revision>,
}

/// A structural invariant broken by a specific boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Offending domain name
    pub domain: String,

    /// What was wrong
    pub reason: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "boundary '{}': {}", self.domain, self.reason)
    }
}

impl BoundaryMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate over non-archived boundaries, ordered by domain name
    pub fn active(&self) -> impl Iterator<Item = &Boundary> {
        self.boundaries.values().filter(|b| !b.archived)
    }

    /// Check every structural invariant, reporting the first violation found
    ///
    /// - map key matches the boundary's own `domain` field
    /// - confidence, rigidity, and any floor are within [0, 1]
    /// - `identified_core` rigidity does not sit below its floor
    /// - `derived_from` references an existing (possibly archived) domain
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        for (key, b) in &self.boundaries {
            let fail = |reason: String| InvariantViolation {
                domain: key.clone(),
                reason,
            };

            if *key != b.domain {
                return Err(fail(format!("stored under key '{}' but named '{}'", key, b.domain)));
            }
            if !(0.0..=1.0).contains(&b.confidence) {
                return Err(fail(format!("confidence {} outside [0, 1]", b.confidence)));
            }
            if !(0.0..=1.0).contains(&b.rigidity) {
                return Err(fail(format!("rigidity {} outside [0, 1]", b.rigidity)));
            }
            if let Some(floor) = b.rigidity_floor {
                if !(0.0..=1.0).contains(&floor) {
                    return Err(fail(format!("rigidity floor {} outside [0, 1]", floor)));
                }
            }
            if b.rigidity < b.floor() {
                return Err(fail(format!(
                    "rigidity {} below enforced floor {}",
                    b.rigidity,
                    b.floor()
                )));
            }
            if let Some(parent) = &b.derived_from {
                if !self.boundaries.contains_key(parent) {
                    return Err(fail(format!("derived_from references missing domain '{}'", parent)));
                }
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::boundary::{BoundaryStatus, Provenance};
    use proptest::prelude::*;

    proptest! {
        /// Property: any boundary with in-range scalars and no parent passes validation
        #[test]
        fn test_in_range_scalars_validate(confidence in 0.0f64..=1.0, rigidity in 0.0f64..=1.0) {
            let mut map = BoundaryMap::new();
            map.boundaries.insert(
                "math".into(),
                Boundary::new("math", BoundaryStatus::Uncertain, confidence, rigidity, Provenance::Implicit),
            );
            prop_assert!(map.validate().is_ok());
        }

        /// Property: confidence strictly outside [0, 1] always fails validation
        #[test]
        fn test_out_of_range_confidence_fails(excess in 1.0001f64..10.0) {
            let mut map = BoundaryMap::new();
            map.boundaries.insert(
                "math".into(),
                Boundary::new("math", BoundaryStatus::Uncertain, excess, 0.5, Provenance::Implicit),
            );
            prop_assert!(map.validate().is_err());
        }
    }
}
