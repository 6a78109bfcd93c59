//! In-memory boundary store with a single mutation entry point

use crate::seed::SeedBoundary;
use crate::{persist, Result, StoreError};
use selfmap_domain::{Boundary, BoundaryMap, BoundaryStatus, Provenance, Revision, TestRecord};
use std::path::Path;

/// Default confidence for implicitly created boundaries
pub(crate) const DEFAULT_IMPLICIT_CONFIDENCE: f64 = 0.5;

/// Default rigidity for implicitly created boundaries
pub(crate) const DEFAULT_IMPLICIT_RIGIDITY: f64 = 0.5;

/// Owns the [`BoundaryMap`] and enforces its invariants on mutation
///
/// Boundaries are created either from seed configuration or implicitly when
/// a caller names a domain the store has not seen. They are never physically
/// destroyed; a refinement split archives the parent instead.
#[derive(Debug, Clone)]
pub struct BoundaryStore {
    map: BoundaryMap,
    implicit_confidence: f64,
    implicit_rigidity: f64,
}

impl Default for BoundaryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundaryStore {
    /// Create an empty store with default implicit-boundary parameters
    pub fn new() -> Self {
        Self::with_defaults(DEFAULT_IMPLICIT_CONFIDENCE, DEFAULT_IMPLICIT_RIGIDITY)
    }

    /// Create an empty store with configured implicit-boundary parameters
    pub fn with_defaults(implicit_confidence: f64, implicit_rigidity: f64) -> Self {
        Self {
            map: BoundaryMap::new(),
            implicit_confidence,
            implicit_rigidity,
        }
    }

    /// Populate the store from seed configuration
    ///
    /// Fails with [`StoreError::Duplicate`] if a seed names a domain twice.
    pub fn seed(&mut self, seeds: &[SeedBoundary]) -> Result<()> {
        for seed in seeds {
            self.insert(seed.to_boundary()?)?;
        }
        tracing::info!(count = seeds.len(), "seeded boundary store");
        Ok(())
    }

    /// Look up a boundary by domain name, archived or not
    pub fn get(&self, domain: &str) -> Option<&Boundary> {
        self.map.boundaries.get(domain)
    }

    /// Fetch the boundary for `domain`, creating an `uncertain` one if absent
    ///
    /// Never returns an archived boundary under its original name; reports
    /// against an archived domain must be re-classified into its children,
    /// which [`StoreError::DomainArchived`] signals to the caller.
    pub fn get_or_create(&mut self, domain: &str) -> Result<&mut Boundary> {
        if !valid_domain(domain) {
            return Err(StoreError::UnknownDomain(domain.to_string()));
        }
        if let Some(existing) = self.map.boundaries.get(domain) {
            if existing.archived {
                return Err(StoreError::DomainArchived(domain.to_string()));
            }
        } else {
            tracing::info!(domain, "creating implicit boundary for unseen domain");
            self.map.boundaries.insert(
                domain.to_string(),
                Boundary::new(
                    domain,
                    BoundaryStatus::Uncertain,
                    self.implicit_confidence,
                    self.implicit_rigidity,
                    Provenance::Inference,
                ),
            );
        }
        // Both arms above guarantee presence of a non-archived entry.
        self.map
            .boundaries
            .get_mut(domain)
            .ok_or_else(|| StoreError::UnknownDomain(domain.to_string()))
    }

    /// Append a test record to a boundary's history
    ///
    /// The single-threaded pipeline and this single entry point together
    /// guarantee no partially-appended record is ever visible to a read.
    pub fn record(&mut self, domain: &str, record: TestRecord) -> Result<()> {
        let boundary = self.get_or_create(domain)?;
        boundary.tested = true;
        boundary.last_interaction = record.timestamp;
        boundary.test_history.push(record);
        Ok(())
    }

    /// Insert a fully formed boundary (seeds and refinement children)
    ///
    /// Rejects values outside [0, 1] rather than clamping, and rejects names
    /// already present in the map, archived or not: archived boundaries are
    /// retained for audit and their names stay reserved.
    pub fn insert(&mut self, boundary: Boundary) -> Result<()> {
        if !valid_domain(&boundary.domain) {
            return Err(StoreError::UnknownDomain(boundary.domain));
        }
        if self.map.boundaries.contains_key(&boundary.domain) {
            return Err(StoreError::Duplicate(boundary.domain));
        }
        if !(0.0..=1.0).contains(&boundary.confidence) || !(0.0..=1.0).contains(&boundary.rigidity)
        {
            return Err(StoreError::CorruptState {
                domain: boundary.domain,
                reason: "confidence or rigidity outside [0, 1]".to_string(),
            });
        }
        self.map.boundaries.insert(boundary.domain.clone(), boundary);
        Ok(())
    }

    /// Check whether a non-archived boundary exists under this name
    pub fn contains_active(&self, domain: &str) -> bool {
        self.map
            .boundaries
            .get(domain)
            .is_some_and(|b| !b.archived)
    }

    /// Archive a boundary, retaining it and its history for audit
    pub fn archive(&mut self, domain: &str) -> Result<()> {
        let boundary = self
            .map
            .boundaries
            .get_mut(domain)
            .ok_or_else(|| StoreError::UnknownDomain(domain.to_string()))?;
        boundary.archived = true;
        tracing::info!(domain, "archived boundary");
        Ok(())
    }

    /// Append a refinement audit entry
    pub fn push_revision(&mut self, revision: Revision) {
        self.map.revisions.push(revision);
    }

    /// Full-state dump
    pub fn snapshot(&self) -> BoundaryMap {
        self.map.clone()
    }

    /// Replace the full state, rejecting any map that violates the invariants
    ///
    /// On failure the previous state is left untouched; nothing is repaired.
    pub fn restore(&mut self, map: BoundaryMap) -> Result<()> {
        map.validate().map_err(|v| StoreError::CorruptState {
            domain: v.domain,
            reason: v.reason,
        })?;
        self.map = map;
        Ok(())
    }

    /// Read-only view of the full map
    pub fn map(&self) -> &BoundaryMap {
        &self.map
    }

    /// Iterate over non-archived boundaries, ordered by domain name
    pub fn active(&self) -> impl Iterator<Item = &Boundary> {
        self.map.active()
    }

    /// Persist the current map as a JSON snapshot with atomic replace
    pub fn save(&self, path: &Path) -> Result<()> {
        persist::save_snapshot(&self.map, path)
    }

    /// Load a snapshot from disk into this store
    ///
    /// Fails with [`StoreError::CorruptState`] on any invariant violation,
    /// leaving the in-memory state unchanged.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let map = persist::load_snapshot(path)?;
        self.restore(map)
    }
}

/// A usable domain name: non-blank, printable
fn valid_domain(domain: &str) -> bool {
    !domain.trim().is_empty() && !domain.chars().any(char::is_control)
}

#[cfg(test)]
mod tests {
    use super::*;
    use selfmap_domain::Outcome;

    #[test]
    fn test_get_or_create_makes_uncertain_boundary() {
        let mut store = BoundaryStore::new();
        let b = store.get_or_create("poetry").unwrap();

        assert_eq!(b.status, BoundaryStatus::Uncertain);
        assert_eq!(b.provenance, Provenance::Inference);
        assert_eq!(b.confidence, DEFAULT_IMPLICIT_CONFIDENCE);
        assert!(!b.tested);
    }

    #[test]
    fn test_malformed_names_rejected() {
        let mut store = BoundaryStore::new();
        assert!(matches!(
            store.get_or_create(""),
            Err(StoreError::UnknownDomain(_))
        ));
        assert!(matches!(
            store.get_or_create("   "),
            Err(StoreError::UnknownDomain(_))
        ));
        assert!(matches!(
            store.get_or_create("ma\x07th"),
            Err(StoreError::UnknownDomain(_))
        ));
    }

    #[test]
    fn test_archived_boundary_not_returned() {
        let mut store = BoundaryStore::new();
        store.get_or_create("math").unwrap();
        store.archive("math").unwrap();

        assert!(matches!(
            store.get_or_create("math"),
            Err(StoreError::DomainArchived(_))
        ));
        // Still present for audit.
        assert!(store.get("math").unwrap().archived);
    }

    #[test]
    fn test_record_appends_in_order_and_marks_tested() {
        let mut store = BoundaryStore::new();
        store
            .record("math", TestRecord::new("t-1", Outcome::Success, 1))
            .unwrap();
        store
            .record("math", TestRecord::new("t-2", Outcome::Failure, 2))
            .unwrap();

        let b = store.get("math").unwrap();
        assert!(b.tested);
        assert_eq!(b.last_interaction, 2);
        let ids: Vec<_> = b.test_history.iter().map(|r| r.task_id.as_str()).collect();
        assert_eq!(ids, vec!["t-1", "t-2"]);
    }

    #[test]
    fn test_insert_rejects_duplicates_and_bad_ranges() {
        let mut store = BoundaryStore::new();
        store.get_or_create("math").unwrap();

        let dup = Boundary::new("math", BoundaryStatus::Held, 0.5, 0.5, Provenance::Training);
        assert!(matches!(store.insert(dup), Err(StoreError::Duplicate(_))));

        let bad = Boundary::new("bad", BoundaryStatus::Held, 1.4, 0.5, Provenance::Training);
        assert!(matches!(
            store.insert(bad),
            Err(StoreError::CorruptState { .. })
        ));
    }

    #[test]
    fn test_restore_rejects_corrupt_map_and_keeps_prior_state() {
        let mut store = BoundaryStore::new();
        store.get_or_create("math").unwrap();

        let mut corrupt = BoundaryMap::new();
        corrupt.boundaries.insert(
            "coding".into(),
            Boundary::new("coding", BoundaryStatus::Uncertain, 1.4, 0.5, Provenance::Implicit),
        );

        let err = store.restore(corrupt).unwrap_err();
        match err {
            StoreError::CorruptState { domain, .. } => assert_eq!(domain, "coding"),
            other => panic!("expected CorruptState, got {other}"),
        }
        // Prior state untouched.
        assert!(store.get("math").is_some());
        assert!(store.get("coding").is_none());
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut store = BoundaryStore::new();
        store
            .record("math", TestRecord::new("t-1", Outcome::Success, 1))
            .unwrap();
        let snapshot = store.snapshot();

        let mut other = BoundaryStore::new();
        other.restore(snapshot.clone()).unwrap();
        assert_eq!(other.snapshot(), snapshot);
    }
}
