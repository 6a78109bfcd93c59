//! The outward query surface: report outcomes, describe, snapshot

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::update::StatusChange;
use crate::{describe, refine, update};
use selfmap_domain::{now_millis, BoundaryMap, Outcome, Revision, TestRecord};
use selfmap_store::{BoundaryStore, SeedBoundary};
use std::path::Path;

/// What one reported outcome did to the map
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Domain the outcome was recorded against
    pub domain: String,

    /// Status transition, if the update rules produced one
    pub status_change: Option<StatusChange>,

    /// Children created by a refinement split, empty if none triggered
    pub refined_into: Vec<String>,
}

/// The boundary maintenance engine
///
/// Owns the store and processes one test outcome at a time: update rules
/// first, then the refinement check for the same domain. The pipeline is
/// single-threaded and each boundary mutation goes through the store's
/// single entry point, so no partially-updated boundary is ever observable.
#[derive(Debug)]
pub struct SelfModel {
    config: EngineConfig,
    store: BoundaryStore,
    task_counter: u64,
}

impl SelfModel {
    /// Create an engine with an empty store
    pub fn new(config: EngineConfig) -> Result<Self> {
        let config = config.validated()?;
        let store =
            BoundaryStore::with_defaults(config.implicit_confidence, config.implicit_rigidity);
        Ok(Self {
            config,
            store,
            task_counter: 0,
        })
    }

    /// Create an engine pre-populated from seed configuration
    pub fn with_seeds(config: EngineConfig, seeds: &[SeedBoundary]) -> Result<Self> {
        let mut engine = Self::new(config)?;
        engine.store.seed(seeds)?;
        Ok(engine)
    }

    /// Record one evaluated outcome against a domain
    ///
    /// Convenience form of [`SelfModel::report`]: ground-truth judgment,
    /// current wall-clock timestamp, generated task id.
    pub fn report_outcome(
        &mut self,
        domain: &str,
        outcome: Outcome,
        tags: &[&str],
    ) -> Result<Report> {
        self.task_counter += 1;
        let record = TestRecord::new(format!("task-{}", self.task_counter), outcome, now_millis())
            .with_tags(tags.iter().copied());
        self.report(domain, record)
    }

    /// Record an outcome supplied as text, e.g. from a collaborator response
    ///
    /// A value outside the defined outcome enum is rejected before any
    /// mutation happens.
    pub fn report_raw(&mut self, domain: &str, outcome: &str, tags: &[&str]) -> Result<Report> {
        let outcome =
            Outcome::parse(outcome).ok_or_else(|| EngineError::InvalidOutcome(outcome.into()))?;
        self.report_outcome(domain, outcome, tags)
    }

    /// Record a fully specified test record against a domain
    ///
    /// Runs the update rules, then checks the same domain for a refinement
    /// split. Reporting against an archived domain fails with
    /// [`EngineError::DomainArchived`]; the engine does not reroute
    /// misdirected reports, the caller re-classifies into a child.
    pub fn report(&mut self, domain: &str, record: TestRecord) -> Result<Report> {
        let boundary = self.store.get_or_create(domain)?;
        let status_change = update::apply_outcome(&self.config, boundary, record);
        let refined_into = self.maybe_refine(domain)?;

        Ok(Report {
            domain: domain.to_string(),
            status_change,
            refined_into,
        })
    }

    /// Render the current self-description
    pub fn describe(&self) -> String {
        describe::describe(self.store.map())
    }

    /// Render the grouped boundary summary (system-prompt form)
    pub fn summary(&self) -> String {
        describe::summary(self.store.map())
    }

    /// Read-only view of the full map, archived boundaries included
    pub fn current_map(&self) -> &BoundaryMap {
        self.store.map()
    }

    /// The engine's configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Persist the map as a JSON snapshot with atomic replace
    pub fn save(&self, path: &Path) -> Result<()> {
        self.store.save(path).map_err(Into::into)
    }

    /// Replace the map from a snapshot, rejecting corrupt state
    pub fn load(&mut self, path: &Path) -> Result<()> {
        self.store.load(path).map_err(Into::into)
    }

    /// Split `domain` if its recent evidence warrants it
    ///
    /// Archives the parent, inserts the children, and records the revision.
    /// Returns the child names, empty when nothing triggered.
    fn maybe_refine(&mut self, domain: &str) -> Result<Vec<String>> {
        let parent = match self.store.get(domain) {
            Some(parent) => parent,
            None => return Ok(Vec::new()),
        };
        if !refine::should_refine(&self.config, parent) {
            return Ok(Vec::new());
        }
        let children = match refine::propose_split(&self.config, parent) {
            Some(children) => children,
            None => {
                tracing::debug!(domain, "evidence is mixed but untagged; split skipped");
                return Ok(Vec::new());
            }
        };
        let split_at = parent.last_interaction;

        self.store.archive(domain)?;
        let mut names = Vec::with_capacity(children.len());
        for mut child in children {
            child.domain = self.unique_name(child.domain);
            names.push(child.domain.clone());
            self.store.insert(child)?;
        }
        self.store.push_revision(Revision {
            original_domain: domain.to_string(),
            new_domains: names.clone(),
            trigger: "mixed_evidence".to_string(),
            timestamp: split_at,
        });
        tracing::info!(domain, children = ?names, "refined boundary into children");
        Ok(names)
    }

    /// Resolve name collisions with existing (possibly archived) domains
    fn unique_name(&self, base: String) -> String {
        if self.store.get(&base).is_none() {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", base, n);
            if self.store.get(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selfmap_domain::BoundaryStatus;

    fn engine() -> SelfModel {
        SelfModel::new(EngineConfig::default()).unwrap()
    }

    fn mixed_tagged_records(engine: &mut SelfModel, domain: &str) -> Report {
        // Successes dominate through the fifth record (4/5 = 80%), so the
        // split triggers exactly at the sixth: capitals 2/2, science 2/2,
        // dates 0/2.
        let plan = [
            (Outcome::Success, "capitals"),
            (Outcome::Success, "capitals"),
            (Outcome::Success, "science"),
            (Outcome::Success, "science"),
            (Outcome::Failure, "dates"),
            (Outcome::Failure, "dates"),
        ];
        let mut last = None;
        for (outcome, tag) in plan {
            last = Some(engine.report_outcome(domain, outcome, &[tag]).unwrap());
        }
        last.unwrap()
    }

    #[test]
    fn test_invalid_outcome_rejected_without_mutation() {
        let mut engine = engine();
        let err = engine.report_raw("math", "sorta", &[]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidOutcome(_)));
        assert!(engine.current_map().boundaries.is_empty());
    }

    #[test]
    fn test_malformed_domain_rejected() {
        let mut engine = engine();
        let err = engine
            .report_outcome("  ", Outcome::Success, &[])
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownDomain(_)));
    }

    #[test]
    fn test_mixed_evidence_splits_domain() {
        let mut engine = engine();
        let report = mixed_tagged_records(&mut engine, "factual_knowledge");

        assert_eq!(
            report.refined_into,
            vec![
                "factual_knowledge.capitals",
                "factual_knowledge.dates",
                "factual_knowledge.science"
            ]
        );

        let map = engine.current_map();
        assert!(map.boundaries["factual_knowledge"].archived);
        assert_eq!(
            map.boundaries["factual_knowledge.capitals"].status,
            BoundaryStatus::IdentifiedContingent
        );
        assert_eq!(map.boundaries["factual_knowledge.capitals"].confidence, 1.0);
        assert_eq!(
            map.boundaries["factual_knowledge.dates"].status,
            BoundaryStatus::Outside
        );
        assert_eq!(map.boundaries["factual_knowledge.dates"].confidence, 0.0);
        assert_eq!(map.revisions.len(), 1);
        assert_eq!(map.revisions[0].original_domain, "factual_knowledge");
    }

    #[test]
    fn test_report_against_archived_parent_signals_reclassification() {
        let mut engine = engine();
        mixed_tagged_records(&mut engine, "factual_knowledge");

        let err = engine
            .report_outcome("factual_knowledge", Outcome::Success, &[])
            .unwrap_err();
        assert!(matches!(err, EngineError::DomainArchived(_)));

        // Children accept reports under their own names.
        engine
            .report_outcome("factual_knowledge.capitals", Outcome::Success, &[])
            .unwrap();
    }

    #[test]
    fn test_untagged_mixed_evidence_is_a_noop() {
        let mut engine = engine();
        for i in 0..8 {
            let outcome = if i % 2 == 0 { Outcome::Success } else { Outcome::Failure };
            let report = engine.report_outcome("riddles", outcome, &[]).unwrap();
            assert!(report.refined_into.is_empty());
        }
        assert!(!engine.current_map().boundaries["riddles"].archived);
    }

    #[test]
    fn test_describe_changes_after_updates() {
        let mut engine = engine();
        engine.report_outcome("math", Outcome::Success, &[]).unwrap();
        let before = engine.describe();
        assert_eq!(before, engine.describe());

        // Three more successes cross the promotion threshold and the text
        // reflects the new status.
        for _ in 0..3 {
            engine.report_outcome("math", Outcome::Success, &[]).unwrap();
        }
        assert_ne!(engine.describe(), before);
    }

    #[test]
    fn test_child_name_collisions_get_suffixed() {
        let mut engine = engine();
        // Occupy one of the would-be child names up front.
        engine
            .report_outcome("factual_knowledge.dates", Outcome::Success, &[])
            .unwrap();

        let report = mixed_tagged_records(&mut engine, "factual_knowledge");
        assert!(report
            .refined_into
            .contains(&"factual_knowledge.dates-2".to_string()));
    }
}
