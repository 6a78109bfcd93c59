//! Refinement engine: splitting a domain whose evidence is too mixed
//!
//! Splitting is one-directional. Children accumulate evidence independently
//! and a parent is never reconstituted; merge semantics are a documented
//! limitation, not a bug.

use crate::config::EngineConfig;
use selfmap_domain::{Boundary, BoundaryStatus, Outcome, Provenance, TestRecord};
use std::collections::BTreeMap;

/// Cluster key for untagged records and for folded-in small clusters
const CATCH_ALL: &str = "general";

/// Confidence at or above this makes a child `identified_contingent`
const CHILD_CONTINGENT_BAND: f64 = 0.65;

/// Confidence at or below this makes a child `outside`
const CHILD_OUTSIDE_BAND: f64 = 0.40;

/// Whether a boundary's recent evidence is mixed enough to warrant a split
///
/// True when the trailing window holds at least the configured minimum of
/// records, contains both successes and failures, and neither outcome type
/// reaches the dominance share. Mixed, not-yet-resolved evidence is the
/// signal that the domain is too coarse.
pub fn should_refine(config: &EngineConfig, boundary: &Boundary) -> bool {
    if boundary.archived {
        return false;
    }
    let window = boundary.recent(config.refine_window);
    if window.len() < config.refine_min_tests {
        return false;
    }

    let total = window.len() as f64;
    let successes = count(window, Outcome::Success) as f64;
    let failures = count(window, Outcome::Failure) as f64;

    successes > 0.0
        && failures > 0.0
        && successes / total < config.dominance_ratio
        && failures / total < config.dominance_ratio
}

/// Compute the child boundaries a split of `parent` would produce
///
/// Records cluster by their primary tag; untagged records and clusters below
/// the minimum count fold into a shared catch-all cluster so no evidence is
/// discarded. Returns `None` when there is insufficient signal to split:
/// no tags anywhere in the history, or everything lands in a single cluster.
/// A `None` is a no-op for the caller, not an error.
pub fn propose_split(config: &EngineConfig, parent: &Boundary) -> Option<Vec<Boundary>> {
    if parent.test_history.iter().all(|r| r.task_tags.is_empty()) {
        return None;
    }

    let mut clusters: BTreeMap<String, Vec<&TestRecord>> = BTreeMap::new();
    for record in &parent.test_history {
        let key = record
            .primary_tag()
            .map(normalize_tag)
            .unwrap_or_else(|| CATCH_ALL.to_string());
        clusters.entry(key).or_default().push(record);
    }

    // Fold small clusters into the catch-all rather than discarding them.
    let (kept, folded): (BTreeMap<_, _>, BTreeMap<_, _>) = clusters
        .into_iter()
        .partition(|(key, records)| key == CATCH_ALL || records.len() >= config.min_cluster_size);
    let mut clusters = kept;
    for (_, mut records) in folded {
        clusters.entry(CATCH_ALL.to_string()).or_default().append(&mut records);
    }

    // A single cluster would just rename the parent; that is no refinement.
    if clusters.len() < 2 {
        return None;
    }

    let children = clusters
        .into_iter()
        .map(|(key, records)| child_boundary(config, parent, &key, &records))
        .collect();
    Some(children)
}

fn child_boundary(
    config: &EngineConfig,
    parent: &Boundary,
    tag: &str,
    records: &[&TestRecord],
) -> Boundary {
    let successes = records.iter().filter(|r| r.outcome == Outcome::Success).count();
    let success_rate = successes as f64 / records.len() as f64;

    let status = if success_rate >= CHILD_CONTINGENT_BAND {
        BoundaryStatus::IdentifiedContingent
    } else if success_rate <= CHILD_OUTSIDE_BAND {
        BoundaryStatus::Outside
    } else {
        BoundaryStatus::Uncertain
    };

    // Children of an identified_core parent inherit its floor; everything
    // else starts with low rigidity, being new and untested as a split.
    let inherited_floor = match parent.status {
        BoundaryStatus::IdentifiedCore => parent.rigidity_floor,
        _ => None,
    };
    let rigidity = inherited_floor.unwrap_or(config.child_rigidity);

    let mut child = Boundary::new(
        format!("{}.{}", parent.domain, tag),
        status,
        success_rate,
        rigidity,
        Provenance::Inference,
    )
    .derived(&parent.domain);
    child.rigidity_floor = inherited_floor;
    child.test_history = records.iter().map(|r| (*r).clone()).collect();
    child.tested = !child.test_history.is_empty();
    child.last_interaction = child
        .test_history
        .iter()
        .map(|r| r.timestamp)
        .max()
        .unwrap_or(0);
    child
}

fn count(window: &[TestRecord], outcome: Outcome) -> usize {
    window.iter().filter(|r| r.outcome == outcome).count()
}

/// Tags become domain-name segments; keep them flat and predictable
fn normalize_tag(tag: &str) -> String {
    tag.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() || c == '.' { '_' } else { c })
        .collect()
}
