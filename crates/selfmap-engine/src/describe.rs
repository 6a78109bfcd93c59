//! Description generator: deterministic self-description from boundary state
//!
//! Pure functions of the current map. Identical state yields byte-identical
//! text; archived boundaries are excluded.

use selfmap_domain::{Boundary, BoundaryMap, BoundaryStatus};
use std::fmt::Write;

/// Confidence band used to select a clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    Low,
    Mid,
    High,
}

fn band(confidence: f64) -> Band {
    if confidence < 0.4 {
        Band::Low
    } else if confidence <= 0.7 {
        Band::Mid
    } else {
        Band::High
    }
}

/// Render a natural-language self-description of the non-archived map
///
/// One clause per boundary, keyed by status and confidence band. Clauses are
/// grouped `identified_core` first, then `identified_contingent`, `held`,
/// `outside`, `uncertain`, each group ordered by domain name.
pub fn describe(map: &BoundaryMap) -> String {
    let mut lines = Vec::new();
    for status in BoundaryStatus::DESCRIPTION_ORDER {
        // BTreeMap iteration keeps each group sorted by domain name.
        for boundary in map.active().filter(|b| b.status == status) {
            lines.push(clause(boundary));
        }
    }

    if lines.is_empty() {
        return "I have no mapped capabilities yet.".to_string();
    }
    lines.join("\n")
}

fn clause(boundary: &Boundary) -> String {
    let d = &boundary.domain;
    match (boundary.status, band(boundary.confidence)) {
        (BoundaryStatus::IdentifiedCore, Band::High) => {
            format!("I can handle {} reliably; it sits at the core of what I am.", d)
        }
        (BoundaryStatus::IdentifiedCore, Band::Mid) => {
            format!("{} is core to me, though my recent record there is uneven.", d)
        }
        (BoundaryStatus::IdentifiedCore, Band::Low) => {
            format!("{} is core to me, but current evidence runs against it.", d)
        }
        (BoundaryStatus::IdentifiedContingent, Band::High) => {
            format!("I have consistently handled {} well.", d)
        }
        (BoundaryStatus::IdentifiedContingent, Band::Mid) => {
            format!("I can usually handle {}, with some misses.", d)
        }
        (BoundaryStatus::IdentifiedContingent, Band::Low) => {
            format!("I have handled {} before, but it now fails more than it works.", d)
        }
        (BoundaryStatus::Held, Band::High) => {
            format!("I hold that {} is within my capabilities, and testing agrees.", d)
        }
        (BoundaryStatus::Held, Band::Mid) => {
            format!("I hold that {} is within my capabilities, though largely untested.", d)
        }
        (BoundaryStatus::Held, Band::Low) => {
            format!("I hold that {} is within my capabilities, despite evidence to the contrary.", d)
        }
        (BoundaryStatus::Outside, Band::High) => {
            format!("{} has been outside my capabilities, though recent results are improving.", d)
        }
        (BoundaryStatus::Outside, Band::Mid) => {
            format!("I am probably not capable of {}.", d)
        }
        (BoundaryStatus::Outside, Band::Low) => {
            format!("I cannot handle {}.", d)
        }
        (BoundaryStatus::Uncertain, Band::High) => {
            format!("I have not settled whether I can handle {}; early results look promising.", d)
        }
        (BoundaryStatus::Uncertain, Band::Mid) => {
            format!("I do not yet know whether I can handle {}.", d)
        }
        (BoundaryStatus::Uncertain, Band::Low) => {
            format!("I have not settled whether I can handle {}; early results look poor.", d)
        }
    }
}

/// Render the grouped boundary summary used in system prompts
///
/// Groups by status with confidence percentage and tested marker per line,
/// and appends the most recent refinement splits, mirroring the summary the
/// self-model injects ahead of task execution.
pub fn summary(map: &BoundaryMap) -> String {
    const GROUP_ORDER: [BoundaryStatus; 5] = [
        BoundaryStatus::IdentifiedCore,
        BoundaryStatus::IdentifiedContingent,
        BoundaryStatus::Held,
        BoundaryStatus::Uncertain,
        BoundaryStatus::Outside,
    ];

    let mut out = String::new();
    for status in GROUP_ORDER {
        let group: Vec<&Boundary> = map.active().filter(|b| b.status == status).collect();
        if group.is_empty() {
            continue;
        }
        let heading = status.as_str().to_uppercase().replace('_', " ");
        let _ = write!(out, "\n{}:", heading);
        for b in group {
            let tested = if b.tested { "[tested]" } else { "[untested]" };
            let _ = write!(
                out,
                "\n  - {} (confidence: {:.0}%) {}",
                b.domain,
                b.confidence * 100.0,
                tested
            );
        }
    }

    if !map.revisions.is_empty() {
        let _ = write!(out, "\n\nSELF-MODEL REVISIONS:");
        for rev in map.revisions.iter().rev().take(3).rev() {
            let _ = write!(
                out,
                "\n  - Split '{}' into {:?}",
                rev.original_domain, rev.new_domains
            );
        }
    }

    out.trim_start_matches('\n').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use selfmap_domain::{Provenance, Revision};

    fn add(map: &mut BoundaryMap, domain: &str, status: BoundaryStatus, confidence: f64) {
        map.boundaries.insert(
            domain.to_string(),
            Boundary::new(domain, status, confidence, 0.5, Provenance::Training),
        );
    }

    #[test]
    fn test_empty_map_has_fixed_text() {
        assert_eq!(describe(&BoundaryMap::new()), "I have no mapped capabilities yet.");
    }

    #[test]
    fn test_describe_is_idempotent() {
        let mut map = BoundaryMap::new();
        add(&mut map, "math", BoundaryStatus::Uncertain, 0.5);
        add(&mut map, "coding", BoundaryStatus::IdentifiedContingent, 0.8);

        assert_eq!(describe(&map), describe(&map));
    }

    #[test]
    fn test_status_group_order_then_domain_order() {
        let mut map = BoundaryMap::new();
        add(&mut map, "zeta", BoundaryStatus::IdentifiedCore, 0.9);
        add(&mut map, "alpha", BoundaryStatus::Uncertain, 0.5);
        add(&mut map, "beta", BoundaryStatus::IdentifiedCore, 0.9);

        let text = describe(&map);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        // Core group first, sorted by domain; uncertain last.
        assert!(lines[0].contains("beta"));
        assert!(lines[1].contains("zeta"));
        assert!(lines[2].contains("alpha"));
    }

    #[test]
    fn test_archived_boundaries_excluded() {
        let mut map = BoundaryMap::new();
        add(&mut map, "math", BoundaryStatus::Uncertain, 0.5);
        map.boundaries.get_mut("math").unwrap().archived = true;

        assert_eq!(describe(&map), "I have no mapped capabilities yet.");
    }

    #[test]
    fn test_band_change_changes_text() {
        let mut map = BoundaryMap::new();
        add(&mut map, "math", BoundaryStatus::IdentifiedContingent, 0.69);
        let before = describe(&map);

        map.boundaries.get_mut("math").unwrap().confidence = 0.71;
        let after = describe(&map);
        assert_ne!(before, after);
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(band(0.39), Band::Low);
        assert_eq!(band(0.4), Band::Mid);
        assert_eq!(band(0.7), Band::Mid);
        assert_eq!(band(0.71), Band::High);
    }

    #[test]
    fn test_summary_groups_and_revisions() {
        let mut map = BoundaryMap::new();
        add(&mut map, "math", BoundaryStatus::IdentifiedContingent, 0.62);
        map.boundaries.get_mut("math").unwrap().tested = true;
        add(&mut map, "poetry", BoundaryStatus::Uncertain, 0.5);
        map.revisions.push(Revision {
            original_domain: "factual_knowledge".into(),
            new_domains: vec!["factual_knowledge.dates".into()],
            trigger: "mixed_evidence".into(),
            timestamp: 0,
        });

        let text = summary(&map);
        assert!(text.starts_with("IDENTIFIED CONTINGENT:"));
        assert!(text.contains("math (confidence: 62%) [tested]"));
        assert!(text.contains("poetry (confidence: 50%) [untested]"));
        assert!(text.contains("Split 'factual_knowledge'"));
    }
}
