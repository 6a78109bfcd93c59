//! Update engine: per-outcome confidence, rigidity, and status rules

use crate::config::EngineConfig;
use selfmap_domain::{Boundary, BoundaryStatus, Outcome, TestRecord};

/// A status transition produced by one update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// Status before the update
    pub from: BoundaryStatus,
    /// Status after the update
    pub to: BoundaryStatus,
}

/// Apply one evaluated outcome to a boundary
///
/// Adjusts confidence and rigidity, evaluates the status-transition rules in
/// precedence order, and appends the record. The record is appended on every
/// call, whether or not a transition results. No other boundary is touched.
pub fn apply_outcome(
    config: &EngineConfig,
    boundary: &mut Boundary,
    record: TestRecord,
) -> Option<StatusChange> {
    // Confidence: fixed delta per outcome kind, clamped to [0, 1].
    let delta = match record.outcome {
        Outcome::Success => config.success_delta,
        Outcome::Partial => config.success_delta / 2.0,
        Outcome::Failure => -config.failure_delta,
    };
    boundary.confidence = (boundary.confidence + delta).clamp(0.0, 1.0);

    // Rigidity: grows when the new outcome agrees with the majority of the
    // trailing window, erodes when it contradicts it. A tie or an empty
    // window carries no signal and leaves rigidity alone. The floor binds
    // only for identified_core boundaries.
    if let Some(majority) = majority_outcome(boundary.recent(config.agreement_window)) {
        let step = if record.outcome == majority {
            config.rigidity_step
        } else {
            -config.rigidity_step
        };
        boundary.rigidity = (boundary.rigidity + step).clamp(boundary.floor(), 1.0);
    }

    // Hysteresis bookkeeping on the post-update confidence.
    if boundary.confidence < config.low_confidence {
        boundary.low_streak += 1;
    } else {
        boundary.low_streak = 0;
    }
    if boundary.confidence > config.recovery_confidence {
        boundary.recovery_streak += 1;
    } else {
        boundary.recovery_streak = 0;
    }

    // Status transitions, first match wins. identified_core and held never
    // transition automatically; only explicit reconfiguration changes them.
    let from = boundary.status;
    let to = match boundary.status {
        BoundaryStatus::Uncertain
            if non_failure_run(boundary, record.outcome) >= config.promote_streak =>
        {
            Some(BoundaryStatus::IdentifiedContingent)
        }
        BoundaryStatus::IdentifiedContingent
            if boundary.low_streak >= config.demote_streak =>
        {
            Some(BoundaryStatus::Outside)
        }
        BoundaryStatus::Outside
            if boundary.recovery_streak >= config.recovery_streak =>
        {
            Some(BoundaryStatus::IdentifiedContingent)
        }
        _ => None,
    };

    // The append always happens, even when no transition results.
    boundary.tested = true;
    boundary.last_interaction = record.timestamp;
    boundary.test_history.push(record);

    if let Some(to) = to {
        boundary.status = to;
        boundary.low_streak = 0;
        boundary.recovery_streak = 0;
        tracing::info!(
            domain = %boundary.domain,
            from = %from,
            to = %to,
            confidence = boundary.confidence,
            "boundary status transition"
        );
        Some(StatusChange { from, to })
    } else {
        None
    }
}

/// The strictly most frequent outcome in the window, if any
fn majority_outcome(window: &[TestRecord]) -> Option<Outcome> {
    let mut counts = [(Outcome::Success, 0usize), (Outcome::Failure, 0), (Outcome::Partial, 0)];
    for record in window {
        for entry in counts.iter_mut() {
            if entry.0 == record.outcome {
                entry.1 += 1;
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    if counts[0].1 > 0 && counts[0].1 > counts[1].1 {
        Some(counts[0].0)
    } else {
        None
    }
}

/// Length of the current run of non-failure outcomes, counting `current`
fn non_failure_run(boundary: &Boundary, current: Outcome) -> u32 {
    if current == Outcome::Failure {
        return 0;
    }
    let trailing = boundary
        .test_history
        .iter()
        .rev()
        .take_while(|r| r.outcome != Outcome::Failure)
        .count();
    (trailing + 1).min(u32::MAX as usize) as u32
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use selfmap_domain::Provenance;

    fn arb_outcome() -> impl Strategy<Value = Outcome> {
        prop_oneof![
            Just(Outcome::Success),
            Just(Outcome::Failure),
            Just(Outcome::Partial),
        ]
    }

    proptest! {
        /// Property: confidence and rigidity stay in [0, 1] for any outcome sequence
        #[test]
        fn test_scalars_stay_in_range(outcomes in proptest::collection::vec(arb_outcome(), 0..200)) {
            let config = EngineConfig::default();
            let mut b = Boundary::new("math", BoundaryStatus::Uncertain, 0.5, 0.5, Provenance::Implicit);

            for (i, outcome) in outcomes.into_iter().enumerate() {
                apply_outcome(&config, &mut b, TestRecord::new(format!("t-{}", i), outcome, i as i64));
                prop_assert!((0.0..=1.0).contains(&b.confidence));
                prop_assert!((0.0..=1.0).contains(&b.rigidity));
            }
        }

        /// Property: identified_core rigidity never falls below its floor
        #[test]
        fn test_core_floor_never_violated(
            outcomes in proptest::collection::vec(arb_outcome(), 0..200),
            floor in 0.0f64..=0.8,
        ) {
            let config = EngineConfig::default();
            let mut b = Boundary::new(
                "reasoning",
                BoundaryStatus::IdentifiedCore,
                0.9,
                floor.max(0.8),
                Provenance::Training,
            )
            .with_floor(floor);

            for (i, outcome) in outcomes.into_iter().enumerate() {
                apply_outcome(&config, &mut b, TestRecord::new(format!("t-{}", i), outcome, i as i64));
                prop_assert!(b.rigidity >= floor);
                prop_assert_eq!(b.status, BoundaryStatus::IdentifiedCore);
            }
        }
    }
}
