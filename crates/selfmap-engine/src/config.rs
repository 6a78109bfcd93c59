//! Engine configuration
//!
//! The update and refinement thresholds are empirically chosen rather than
//! derived, so every one of them is exposed here instead of hard-coded;
//! swapping the trigger policy never touches the engine mechanics.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// All tunable parameters of the boundary maintenance engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    // -- Update engine --
    /// Confidence gained on a success (a partial gains half of this)
    #[serde(default = "default_success_delta")]
    pub success_delta: f64,

    /// Confidence lost on a failure
    #[serde(default = "default_failure_delta")]
    pub failure_delta: f64,

    /// Rigidity step applied per test, up on agreement with the recent
    /// majority, down on contradiction
    #[serde(default = "default_rigidity_step")]
    pub rigidity_step: f64,

    /// How many trailing outcomes form the majority window for rigidity
    #[serde(default = "default_agreement_window")]
    pub agreement_window: usize,

    /// Consecutive non-failures that promote `uncertain` to
    /// `identified_contingent`
    #[serde(default = "default_promote_streak")]
    pub promote_streak: u32,

    /// Confidence below this demotes `identified_contingent` toward `outside`
    #[serde(default = "default_low_confidence")]
    pub low_confidence: f64,

    /// Consecutive below-threshold tests required before demotion
    #[serde(default = "default_demote_streak")]
    pub demote_streak: u32,

    /// Confidence above this counts toward recovery from `outside`
    /// (higher than `low_confidence`: hysteresis, no flapping at one value)
    #[serde(default = "default_recovery_confidence")]
    pub recovery_confidence: f64,

    /// Consecutive above-threshold tests required before recovery
    #[serde(default = "default_recovery_streak")]
    pub recovery_streak: u32,

    // -- Refinement engine --
    /// How many trailing records the split trigger inspects
    #[serde(default = "default_refine_window")]
    pub refine_window: usize,

    /// Minimum records in the window before a split is considered
    #[serde(default = "default_refine_min_tests")]
    pub refine_min_tests: usize,

    /// If either outcome type reaches this share of the window, the evidence
    /// is considered resolved and no split happens
    #[serde(default = "default_dominance_ratio")]
    pub dominance_ratio: f64,

    /// Tag clusters smaller than this fold into the catch-all child
    #[serde(default = "default_min_cluster_size")]
    pub min_cluster_size: usize,

    /// Initial rigidity for split children (new, untested)
    #[serde(default = "default_child_rigidity")]
    pub child_rigidity: f64,

    // -- Implicit boundaries --
    /// Confidence assigned to implicitly created boundaries
    #[serde(default = "default_implicit_confidence")]
    pub implicit_confidence: f64,

    /// Rigidity assigned to implicitly created boundaries
    #[serde(default = "default_implicit_rigidity")]
    pub implicit_rigidity: f64,

    /// Domain the caller reports against when classification fails
    #[serde(default = "default_fallback_domain")]
    pub fallback_domain: String,

    // -- Collaborator call wrapping (hints; the engine itself never blocks) --
    /// Suggested deadline for classifier/evaluator calls, if the caller wraps them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collaborator_deadline_ms: Option<u64>,

    /// Suggested retry count for collaborator calls
    #[serde(default)]
    pub collaborator_retries: u32,
}

fn default_success_delta() -> f64 {
    0.02
}

fn default_failure_delta() -> f64 {
    0.03
}

fn default_rigidity_step() -> f64 {
    0.01
}

fn default_agreement_window() -> usize {
    5
}

fn default_promote_streak() -> u32 {
    3
}

fn default_low_confidence() -> f64 {
    0.40
}

fn default_demote_streak() -> u32 {
    3
}

fn default_recovery_confidence() -> f64 {
    0.60
}

fn default_recovery_streak() -> u32 {
    3
}

fn default_refine_window() -> usize {
    10
}

fn default_refine_min_tests() -> usize {
    5
}

fn default_dominance_ratio() -> f64 {
    0.80
}

fn default_min_cluster_size() -> usize {
    2
}

fn default_child_rigidity() -> f64 {
    0.2
}

fn default_implicit_confidence() -> f64 {
    0.5
}

fn default_implicit_rigidity() -> f64 {
    0.5
}

fn default_fallback_domain() -> String {
    "uncertain_general".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            success_delta: default_success_delta(),
            failure_delta: default_failure_delta(),
            rigidity_step: default_rigidity_step(),
            agreement_window: default_agreement_window(),
            promote_streak: default_promote_streak(),
            low_confidence: default_low_confidence(),
            demote_streak: default_demote_streak(),
            recovery_confidence: default_recovery_confidence(),
            recovery_streak: default_recovery_streak(),
            refine_window: default_refine_window(),
            refine_min_tests: default_refine_min_tests(),
            dominance_ratio: default_dominance_ratio(),
            min_cluster_size: default_min_cluster_size(),
            child_rigidity: default_child_rigidity(),
            implicit_confidence: default_implicit_confidence(),
            implicit_rigidity: default_implicit_rigidity(),
            fallback_domain: default_fallback_domain(),
            collaborator_deadline_ms: None,
            collaborator_retries: 0,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file; missing fields take defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
        let config: EngineConfig = toml::from_str(&contents)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
        config.validated()
    }

    /// Reject configurations the engine cannot run with
    pub fn validated(self) -> Result<Self> {
        if self.recovery_confidence <= self.low_confidence {
            return Err(EngineError::Config(format!(
                "recovery_confidence {} must exceed low_confidence {} (hysteresis)",
                self.recovery_confidence, self.low_confidence
            )));
        }
        for (name, value) in [
            ("success_delta", self.success_delta),
            ("failure_delta", self.failure_delta),
            ("rigidity_step", self.rigidity_step),
            ("dominance_ratio", self.dominance_ratio),
            ("child_rigidity", self.child_rigidity),
            ("implicit_confidence", self.implicit_confidence),
            ("implicit_rigidity", self.implicit_rigidity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::Config(format!(
                    "{} {} outside [0, 1]",
                    name, value
                )));
            }
        }
        if self.agreement_window == 0 || self.refine_window == 0 {
            return Err(EngineError::Config("windows must be non-zero".to_string()));
        }
        Ok(self)
    }
}
