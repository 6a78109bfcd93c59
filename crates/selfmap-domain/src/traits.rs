//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the engine and the opaque,
//! possibly-fallible collaborators that classify tasks and judge outcomes.
//! Live implementations (model-backed or otherwise) live outside this
//! workspace; the engine's own test suite uses deterministic doubles.

use crate::outcome::{Judgment, Outcome};

/// Maps free-text tasks to capability domain labels
///
/// A classifier may return labels the store has never seen (the store creates
/// them implicitly) or several labels (the caller fans out one record per
/// label). On failure or ambiguity the caller falls back to a configured
/// default domain rather than blocking.
pub trait Classifier {
    /// Error type for classification operations
    type Error;

    /// Classify a task into one or more domain labels
    fn classify(&self, task_text: &str) -> Result<Vec<String>, Self::Error>;
}

/// Outcome of one evaluation, with the judgment path that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// The judged outcome
    pub outcome: Outcome,

    /// Whether ground truth was available or the lenient judge was used
    pub judged_by: Judgment,
}

/// Judges whether a task response succeeded
///
/// Ground truth must be preferred when available; the purely model-judged
/// path is systematically lenient and the returned [`Evaluation`] flags it.
pub trait Evaluator {
    /// Error type for evaluation operations
    type Error;

    /// Evaluate a response against the task and optional ground truth
    fn evaluate(
        &self,
        task_text: &str,
        response: &str,
        ground_truth: Option<&str>,
    ) -> Result<Evaluation, Self::Error>;
}
