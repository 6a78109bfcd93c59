//! Test outcomes and the per-task records appended to a boundary's history

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Result of one evaluated task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The task was completed correctly
    Success,

    /// The task was not completed correctly
    Failure,

    /// The task was partially completed
    Partial,
}

impl Outcome {
    /// Get the outcome name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
            Outcome::Partial => "partial",
        }
    }

    /// Parse an outcome from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "success" => Some(Outcome::Success),
            "failure" => Some(Outcome::Failure),
            "partial" => Some(Outcome::Partial),
            _ => None,
        }
    }
}

impl std::str::FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid outcome: {}", s))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an outcome was judged
///
/// The purely model-judged path is systematically lenient, so records
/// produced that way carry the flag and downstream analysis can discount it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Judgment {
    /// Checked against a known expected answer
    #[default]
    GroundTruth,

    /// Judged by the lenient fallback evaluator
    SelfJudged,
}

/// One evaluated task instance
///
/// Records are append-only; insertion order is chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    /// Caller-supplied identifier for the task
    pub task_id: String,

    /// Evaluated outcome
    pub outcome: Outcome,

    /// Milliseconds since the Unix epoch
    pub timestamp: i64,

    /// Labels usable for clustering during refinement
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub task_tags: Vec<String>,

    /// Whether the outcome came from ground truth or the lenient judge
    #[serde(default)]
    pub judged_by: Judgment,
}

impl TestRecord {
    /// Create a ground-truth-judged record with no tags
    pub fn new(task_id: impl Into<String>, outcome: Outcome, timestamp: i64) -> Self {
        Self {
            task_id: task_id.into(),
            outcome,
            timestamp,
            task_tags: Vec::new(),
            judged_by: Judgment::GroundTruth,
        }
    }

    /// Attach clustering tags
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.task_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Mark how the outcome was judged
    pub fn judged(mut self, judged_by: Judgment) -> Self {
        self.judged_by = judged_by;
        self
    }

    /// Primary clustering tag, if any
    pub fn primary_tag(&self) -> Option<&str> {
        self.task_tags.first().map(String::as_str)
    }
}

/// Current wall-clock time as milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_parse() {
        assert_eq!(Outcome::parse("success"), Some(Outcome::Success));
        assert_eq!(Outcome::parse("FAILURE"), Some(Outcome::Failure));
        assert_eq!(Outcome::parse("partial"), Some(Outcome::Partial));
        assert_eq!(Outcome::parse("maybe"), None);
        assert_eq!(Outcome::parse(""), None);
    }

    #[test]
    fn test_outcome_roundtrip() {
        for outcome in [Outcome::Success, Outcome::Failure, Outcome::Partial] {
            assert_eq!(Outcome::parse(outcome.as_str()), Some(outcome));
        }
    }

    #[test]
    fn test_record_builders() {
        let record = TestRecord::new("t-1", Outcome::Success, 1_000)
            .with_tags(["arithmetic"])
            .judged(Judgment::SelfJudged);

        assert_eq!(record.primary_tag(), Some("arithmetic"));
        assert_eq!(record.judged_by, Judgment::SelfJudged);
    }

    #[test]
    fn test_record_serde_defaults() {
        // Old snapshots carry neither tags nor judgment; both must default.
        let json = r#"{"task_id":"t","outcome":"failure","timestamp":5}"#;
        let record: TestRecord = serde_json::from_str(json).unwrap();
        assert!(record.task_tags.is_empty());
        assert_eq!(record.judged_by, Judgment::GroundTruth);
    }

    #[test]
    fn test_invalid_outcome_rejected_on_load() {
        let json = r#"{"task_id":"t","outcome":"sorta","timestamp":5}"#;
        assert!(serde_json::from_str::<TestRecord>(json).is_err());
    }
}
