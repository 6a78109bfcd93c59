//! Boundary module - the fundamental unit of the self-model

use crate::outcome::TestRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryStatus {
    /// Core capability; never transitions automatically
    IdentifiedCore,

    /// Capability supported by evidence but open to revision
    IdentifiedContingent,

    /// Held by configuration rather than evidence
    Held,

    /// Outside current capability
    Outside,

    /// Not yet resolved either way
    Uncertain,
}

impl BoundaryStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryStatus::IdentifiedCore => "identified_core",
            BoundaryStatus::IdentifiedContingent => "identified_contingent",
            BoundaryStatus::Held => "held",
            BoundaryStatus::Outside => "outside",
            BoundaryStatus::Uncertain => "uncertain",
        }
    }

    /// Parse a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "identified_core" => Some(BoundaryStatus::IdentifiedCore),
            "identified_contingent" => Some(BoundaryStatus::IdentifiedContingent),
            "held" => Some(BoundaryStatus::Held),
            "outside" => Some(BoundaryStatus::Outside),
            "uncertain" => Some(BoundaryStatus::Uncertain),
            _ => None,
        }
    }

    /// Rendering order for description generation: core first, uncertain last
    pub const DESCRIPTION_ORDER: [BoundaryStatus; 5] = [
        BoundaryStatus::IdentifiedCore,
        BoundaryStatus::IdentifiedContingent,
        BoundaryStatus::Held,
        BoundaryStatus::Outside,
        BoundaryStatus::Uncertain,
    ];
}

impl std::str::FromStr for BoundaryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid status: {}", s))
    }
}

impl fmt::Display for BoundaryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a boundary came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Pre-configured at initialization
    Training,

    /// Inferred from observed behavior (including refinement children)
    Inference,

    /// Created implicitly when the classifier named an unseen domain
    Implicit,
}

impl Provenance {
    /// Get the provenance name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Training => "training",
            Provenance::Inference => "inference",
            Provenance::Implicit => "implicit",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One capability domain tracked by the self-model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// Unique domain identifier
    pub domain: String,

    /// Current lifecycle status
    pub status: BoundaryStatus,

    /// Belief in [0, 1] that the capability statement currently holds
    pub confidence: f64,

    /// Resistance in [0, 1] to future revision
    pub rigidity: f64,

    /// Lower bound on rigidity, enforced for `identified_core` boundaries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rigidity_floor: Option<f64>,

    /// How the boundary came to exist
    pub provenance: Provenance,

    /// Whether any outcome has ever been recorded
    #[serde(default)]
    pub tested: bool,

    /// Append-only evaluated task history, oldest first
    #[serde(default)]
    pub test_history: Vec<TestRecord>,

    /// Parent domain name if this boundary was created by a refinement split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<String>,

    /// True once superseded by a refinement split; retained for audit
    #[serde(default)]
    pub archived: bool,

    /// Timestamp of the most recent recorded outcome (millis since epoch)
    #[serde(default)]
    pub last_interaction: i64,

    /// Consecutive tests with confidence below the demotion threshold
    #[serde(default)]
    pub low_streak: u32,

    /// Consecutive tests with confidence above the recovery threshold
    #[serde(default)]
    pub recovery_streak: u32,
}

impl Boundary {
    /// Create a new boundary with empty history
    pub fn new(
        domain: impl Into<String>,
        status: BoundaryStatus,
        confidence: f64,
        rigidity: f64,
        provenance: Provenance,
    ) -> Self {
        Self {
            domain: domain.into(),
            status,
            confidence,
            rigidity,
            rigidity_floor: None,
            provenance,
            tested: false,
            test_history: Vec::new(),
            derived_from: None,
            archived: false,
            last_interaction: 0,
            low_streak: 0,
            recovery_streak: 0,
        }
    }

    /// Attach a rigidity floor (used for `identified_core` boundaries)
    pub fn with_floor(mut self, floor: f64) -> Self {
        self.rigidity_floor = Some(floor);
        self
    }

    /// Mark this boundary as derived from a parent domain
    pub fn derived(mut self, parent: impl Into<String>) -> Self {
        self.derived_from = Some(parent.into());
        self
    }

    /// Effective lower bound for rigidity
    ///
    /// Only `identified_core` boundaries enforce their configured floor.
    pub fn floor(&self) -> f64 {
        match self.status {
            BoundaryStatus::IdentifiedCore => self.rigidity_floor.unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// The most recent `k` records, oldest first
    pub fn recent(&self, k: usize) -> &[TestRecord] {
        let start = self.test_history.len().saturating_sub(k);
        &self.test_history[start..]
    }
}
