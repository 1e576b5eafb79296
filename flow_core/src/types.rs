//! Core domain types for the Vinyasa flow system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Poses and their properties
//! - Relations between poses (what flows well into what)
//! - Transition risks and safety verdicts
//! - The validation result returned for a full sequence

use serde::{Deserialize, Serialize};

// ============================================================================
// Pose Types
// ============================================================================

/// Broad family a pose belongs to, used by the transition safety rules
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PoseFamily {
    Standing,
    Seated,
    ForwardFold,
    Backbend,
    Twist,
    Inversion,
    Core,
    Balance,
    HipOpener,
    Restorative,
    /// Catch-all for poses outside the named families
    Other,
}

impl PoseFamily {
    /// Lowercase label matching the wire format
    pub fn as_str(&self) -> &'static str {
        match self {
            PoseFamily::Standing => "standing",
            PoseFamily::Seated => "seated",
            PoseFamily::ForwardFold => "forward_fold",
            PoseFamily::Backbend => "backbend",
            PoseFamily::Twist => "twist",
            PoseFamily::Inversion => "inversion",
            PoseFamily::Core => "core",
            PoseFamily::Balance => "balance",
            PoseFamily::HipOpener => "hip_opener",
            PoseFamily::Restorative => "restorative",
            PoseFamily::Other => "other",
        }
    }
}

/// Practitioner level a pose is pitched at
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PoseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl PoseLevel {
    /// Lowercase label matching the wire format
    pub fn as_str(&self) -> &'static str {
        match self {
            PoseLevel::Beginner => "beginner",
            PoseLevel::Intermediate => "intermediate",
            PoseLevel::Advanced => "advanced",
        }
    }
}

/// A pose definition (e.g., "Downward Facing Dog")
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pose {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sanskrit: String,
    pub family: PoseFamily,
    pub level: PoseLevel,
    /// Exertion on a 1 (resting) to 5 (peak) scale
    pub intensity: u8,
    /// The mirrored counterpart for asymmetric poses (e.g., right vs left side)
    #[serde(default)]
    pub side_pair: Option<String>,
    #[serde(default)]
    pub muscles_engaged: Vec<String>,
    #[serde(default)]
    pub muscles_stretched: Vec<String>,
}

// ============================================================================
// Relation Types
// ============================================================================

/// How one pose relates to another in the sequencing graph
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// A pose that flows naturally out of the source
    TransitionOut,
    /// A pose commonly entered from to reach the source
    TransitionIn,
    /// A pose that releases the source (opposite spinal/muscular action)
    Counterpose,
    /// A pose that prepares the body for the source
    WarmUp,
    /// A thematically related pose with no directional flow meaning
    RelatedNext,
}

/// A directed edge in the pose relation graph
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoseRelation {
    pub source_id: String,
    pub target_id: String,
    pub kind: RelationKind,
    /// Base suggestion score contributed by this edge
    pub weight: u32,
}

// ============================================================================
// Safety Types
// ============================================================================

/// Severity of a single transition finding
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Lowercase label matching the wire format
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// A risky adjacent-pair transition found in a sequence
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionRisk {
    /// Display name of the earlier pose in the pair
    pub from_pose: String,
    /// Display name of the later pose in the pair
    pub to_pose: String,
    pub level: RiskLevel,
    pub reason: String,
    pub suggestion: String,
}

/// Overall safety verdict for a sequence
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SafetyVerdict {
    Safe,
    Caution,
    Unsafe,
}

impl SafetyVerdict {
    /// Lowercase label matching the wire format
    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyVerdict::Safe => "safe",
            SafetyVerdict::Caution => "caution",
            SafetyVerdict::Unsafe => "unsafe",
        }
    }
}

/// Full validation result for a sequence
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SequenceValidation {
    pub overall_safety: SafetyVerdict,
    pub transition_risks: Vec<TransitionRisk>,
    /// Free-text guidance notes, never empty (falls back to canned notes)
    pub advisories: Vec<String>,
    /// A repaired copy of the sequence, present only when the verdict is not safe
    pub safer_alternative: Option<Vec<String>>,
}
