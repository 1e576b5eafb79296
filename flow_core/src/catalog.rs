//! Default catalog of poses, pose relations, and preset flows.
//!
//! This module provides the built-in pose library for the system. The catalog
//! preserves the order poses were defined in: starter suggestions and
//! backfill candidates are produced in catalog order, which keeps every
//! suggestion run deterministic.

use crate::error::{Error, Result};
use crate::suggest::STARTER_INTENSITY_MAX;
use crate::types::*;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
///
/// This function returns a reference to the pre-built catalog, avoiding
/// the overhead of rebuilding the pose graph on every operation.
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog with built-in poses and relations
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom catalog creation.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

// ============================================================================
// Catalog Type
// ============================================================================

/// The complete pose library with its relation graph
///
/// Poses keep their definition order. Lookups go through an id index and
/// relations through a per-source adjacency list, so neither depends on
/// hash iteration order.
#[derive(Clone, Debug)]
pub struct Catalog {
    poses: Vec<Pose>,
    by_id: HashMap<String, usize>,
    relations: HashMap<String, Vec<PoseRelation>>,
}

/// On-disk JSON shape for a catalog file
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogFile {
    pub poses: Vec<Pose>,
    #[serde(default)]
    pub relations: Vec<PoseRelation>,
}

impl Catalog {
    /// Build a catalog from a pose list and a relation edge list
    pub fn new(poses: Vec<Pose>, relations: Vec<PoseRelation>) -> Self {
        let mut by_id = HashMap::with_capacity(poses.len());
        for (index, pose) in poses.iter().enumerate() {
            by_id.insert(pose.id.clone(), index);
        }

        let mut adjacency: HashMap<String, Vec<PoseRelation>> = HashMap::new();
        for relation in relations {
            adjacency
                .entry(relation.source_id.clone())
                .or_default()
                .push(relation);
        }

        Self {
            poses,
            by_id,
            relations: adjacency,
        }
    }

    /// Load a catalog from a JSON file, rejecting it if validation fails
    pub fn load_from_json(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let file: CatalogFile = serde_json::from_str(&contents)?;
        let catalog = Self::new(file.poses, file.relations);

        let errors = catalog.validate();
        if !errors.is_empty() {
            return Err(Error::CatalogValidation(errors.join("; ")));
        }

        tracing::info!("Loaded catalog with {} poses from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    /// Look up a pose by id
    pub fn get(&self, id: &str) -> Option<&Pose> {
        self.by_id.get(id).map(|&index| &self.poses[index])
    }

    /// All poses in catalog order
    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    /// Outgoing relation edges for a pose, in definition order
    pub fn relations_from(&self, id: &str) -> &[PoseRelation] {
        self.relations.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.by_id.len() != self.poses.len() {
            errors.push("Catalog contains duplicate pose ids".to_string());
        }

        for pose in &self.poses {
            if pose.id.is_empty() {
                errors.push("Pose has empty ID".to_string());
            }
            if pose.name.is_empty() {
                errors.push(format!("Pose '{}' has empty name", pose.id));
            }
            if pose.intensity < 1 || pose.intensity > 5 {
                errors.push(format!(
                    "Pose '{}' has intensity {} outside 1..=5",
                    pose.id, pose.intensity
                ));
            }

            if let Some(side_id) = &pose.side_pair {
                if side_id == &pose.id {
                    errors.push(format!("Pose '{}' is its own side pair", pose.id));
                } else {
                    match self.get(side_id) {
                        None => errors.push(format!(
                            "Pose '{}' references non-existent side pair '{}'",
                            pose.id, side_id
                        )),
                        Some(sibling) => {
                            if sibling.side_pair.as_deref() != Some(pose.id.as_str()) {
                                errors.push(format!(
                                    "Side pair '{}' <-> '{}' is not symmetric",
                                    pose.id, side_id
                                ));
                            }
                        }
                    }
                }
            }
        }

        if !self.poses.is_empty() {
            if !self
                .poses
                .iter()
                .any(|p| p.family == PoseFamily::Restorative)
            {
                errors.push("Catalog contains no restorative pose".to_string());
            }
            if !self
                .poses
                .iter()
                .any(|p| p.intensity <= STARTER_INTENSITY_MAX)
            {
                errors.push(format!(
                    "Catalog contains no starter pose with intensity <= {}",
                    STARTER_INTENSITY_MAX
                ));
            }
        }

        for edges in self.relations.values() {
            for relation in edges {
                if self.get(&relation.source_id).is_none() {
                    errors.push(format!(
                        "Relation references non-existent source pose '{}'",
                        relation.source_id
                    ));
                }
                if self.get(&relation.target_id).is_none() {
                    errors.push(format!(
                        "Relation references non-existent target pose '{}'",
                        relation.target_id
                    ));
                }
                if relation.source_id == relation.target_id {
                    errors.push(format!(
                        "Relation on '{}' points back at itself",
                        relation.source_id
                    ));
                }
                if relation.weight == 0 {
                    errors.push(format!(
                        "Relation '{}' -> '{}' has zero weight",
                        relation.source_id, relation.target_id
                    ));
                }
            }
        }

        errors
    }
}

// ============================================================================
// Preset Flows
// ============================================================================

/// A named, ready-made sequence shipped with the application
#[derive(Clone, Debug)]
pub struct PresetFlow {
    pub name: &'static str,
    pub flow: &'static [&'static str],
}

/// Built-in preset flows, referencing default catalog pose ids
pub const PRESET_FLOWS: &[PresetFlow] = &[
    PresetFlow {
        name: "Quick Core 15",
        flow: &["boat", "child", "boat", "bridge", "child"],
    },
    PresetFlow {
        name: "Hip Opener 30",
        flow: &[
            "butterfly",
            "pigeon",
            "high_lunge_r",
            "high_lunge_l",
            "pigeon",
            "child",
        ],
    },
    PresetFlow {
        name: "Morning Wake-Up",
        flow: &[
            "mountain",
            "forward_fold",
            "down_dog",
            "warrior1_r",
            "warrior1_l",
            "mountain",
        ],
    },
    PresetFlow {
        name: "Evening Unwind",
        flow: &["child", "butterfly", "forward_fold", "pigeon", "child"],
    },
    PresetFlow {
        name: "Restorative 20",
        flow: &["child", "butterfly", "pigeon", "butterfly", "child"],
    },
    PresetFlow {
        name: "Power 45",
        flow: &[
            "mountain",
            "forward_fold",
            "down_dog",
            "warrior1_r",
            "high_lunge_r",
            "twist_low",
            "forward_fold",
            "warrior1_l",
            "high_lunge_l",
            "twist_low",
            "child",
            "bridge",
            "child",
        ],
    },
];

/// Look up a preset flow by name, case-insensitively
pub fn find_preset(name: &str) -> Option<&'static PresetFlow> {
    PRESET_FLOWS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

// ============================================================================
// Default Data
// ============================================================================

/// Internal function that actually builds the catalog
fn build_default_catalog_internal() -> Catalog {
    let poses = vec![
        Pose {
            id: "butterfly".into(),
            name: "Butterfly Pose".into(),
            sanskrit: "Baddha Konasana".into(),
            family: PoseFamily::Seated,
            level: PoseLevel::Beginner,
            intensity: 2,
            side_pair: None,
            muscles_engaged: vec!["hips".into()],
            muscles_stretched: vec!["groin".into(), "inner_thighs".into()],
        },
        Pose {
            id: "forward_fold".into(),
            name: "Standing Forward Fold".into(),
            sanskrit: "Uttanasana".into(),
            family: PoseFamily::ForwardFold,
            level: PoseLevel::Beginner,
            intensity: 2,
            side_pair: None,
            muscles_engaged: vec!["core".into()],
            muscles_stretched: vec!["hamstrings".into(), "spine".into(), "calves".into()],
        },
        Pose {
            id: "down_dog".into(),
            name: "Downward Facing Dog".into(),
            sanskrit: "Adho Mukha Svanasana".into(),
            family: PoseFamily::Inversion,
            level: PoseLevel::Beginner,
            intensity: 3,
            side_pair: None,
            muscles_engaged: vec!["shoulders".into(), "arms".into(), "core".into()],
            muscles_stretched: vec!["hamstrings".into(), "calves".into(), "spine".into()],
        },
        Pose {
            id: "warrior1_r".into(),
            name: "Warrior I (Right)".into(),
            sanskrit: "Virabhadrasana I".into(),
            family: PoseFamily::Standing,
            level: PoseLevel::Intermediate,
            intensity: 3,
            side_pair: Some("warrior1_l".into()),
            muscles_engaged: vec!["quads".into(), "glutes".into(), "core".into()],
            muscles_stretched: vec!["hip_flexors".into(), "chest".into()],
        },
        Pose {
            id: "high_lunge_r".into(),
            name: "High Lunge (Right)".into(),
            sanskrit: "Anjaneyasana".into(),
            family: PoseFamily::Standing,
            level: PoseLevel::Intermediate,
            intensity: 3,
            side_pair: Some("high_lunge_l".into()),
            muscles_engaged: vec!["quads".into(), "glutes".into()],
            muscles_stretched: vec!["hip_flexors".into()],
        },
        Pose {
            id: "twist_low".into(),
            name: "Revolved Low Lunge".into(),
            sanskrit: "Parivrtta Anjaneyasana".into(),
            family: PoseFamily::Twist,
            level: PoseLevel::Intermediate,
            intensity: 4,
            side_pair: None,
            muscles_engaged: vec!["core".into(), "obliques".into()],
            muscles_stretched: vec!["spine".into(), "hips".into()],
        },
        Pose {
            id: "bridge".into(),
            name: "Bridge Pose".into(),
            sanskrit: "Setu Bandha Sarvangasana".into(),
            family: PoseFamily::Backbend,
            level: PoseLevel::Beginner,
            intensity: 2,
            side_pair: None,
            muscles_engaged: vec!["glutes".into(), "hamstrings".into()],
            muscles_stretched: vec!["chest".into(), "spine".into(), "hip_flexors".into()],
        },
        Pose {
            id: "pigeon".into(),
            name: "Sleeping Pigeon".into(),
            sanskrit: "Eka Pada Rajakapotasana".into(),
            family: PoseFamily::HipOpener,
            level: PoseLevel::Intermediate,
            intensity: 2,
            side_pair: None,
            muscles_engaged: vec![],
            muscles_stretched: vec!["glutes".into(), "hips".into(), "piriformis".into()],
        },
        Pose {
            id: "boat".into(),
            name: "Boat Pose".into(),
            sanskrit: "Navasana".into(),
            family: PoseFamily::Core,
            level: PoseLevel::Intermediate,
            intensity: 4,
            side_pair: None,
            muscles_engaged: vec!["core".into(), "hip_flexors".into()],
            muscles_stretched: vec!["hamstrings".into()],
        },
        Pose {
            id: "child".into(),
            name: "Child's Pose".into(),
            sanskrit: "Balasana".into(),
            family: PoseFamily::Restorative,
            level: PoseLevel::Beginner,
            intensity: 1,
            side_pair: None,
            muscles_engaged: vec![],
            muscles_stretched: vec!["spine".into(), "hips".into(), "shoulders".into()],
        },
        Pose {
            id: "warrior1_l".into(),
            name: "Warrior I (Left)".into(),
            sanskrit: "Virabhadrasana I".into(),
            family: PoseFamily::Standing,
            level: PoseLevel::Intermediate,
            intensity: 3,
            side_pair: Some("warrior1_r".into()),
            muscles_engaged: vec!["quads".into(), "glutes".into(), "core".into()],
            muscles_stretched: vec!["hip_flexors".into(), "chest".into()],
        },
        Pose {
            id: "high_lunge_l".into(),
            name: "High Lunge (Left)".into(),
            sanskrit: "Anjaneyasana".into(),
            family: PoseFamily::Standing,
            level: PoseLevel::Intermediate,
            intensity: 3,
            side_pair: Some("high_lunge_r".into()),
            muscles_engaged: vec!["quads".into(), "glutes".into()],
            muscles_stretched: vec!["hip_flexors".into()],
        },
        Pose {
            id: "wheel".into(),
            name: "Wheel Pose".into(),
            sanskrit: "Urdhva Dhanurasana".into(),
            family: PoseFamily::Backbend,
            level: PoseLevel::Advanced,
            intensity: 5,
            side_pair: None,
            muscles_engaged: vec!["glutes".into(), "shoulders".into(), "quads".into()],
            muscles_stretched: vec!["chest".into(), "spine".into(), "hip_flexors".into()],
        },
        Pose {
            id: "mountain".into(),
            name: "Mountain Pose".into(),
            sanskrit: "Tadasana".into(),
            family: PoseFamily::Standing,
            level: PoseLevel::Beginner,
            intensity: 1,
            side_pair: None,
            muscles_engaged: vec!["quads".into(), "core".into()],
            muscles_stretched: vec![],
        },
    ];

    let relations = vec![
        rel("child", "down_dog", RelationKind::TransitionOut, 8),
        rel("child", "butterfly", RelationKind::RelatedNext, 5),
        rel("child", "forward_fold", RelationKind::WarmUp, 4),
        rel("butterfly", "forward_fold", RelationKind::RelatedNext, 6),
        rel("butterfly", "pigeon", RelationKind::RelatedNext, 5),
        rel("forward_fold", "down_dog", RelationKind::TransitionOut, 9),
        rel("forward_fold", "child", RelationKind::Counterpose, 6),
        rel("down_dog", "warrior1_r", RelationKind::TransitionOut, 9),
        rel("down_dog", "high_lunge_r", RelationKind::TransitionOut, 8),
        rel("down_dog", "child", RelationKind::Counterpose, 7),
        rel("down_dog", "forward_fold", RelationKind::TransitionIn, 3),
        rel("warrior1_r", "high_lunge_r", RelationKind::TransitionOut, 7),
        rel("warrior1_r", "forward_fold", RelationKind::TransitionOut, 5),
        rel("warrior1_l", "high_lunge_l", RelationKind::TransitionOut, 7),
        rel("warrior1_l", "forward_fold", RelationKind::TransitionOut, 5),
        rel("high_lunge_r", "twist_low", RelationKind::TransitionOut, 8),
        rel("high_lunge_r", "warrior1_r", RelationKind::RelatedNext, 5),
        rel("high_lunge_l", "twist_low", RelationKind::TransitionOut, 8),
        rel("high_lunge_l", "warrior1_l", RelationKind::RelatedNext, 5),
        rel("twist_low", "down_dog", RelationKind::TransitionOut, 10),
        rel("twist_low", "child", RelationKind::Counterpose, 9),
        rel("twist_low", "forward_fold", RelationKind::Counterpose, 7),
        rel("bridge", "child", RelationKind::Counterpose, 9),
        rel("bridge", "butterfly", RelationKind::RelatedNext, 5),
        rel("bridge", "wheel", RelationKind::TransitionOut, 4),
        rel("pigeon", "forward_fold", RelationKind::TransitionOut, 6),
        rel("pigeon", "child", RelationKind::Counterpose, 7),
        rel("boat", "bridge", RelationKind::Counterpose, 8),
        rel("boat", "child", RelationKind::Counterpose, 9),
        rel("wheel", "child", RelationKind::Counterpose, 9),
        rel("wheel", "butterfly", RelationKind::Counterpose, 7),
        rel("wheel", "bridge", RelationKind::TransitionIn, 3),
        rel("mountain", "forward_fold", RelationKind::TransitionOut, 8),
        rel("mountain", "down_dog", RelationKind::RelatedNext, 4),
    ];

    Catalog::new(poses, relations)
}

fn rel(source: &str, target: &str, kind: RelationKind, weight: u32) -> PoseRelation {
    PoseRelation {
        source_id: source.into(),
        target_id: target.into(),
        kind,
        weight,
    }
}
