//! Transition risk analysis for pose sequences.
//!
//! Every adjacent pair in a sequence is checked against four independent
//! rules. A single pair can trip more than one rule and contribute several
//! findings. Pairs with an id missing from the catalog are skipped.

use crate::{Catalog, PoseFamily, RiskLevel, SafetyVerdict, TransitionRisk};

/// Intensity at or above which a pose counts as high intensity
pub const HIGH_INTENSITY_MIN: u8 = 4;

/// Scan a sequence for risky adjacent-pair transitions
///
/// ## Rules
///
/// 1. Both poses at intensity 4 or higher (medium)
/// 2. Backbend followed by a forward fold (high)
/// 3. Forward fold followed by a backbend (medium)
/// 4. Inversion followed by a standing pose (medium)
pub fn analyze_transitions(catalog: &Catalog, sequence: &[String]) -> Vec<TransitionRisk> {
    let mut risks = Vec::new();

    for pair in sequence.windows(2) {
        let (from, to) = match (catalog.get(&pair[0]), catalog.get(&pair[1])) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                tracing::debug!("Skipping pair with unknown pose: {} -> {}", pair[0], pair[1]);
                continue;
            }
        };

        if from.intensity >= HIGH_INTENSITY_MIN && to.intensity >= HIGH_INTENSITY_MIN {
            risks.push(TransitionRisk {
                from_pose: from.name.clone(),
                to_pose: to.name.clone(),
                level: RiskLevel::Medium,
                reason: "Back-to-back high intensity poses without rest".into(),
                suggestion: "Consider adding a rest pose or reducing intensity".into(),
            });
        }

        if from.family == PoseFamily::Backbend && to.family == PoseFamily::ForwardFold {
            risks.push(TransitionRisk {
                from_pose: from.name.clone(),
                to_pose: to.name.clone(),
                level: RiskLevel::High,
                reason: "Sudden spine direction reversal from backbend to forward fold".into(),
                suggestion: "Add a neutral spine pose like Child's Pose between them".into(),
            });
        }

        if from.family == PoseFamily::ForwardFold && to.family == PoseFamily::Backbend {
            risks.push(TransitionRisk {
                from_pose: from.name.clone(),
                to_pose: to.name.clone(),
                level: RiskLevel::Medium,
                reason: "Quick spine direction change from forward fold to backbend".into(),
                suggestion: "Add a neutral preparation pose".into(),
            });
        }

        if from.family == PoseFamily::Inversion && to.family == PoseFamily::Standing {
            risks.push(TransitionRisk {
                from_pose: from.name.clone(),
                to_pose: to.name.clone(),
                level: RiskLevel::Medium,
                reason: "Quick transition from inversion to standing pose".into(),
                suggestion: "Add a brief neutral pose to allow blood flow adjustment".into(),
            });
        }
    }

    risks
}

/// Roll individual findings up into one verdict
///
/// Any high finding makes the sequence unsafe. More than one medium
/// finding downgrades it to caution. Otherwise it is safe.
pub fn aggregate_safety(risks: &[TransitionRisk]) -> SafetyVerdict {
    let high_risks = risks.iter().filter(|r| r.level == RiskLevel::High).count();
    let medium_risks = risks
        .iter()
        .filter(|r| r.level == RiskLevel::Medium)
        .count();

    if high_risks > 0 {
        SafetyVerdict::Unsafe
    } else if medium_risks > 1 {
        SafetyVerdict::Caution
    } else {
        SafetyVerdict::Safe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{build_default_catalog, Catalog};
    use crate::types::{Pose, PoseLevel};

    fn seq(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn test_pose(id: &str, family: PoseFamily, intensity: u8) -> Pose {
        Pose {
            id: id.into(),
            name: id.to_uppercase(),
            sanskrit: String::new(),
            family,
            level: PoseLevel::Beginner,
            intensity,
            side_pair: None,
            muscles_engaged: vec![],
            muscles_stretched: vec![],
        }
    }

    #[test]
    fn test_high_intensity_pair_is_flagged() {
        let catalog = build_default_catalog();

        let risks = analyze_transitions(&catalog, &seq(&["boat", "twist_low"]));

        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].level, RiskLevel::Medium);
        assert_eq!(risks[0].from_pose, "Boat Pose");
        assert_eq!(risks[0].to_pose, "Revolved Low Lunge");
        assert!(risks[0].reason.contains("high intensity"));
    }

    #[test]
    fn test_backbend_to_forward_fold_is_high_risk() {
        let catalog = build_default_catalog();

        let risks = analyze_transitions(&catalog, &seq(&["bridge", "forward_fold"]));

        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].level, RiskLevel::High);
        assert!(risks[0].reason.contains("spine direction reversal"));
    }

    #[test]
    fn test_forward_fold_to_backbend_is_medium_risk() {
        let catalog = build_default_catalog();

        let risks = analyze_transitions(&catalog, &seq(&["forward_fold", "bridge"]));

        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].level, RiskLevel::Medium);
        assert!(risks[0].reason.contains("forward fold to backbend"));
    }

    #[test]
    fn test_inversion_to_standing_is_medium_risk() {
        let catalog = build_default_catalog();

        let risks = analyze_transitions(&catalog, &seq(&["down_dog", "warrior1_r"]));

        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].level, RiskLevel::Medium);
        assert!(risks[0].reason.contains("inversion to standing"));
    }

    #[test]
    fn test_one_pair_can_trip_multiple_rules() {
        // An intensity-5 backbend into an intensity-4 forward fold matches
        // both the intensity rule and the spine reversal rule.
        let catalog = Catalog::new(
            vec![
                test_pose("big_bend", PoseFamily::Backbend, 5),
                test_pose("deep_fold", PoseFamily::ForwardFold, 4),
            ],
            vec![],
        );

        let risks = analyze_transitions(&catalog, &seq(&["big_bend", "deep_fold"]));

        assert_eq!(risks.len(), 2);
        assert_eq!(risks[0].level, RiskLevel::Medium);
        assert_eq!(risks[1].level, RiskLevel::High);
    }

    #[test]
    fn test_gentle_sequence_has_no_findings() {
        let catalog = build_default_catalog();

        let risks = analyze_transitions(
            &catalog,
            &seq(&["child", "butterfly", "forward_fold", "child"]),
        );

        assert!(risks.is_empty());
    }

    #[test]
    fn test_empty_and_single_sequences_have_no_findings() {
        let catalog = build_default_catalog();

        assert!(analyze_transitions(&catalog, &[]).is_empty());
        assert!(analyze_transitions(&catalog, &seq(&["boat"])).is_empty());
    }

    #[test]
    fn test_pairs_with_unknown_poses_are_skipped() {
        let catalog = build_default_catalog();

        // bridge -> ??? and ??? -> forward_fold are both unscorable, so the
        // would-be reversal between bridge and forward_fold goes unseen.
        let risks = analyze_transitions(
            &catalog,
            &seq(&["bridge", "mystery_pose", "forward_fold"]),
        );

        assert!(risks.is_empty());
    }

    #[test]
    fn test_aggregate_no_findings_is_safe() {
        assert_eq!(aggregate_safety(&[]), SafetyVerdict::Safe);
    }

    #[test]
    fn test_aggregate_single_medium_is_safe() {
        let catalog = build_default_catalog();
        let risks = analyze_transitions(&catalog, &seq(&["down_dog", "warrior1_r"]));

        assert_eq!(risks.len(), 1);
        assert_eq!(aggregate_safety(&risks), SafetyVerdict::Safe);
    }

    #[test]
    fn test_aggregate_two_mediums_is_caution() {
        let catalog = build_default_catalog();
        let risks = analyze_transitions(&catalog, &seq(&["boat", "twist_low", "boat"]));

        assert_eq!(risks.len(), 2);
        assert_eq!(aggregate_safety(&risks), SafetyVerdict::Caution);
    }

    #[test]
    fn test_aggregate_any_high_is_unsafe() {
        let catalog = build_default_catalog();
        let risks = analyze_transitions(&catalog, &seq(&["bridge", "forward_fold"]));

        assert_eq!(aggregate_safety(&risks), SafetyVerdict::Unsafe);
    }

    #[test]
    fn test_aggregate_high_outranks_mediums() {
        let catalog = build_default_catalog();
        let risks = analyze_transitions(
            &catalog,
            &seq(&["boat", "twist_low", "boat", "bridge", "forward_fold"]),
        );

        // Two mediums and one high: the high decides.
        assert_eq!(aggregate_safety(&risks), SafetyVerdict::Unsafe);
    }
}
