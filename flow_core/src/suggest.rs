//! Next-pose suggestion engine.
//!
//! Given the sequence built so far, this module scores candidate poses:
//! - The unfinished side of a bilateral pair dominates everything else
//! - Relation edges out of the last pose contribute their weights, with a
//!   bonus for counterposes after an intense stretch of practice
//! - Level-matched poses backfill at a nominal score when candidates run short
//!
//! Duplicate candidates keep the highest score seen, poses already in the
//! sequence are never suggested, and only the top five survive.

use crate::config::SuggestionConfig;
use crate::{Catalog, Pose, RelationKind};
use std::collections::{HashMap, HashSet};

/// Maximum number of suggestions returned per call
pub const MAX_SUGGESTIONS: usize = 5;

/// Intensity ceiling for the openers offered on an empty sequence
pub const STARTER_INTENSITY_MAX: u8 = 2;

/// A candidate pose with its accumulated score
#[derive(Clone, Debug)]
struct ScoredCandidate<'a> {
    pose: &'a Pose,
    score: u32,
}

/// Suggest up to five next poses for a partially built sequence
///
/// ## Scoring
///
/// 1. **Bilateral follow-up**: if the last pose has a side pair and the
///    pose before it was not that sibling, the sibling scores
///    `bilateral_priority` so the body finishes both sides.
///
/// 2. **Relation edges**: every relation out of the last pose contributes
///    its weight. When the last two poses sum to more than
///    `recent_intensity_threshold`, counterpose edges get
///    `counterpose_bonus` on top.
///
/// 3. **Backfill**: if fewer than five distinct candidates were found,
///    poses matching the last pose's level join at `backfill_score`,
///    in catalog order.
///
/// Candidates seen more than once keep their maximum score, anything
/// already in the sequence is dropped, and ties preserve discovery order.
///
/// An empty sequence instead returns up to five gentle starters
/// (intensity <= `STARTER_INTENSITY_MAX`) in catalog order.
pub fn suggest_next<'a>(
    catalog: &'a Catalog,
    config: &SuggestionConfig,
    sequence: &[String],
) -> Vec<&'a Pose> {
    if sequence.is_empty() {
        return starter_poses(catalog);
    }

    let last = match catalog.get(&sequence[sequence.len() - 1]) {
        Some(pose) => pose,
        None => {
            tracing::debug!(
                "Last pose '{}' is not in the catalog, no suggestions",
                sequence[sequence.len() - 1]
            );
            return Vec::new();
        }
    };

    let mut candidates: Vec<ScoredCandidate<'a>> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    // Rule 1: finish the other side of a bilateral pose
    if let Some(side_id) = &last.side_pair {
        let second_last = sequence
            .len()
            .checked_sub(2)
            .map(|i| sequence[i].as_str());

        if second_last != Some(side_id.as_str()) {
            if let Some(sibling) = catalog.get(side_id) {
                add_candidate(&mut candidates, &mut index, sibling, config.bilateral_priority);
            }
        }
    }

    // Rule 2: relation edges out of the last pose
    let recent_intensity: u32 = sequence
        .iter()
        .rev()
        .take(2)
        .filter_map(|id| catalog.get(id))
        .map(|pose| pose.intensity as u32)
        .sum();

    for relation in catalog.relations_from(&last.id) {
        if let Some(target) = catalog.get(&relation.target_id) {
            let mut score = relation.weight;
            if recent_intensity > config.recent_intensity_threshold
                && relation.kind == RelationKind::Counterpose
            {
                score += config.counterpose_bonus;
            }
            add_candidate(&mut candidates, &mut index, target, score);
        }
    }

    // Rule 3: backfill with level-matched poses when candidates run short
    if candidates.len() < MAX_SUGGESTIONS {
        for pose in catalog.poses() {
            if pose.level == last.level {
                add_candidate(&mut candidates, &mut index, pose, config.backfill_score);
            }
        }
    }

    // Never resuggest a pose the sequence already contains
    let used: HashSet<&str> = sequence.iter().map(String::as_str).collect();
    candidates.retain(|candidate| !used.contains(candidate.pose.id.as_str()));

    // Stable sort: equal scores keep discovery order
    candidates.sort_by(|a, b| b.score.cmp(&a.score));

    candidates
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|candidate| candidate.pose)
        .collect()
}

/// Gentle openers for an empty sequence, in catalog order
fn starter_poses(catalog: &Catalog) -> Vec<&Pose> {
    catalog
        .poses()
        .iter()
        .filter(|pose| pose.intensity <= STARTER_INTENSITY_MAX)
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Record a candidate, keeping the maximum score if it was already seen
fn add_candidate<'a>(
    candidates: &mut Vec<ScoredCandidate<'a>>,
    index: &mut HashMap<&'a str, usize>,
    pose: &'a Pose,
    score: u32,
) {
    match index.get(pose.id.as_str()) {
        Some(&at) => {
            if score > candidates[at].score {
                candidates[at].score = score;
            }
        }
        None => {
            index.insert(pose.id.as_str(), candidates.len());
            candidates.push(ScoredCandidate { pose, score });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{build_default_catalog, get_default_catalog};
    use crate::types::{PoseFamily, PoseLevel, PoseRelation};

    fn seq(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn ids<'a>(poses: &[&'a Pose]) -> Vec<&'a str> {
        poses.iter().map(|pose| pose.id.as_str()).collect()
    }

    fn test_pose(id: &str, family: PoseFamily, level: PoseLevel, intensity: u8) -> Pose {
        Pose {
            id: id.into(),
            name: id.to_uppercase(),
            sanskrit: String::new(),
            family,
            level,
            intensity,
            side_pair: None,
            muscles_engaged: vec![],
            muscles_stretched: vec![],
        }
    }

    fn edge(source: &str, target: &str, kind: RelationKind, weight: u32) -> PoseRelation {
        PoseRelation {
            source_id: source.into(),
            target_id: target.into(),
            kind,
            weight,
        }
    }

    #[test]
    fn test_empty_sequence_returns_gentle_starters() {
        let catalog = build_default_catalog();
        let config = SuggestionConfig::default();

        let suggestions = suggest_next(&catalog, &config, &[]);

        assert_eq!(
            ids(&suggestions),
            vec!["butterfly", "forward_fold", "bridge", "pigeon", "child"]
        );
        assert!(suggestions
            .iter()
            .all(|pose| pose.intensity <= STARTER_INTENSITY_MAX));
    }

    #[test]
    fn test_bilateral_sibling_ranks_first() {
        let catalog = build_default_catalog();
        let config = SuggestionConfig::default();

        let suggestions = suggest_next(&catalog, &config, &seq(&["down_dog", "warrior1_r"]));

        assert_eq!(suggestions[0].id, "warrior1_l");
    }

    #[test]
    fn test_relation_weights_rank_candidates() {
        let catalog = build_default_catalog();
        let config = SuggestionConfig::default();

        let suggestions = suggest_next(&catalog, &config, &seq(&["child"]));

        // down_dog (8) and butterfly (5) by edge weight, then backfilled
        // beginners at score 1 in catalog order.
        assert_eq!(
            ids(&suggestions),
            vec!["down_dog", "butterfly", "forward_fold", "bridge", "mountain"]
        );
    }

    #[test]
    fn test_counterpose_bonus_applies_above_threshold() {
        let catalog = build_default_catalog();
        let config = SuggestionConfig::default();

        // wheel (5) + twist_low (4) = 9, over the threshold of 8: the
        // counterpose edges out of twist_low outrank its strongest
        // transition edge.
        let suggestions = suggest_next(&catalog, &config, &seq(&["wheel", "twist_low"]));

        assert_eq!(suggestions[0].id, "child");
        assert_eq!(suggestions[1].id, "forward_fold");
        assert_eq!(suggestions[2].id, "down_dog");
    }

    #[test]
    fn test_counterpose_bonus_not_applied_at_threshold() {
        let catalog = build_default_catalog();
        let config = SuggestionConfig::default();

        // boat (4) + twist_low (4) = 8: exactly at the threshold, so no
        // bonus and the strongest transition edge wins.
        let suggestions = suggest_next(&catalog, &config, &seq(&["boat", "twist_low"]));

        assert_eq!(suggestions[0].id, "down_dog");
    }

    #[test]
    fn test_backfill_used_when_candidates_run_short() {
        let catalog = build_default_catalog();
        let config = SuggestionConfig::default();

        let suggestions = suggest_next(&catalog, &config, &seq(&["boat"]));

        // Two counterpose edges, then intermediate poses in catalog order.
        assert_eq!(
            ids(&suggestions),
            vec!["child", "bridge", "warrior1_r", "high_lunge_r", "twist_low"]
        );
    }

    #[test]
    fn test_backfill_skipped_when_enough_candidates() {
        let level = PoseLevel::Intermediate;
        let poses = vec![
            test_pose("a", PoseFamily::Standing, level.clone(), 3),
            test_pose("b", PoseFamily::Standing, level.clone(), 3),
            test_pose("c", PoseFamily::Standing, level.clone(), 3),
            test_pose("d", PoseFamily::Standing, level.clone(), 3),
            test_pose("e", PoseFamily::Standing, level.clone(), 3),
            test_pose("f", PoseFamily::Standing, level.clone(), 3),
            test_pose("quiet", PoseFamily::Restorative, level, 1),
        ];
        let relations = vec![
            edge("a", "b", RelationKind::TransitionOut, 9),
            edge("a", "c", RelationKind::TransitionOut, 8),
            edge("a", "d", RelationKind::TransitionOut, 7),
            edge("a", "e", RelationKind::TransitionOut, 6),
            edge("a", "f", RelationKind::TransitionOut, 5),
        ];
        let catalog = Catalog::new(poses, relations);
        let config = SuggestionConfig::default();

        let suggestions = suggest_next(&catalog, &config, &seq(&["a"]));

        // Five distinct edge candidates already, so the level-matched
        // "quiet" pose never joins.
        assert_eq!(ids(&suggestions), vec!["b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_duplicate_candidates_keep_maximum_score() {
        let poses = vec![
            test_pose("a", PoseFamily::Standing, PoseLevel::Beginner, 2),
            test_pose("b", PoseFamily::Standing, PoseLevel::Beginner, 2),
            test_pose("c", PoseFamily::Standing, PoseLevel::Beginner, 2),
        ];
        let relations = vec![
            edge("a", "b", RelationKind::RelatedNext, 6),
            edge("a", "b", RelationKind::TransitionOut, 2),
            edge("a", "c", RelationKind::TransitionOut, 3),
        ];
        let catalog = Catalog::new(poses, relations);
        let config = SuggestionConfig::default();

        let suggestions = suggest_next(&catalog, &config, &seq(&["a"]));

        // If the weaker duplicate edge overwrote the stronger one,
        // "c" (3) would rank ahead of "b".
        assert_eq!(ids(&suggestions), vec!["b", "c"]);
    }

    #[test]
    fn test_never_resuggests_sequence_poses() {
        let catalog = build_default_catalog();
        let config = SuggestionConfig::default();
        let sequence = seq(&["warrior1_l", "down_dog", "warrior1_r"]);

        let suggestions = suggest_next(&catalog, &config, &sequence);

        for pose in &suggestions {
            assert!(
                !sequence.contains(&pose.id),
                "Suggested pose {} is already in the sequence",
                pose.id
            );
        }
    }

    #[test]
    fn test_caps_at_five_suggestions() {
        let catalog = build_default_catalog();
        let config = SuggestionConfig::default();

        // pigeon has two edges plus seven intermediate backfill poses.
        let suggestions = suggest_next(&catalog, &config, &seq(&["pigeon"]));

        assert_eq!(suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(suggestions[0].id, "child");
        assert_eq!(suggestions[1].id, "forward_fold");
    }

    #[test]
    fn test_unknown_last_pose_returns_empty() {
        let catalog = build_default_catalog();
        let config = SuggestionConfig::default();

        let suggestions = suggest_next(&catalog, &config, &seq(&["mystery_pose"]));

        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_unknown_earlier_poses_are_ignored() {
        let catalog = build_default_catalog();
        let config = SuggestionConfig::default();

        // The unknown pose contributes nothing to recent intensity, so
        // boat alone (4) stays under the threshold and no bonus applies.
        let suggestions = suggest_next(&catalog, &config, &seq(&["mystery_pose", "boat"]));

        assert_eq!(suggestions[0].id, "child");
    }

    #[test]
    fn test_exhausted_catalog_returns_empty() {
        let catalog = build_default_catalog();
        let config = SuggestionConfig::default();
        let everything: Vec<String> =
            catalog.poses().iter().map(|pose| pose.id.clone()).collect();

        let suggestions = suggest_next(&catalog, &config, &everything);

        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_concurrent_suggestions_agree() {
        let catalog = get_default_catalog();
        let baseline: Vec<String> = suggest_next(
            catalog,
            &SuggestionConfig::default(),
            &seq(&["down_dog", "warrior1_r"]),
        )
        .iter()
        .map(|pose| pose.id.clone())
        .collect();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(move || {
                    suggest_next(
                        get_default_catalog(),
                        &SuggestionConfig::default(),
                        &seq(&["down_dog", "warrior1_r"]),
                    )
                    .iter()
                    .map(|pose| pose.id.clone())
                    .collect::<Vec<String>>()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), baseline);
        }
    }
}
