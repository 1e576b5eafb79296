//! Safer-alternative rewriting for risky sequences.
//!
//! Produces a copy of a sequence with a configured rest pose spliced in
//! after the dangerous pairs. The scan runs from the end of the sequence
//! backwards so that an insertion never shifts the pairs still waiting to
//! be examined.

use crate::config::RepairConfig;
use crate::safety::HIGH_INTENSITY_MIN;
use crate::{Catalog, PoseFamily, TransitionRisk};

/// Build a safer copy of `sequence` by inserting the rest pose after each
/// risky pair
///
/// A pair qualifies when both poses are high intensity, or when a backbend
/// flows straight into a forward fold. When `risks` is empty the sequence
/// comes back unchanged. Pairs containing an unknown pose id are left
/// alone.
pub fn repair_sequence(
    catalog: &Catalog,
    config: &RepairConfig,
    sequence: &[String],
    risks: &[TransitionRisk],
) -> Vec<String> {
    let mut repaired: Vec<String> = sequence.to_vec();

    if risks.is_empty() {
        return repaired;
    }

    for i in (0..sequence.len().saturating_sub(1)).rev() {
        let (from, to) = match (catalog.get(&repaired[i]), catalog.get(&repaired[i + 1])) {
            (Some(from), Some(to)) => (from, to),
            _ => continue,
        };

        let high_intensity_pair =
            from.intensity >= HIGH_INTENSITY_MIN && to.intensity >= HIGH_INTENSITY_MIN;
        let spine_reversal =
            from.family == PoseFamily::Backbend && to.family == PoseFamily::ForwardFold;

        if high_intensity_pair || spine_reversal {
            repaired.insert(i + 1, config.rest_pose_id.clone());
            tracing::debug!(
                "Inserted rest pose '{}' after '{}'",
                config.rest_pose_id,
                from.id
            );
        }
    }

    repaired
}
