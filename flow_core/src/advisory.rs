//! Advisory note generation for validated sequences.
//!
//! Advisory text comes from an external collaborator behind the
//! [`AdvisoryService`] trait. The engine never blocks on it for longer
//! than the configured timeout and never returns without notes: when the
//! service is slow, fails, or produces nothing, canned fallback guidance
//! takes its place.

use crate::{Catalog, Result};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Maximum number of advisory notes surfaced to the user
pub const MAX_NOTES: usize = 3;

/// Canned guidance used whenever the advisory service cannot answer
pub const FALLBACK_NOTES: [&str; 2] = [
    "Advisory notes are unavailable right now. Please review your sequence manually.",
    "Ensure you have proper warm-up poses at the beginning and cool-down poses at the end.",
];

/// Notes served by [`OfflineAdvisor`] when no live service is configured
pub const OFFLINE_NOTES: [&str; 2] = [
    "Advisory guidance is not configured. Please check the basic safety findings below.",
    "Ensure proper warm-up and cool-down poses are included in your sequence.",
];

/// A collaborator that turns a sequence description into guidance notes
///
/// Implementations may call out to anything (a remote model, a rules
/// service, a fixture). They must be safe to invoke from a worker thread.
pub trait AdvisoryService: Send + Sync {
    /// Produce free-text notes for a described sequence
    fn notes(&self, description: &str) -> Result<Vec<String>>;
}

/// Default advisor used when no external service is wired up
///
/// Always answers immediately with canned guidance, keeping the
/// validation flow identical whether or not a live service exists.
pub struct OfflineAdvisor;

impl AdvisoryService for OfflineAdvisor {
    fn notes(&self, _description: &str) -> Result<Vec<String>> {
        Ok(OFFLINE_NOTES.iter().map(|s| s.to_string()).collect())
    }
}

/// Ask the advisor for notes, falling back after `timeout`
///
/// The call runs on its own thread so a hung service cannot stall
/// validation. Successful answers are truncated to [`MAX_NOTES`]; empty
/// answers, errors, and timeouts all produce [`FALLBACK_NOTES`].
pub fn notes_with_timeout(
    advisor: Arc<dyn AdvisoryService>,
    description: String,
    timeout: Duration,
) -> Vec<String> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        // The receiver may be gone after a timeout; that is fine.
        let _ = tx.send(advisor.notes(&description));
    });

    match rx.recv_timeout(timeout) {
        Ok(Ok(mut notes)) => {
            if notes.is_empty() {
                tracing::warn!("Advisory service returned no notes, using fallback");
                fallback_notes()
            } else {
                notes.truncate(MAX_NOTES);
                notes
            }
        }
        Ok(Err(e)) => {
            tracing::warn!("Advisory service failed: {}", e);
            fallback_notes()
        }
        Err(_) => {
            tracing::warn!("Advisory service timed out after {:?}", timeout);
            fallback_notes()
        }
    }
}

/// Render a sequence as the plain-text description advisors receive
///
/// Unknown ids are passed through as-is so the advisor sees the same
/// sequence the user typed.
pub fn describe_sequence(catalog: &Catalog, sequence: &[String]) -> String {
    sequence
        .iter()
        .map(|id| match catalog.get(id) {
            Some(pose) => format!(
                "{} ({}, intensity {})",
                pose.name,
                pose.family.as_str(),
                pose.intensity
            ),
            None => id.clone(),
        })
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn fallback_notes() -> Vec<String> {
    FALLBACK_NOTES.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;
    use crate::Error;

    struct CannedAdvisor(Vec<String>);

    impl AdvisoryService for CannedAdvisor {
        fn notes(&self, _description: &str) -> Result<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    struct FailingAdvisor;

    impl AdvisoryService for FailingAdvisor {
        fn notes(&self, _description: &str) -> Result<Vec<String>> {
            Err(Error::Advisory("upstream unavailable".into()))
        }
    }

    struct SlowAdvisor;

    impl AdvisoryService for SlowAdvisor {
        fn notes(&self, _description: &str) -> Result<Vec<String>> {
            thread::sleep(Duration::from_secs(2));
            Ok(vec!["too late".into()])
        }
    }

    #[test]
    fn test_successful_notes_pass_through() {
        let advisor = Arc::new(CannedAdvisor(vec!["breathe".into(), "hydrate".into()]));

        let notes = notes_with_timeout(advisor, "seq".into(), Duration::from_secs(1));

        assert_eq!(notes, vec!["breathe".to_string(), "hydrate".to_string()]);
    }

    #[test]
    fn test_notes_truncated_to_cap() {
        let advisor = Arc::new(CannedAdvisor(
            (0..6).map(|i| format!("note {}", i)).collect(),
        ));

        let notes = notes_with_timeout(advisor, "seq".into(), Duration::from_secs(1));

        assert_eq!(notes.len(), MAX_NOTES);
        assert_eq!(notes[0], "note 0");
    }

    #[test]
    fn test_empty_answer_falls_back() {
        let advisor = Arc::new(CannedAdvisor(vec![]));

        let notes = notes_with_timeout(advisor, "seq".into(), Duration::from_secs(1));

        assert_eq!(notes, FALLBACK_NOTES.to_vec());
    }

    #[test]
    fn test_service_error_falls_back() {
        let notes = notes_with_timeout(
            Arc::new(FailingAdvisor),
            "seq".into(),
            Duration::from_secs(1),
        );

        assert_eq!(notes, FALLBACK_NOTES.to_vec());
    }

    #[test]
    fn test_slow_service_falls_back_after_timeout() {
        let notes = notes_with_timeout(
            Arc::new(SlowAdvisor),
            "seq".into(),
            Duration::from_millis(50),
        );

        assert_eq!(notes, FALLBACK_NOTES.to_vec());
    }

    #[test]
    fn test_offline_advisor_answers_immediately() {
        let notes = notes_with_timeout(
            Arc::new(OfflineAdvisor),
            "seq".into(),
            Duration::from_secs(1),
        );

        assert_eq!(notes, OFFLINE_NOTES.to_vec());
    }

    #[test]
    fn test_describe_sequence_includes_family_and_intensity() {
        let catalog = build_default_catalog();
        let sequence = vec!["bridge".to_string(), "mystery_pose".to_string()];

        let description = describe_sequence(&catalog, &sequence);

        assert_eq!(
            description,
            "Bridge Pose (backbend, intensity 2) -> mystery_pose"
        );
    }

    #[test]
    fn test_describe_empty_sequence() {
        let catalog = build_default_catalog();
        assert_eq!(describe_sequence(&catalog, &[]), "");
    }
}
