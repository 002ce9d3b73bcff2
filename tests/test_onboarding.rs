//! Onboarding sequencer transitions and persistence.

use std::sync::Arc;

use financesk_sdk::config::ONBOARDING_KEY;
use financesk_sdk::onboarding::{OnboardingSequencer, OnboardingStep, Outcome, Phase};
use financesk_sdk::storage::{FileStorage, KeyValueStorage, MemoryStorage, SharedStorage};

fn memory() -> SharedStorage {
    Arc::new(MemoryStorage::new())
}

fn completed_ids(seq: &OnboardingSequencer) -> Vec<String> {
    seq.state()
        .steps
        .iter()
        .filter(|s| s.completed)
        .map(|s| s.id.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

#[test]
fn three_nexts_complete_a_three_step_run() {
    let seq = OnboardingSequencer::with_default_steps(memory());
    assert_eq!(seq.phase(), Phase::Inactive { outcome: None });

    seq.start().unwrap();
    assert_eq!(seq.phase(), Phase::Active { step_index: 0 });
    assert_eq!(seq.current_step().unwrap().id, "welcome");

    seq.next().unwrap();
    assert_eq!(seq.phase(), Phase::Active { step_index: 1 });
    seq.next().unwrap();
    assert_eq!(seq.current_step().unwrap().id, "first-transaction");
    seq.next().unwrap();

    assert_eq!(
        seq.phase(),
        Phase::Inactive {
            outcome: Some(Outcome::Completed)
        }
    );
    assert_eq!(completed_ids(&seq).len(), 3);
    assert_eq!(seq.state().progress(), 100);
}

#[test]
fn skip_before_the_end_ends_as_skipped() {
    for nexts in 0..3 {
        let seq = OnboardingSequencer::with_default_steps(memory());
        seq.start().unwrap();
        for _ in 0..nexts {
            seq.next().unwrap();
        }

        seq.skip().unwrap();

        assert_eq!(
            seq.phase(),
            Phase::Inactive {
                outcome: Some(Outcome::Skipped)
            }
        );
        assert_eq!(completed_ids(&seq).len(), nexts);
    }
}

#[test]
fn next_and_skip_while_inactive_are_noops() {
    let seq = OnboardingSequencer::with_default_steps(memory());

    seq.next().unwrap();
    seq.skip().unwrap();
    seq.complete_step("welcome").unwrap();

    assert_eq!(seq.phase(), Phase::Inactive { outcome: None });
    assert!(completed_ids(&seq).is_empty());
}

#[test]
fn complete_step_flags_without_moving() {
    let seq = OnboardingSequencer::with_default_steps(memory());
    seq.start().unwrap();

    seq.complete_step("create-account").unwrap();
    seq.complete_step("no-such-step").unwrap();

    assert_eq!(seq.phase(), Phase::Active { step_index: 0 });
    assert_eq!(completed_ids(&seq), vec!["create-account"]);
}

#[test]
fn restart_clears_completion_flags() {
    let seq = OnboardingSequencer::with_default_steps(memory());
    seq.finish().unwrap();
    assert_eq!(completed_ids(&seq).len(), 3);

    seq.start().unwrap();

    assert!(completed_ids(&seq).is_empty());
    assert!(seq.is_active());
}

#[test]
fn empty_definition_completes_on_start() {
    let seq = OnboardingSequencer::new(memory(), Vec::new());
    seq.start().unwrap();
    assert_eq!(seq.state().outcome(), Some(Outcome::Completed));
}

#[test]
fn subscribers_observe_transitions() {
    let seq = OnboardingSequencer::with_default_steps(memory());
    let mut rx = seq.subscribe();

    seq.start().unwrap();

    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_active());

    seq.complete_step("create-account").unwrap();
    assert!(rx.has_changed().unwrap());
    rx.borrow_and_update();

    // Repeating it changes nothing, so nothing is published.
    seq.complete_step("create-account").unwrap();
    assert!(!rx.has_changed().unwrap());
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn progress_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let storage: SharedStorage =
        Arc::new(FileStorage::new(Some(dir.path().to_path_buf())).unwrap());

    let first = OnboardingSequencer::with_default_steps(storage.clone());
    assert!(first.should_auto_start());
    first.start().unwrap();
    first.next().unwrap();
    drop(first);

    let second = OnboardingSequencer::with_default_steps(storage);
    assert!(!second.should_auto_start());
    assert_eq!(second.phase(), Phase::Active { step_index: 1 });
    assert_eq!(completed_ids(&second), vec!["welcome"]);
}

#[test]
fn skipped_run_does_not_auto_start_again() {
    let storage = memory();
    let seq = OnboardingSequencer::with_default_steps(storage.clone());
    seq.start().unwrap();
    seq.skip().unwrap();

    let restored = OnboardingSequencer::with_default_steps(storage);
    assert!(!restored.should_auto_start());
    assert_eq!(restored.state().outcome(), Some(Outcome::Skipped));
}

#[test]
fn corrupt_storage_rehydrates_as_inactive() {
    let storage = memory();
    storage.set(ONBOARDING_KEY, "{not json").unwrap();

    let seq = OnboardingSequencer::with_default_steps(storage.clone());

    assert_eq!(seq.phase(), Phase::Inactive { outcome: None });
    assert!(storage.get(ONBOARDING_KEY).unwrap().is_none());
    assert!(seq.should_auto_start());
}

#[test]
fn out_of_range_step_rehydrates_as_inactive() {
    let storage = memory();
    storage
        .set(
            ONBOARDING_KEY,
            r#"{"phase":{"status":"active","step_index":9},"steps":[]}"#,
        )
        .unwrap();

    let seq = OnboardingSequencer::with_default_steps(storage);

    assert_eq!(seq.phase(), Phase::Inactive { outcome: None });
    assert_eq!(seq.state().steps.len(), 3);
}

#[test]
fn custom_steps_keep_their_order() {
    let steps = vec![
        OnboardingStep::new("a", "A", "first", "/a"),
        OnboardingStep::new("b", "B", "second", "/b"),
    ];
    let seq = OnboardingSequencer::new(memory(), steps);

    seq.start().unwrap();
    seq.next().unwrap();

    assert_eq!(seq.current_step().unwrap().route, "/b");
    seq.next().unwrap();
    assert_eq!(seq.state().outcome(), Some(Outcome::Completed));
}
