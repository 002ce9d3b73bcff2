//! Linear onboarding walkthrough with persisted progress.
//!
//! The sequencer is `Inactive` until started, then `Active` on one step at a
//! time, and ends `Inactive` again with an [`Outcome`]. The whole state is
//! written to local storage after every transition that changes it and read
//! back when the sequencer is built. Missing or unreadable storage yields a
//! fresh `Inactive` state; it never fails.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::config;
use crate::error::Result;
use crate::storage::{self, SharedStorage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingStep {
    pub id: String,
    pub title: String,
    pub description: String,
    pub route: String,
    #[serde(default)]
    pub completed: bool,
}

impl OnboardingStep {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        route: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            route: route.into(),
            completed: false,
        }
    }
}

/// How an onboarding run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Completed,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Phase {
    /// Not running. `outcome` is `None` until a run has ended.
    Inactive { outcome: Option<Outcome> },
    Active { step_index: usize },
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Inactive { outcome: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingState {
    pub phase: Phase,
    pub steps: Vec<OnboardingStep>,
}

impl OnboardingState {
    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active { .. })
    }

    pub fn current_step(&self) -> Option<&OnboardingStep> {
        match self.phase {
            Phase::Active { step_index } => self.steps.get(step_index),
            Phase::Inactive { .. } => None,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Inactive { outcome } => outcome,
            Phase::Active { .. } => None,
        }
    }

    /// Completed steps as a whole percentage of all steps.
    pub fn progress(&self) -> i64 {
        let done = self.steps.iter().filter(|s| s.completed).count();
        crate::views::percentage(done as f64, self.steps.len() as f64)
    }

    /// Merge a persisted state into the current step definition.
    ///
    /// Completion flags carry over by step id. An active index past the end
    /// of the definition is treated as a corrupt record.
    fn reconcile(steps: Vec<OnboardingStep>, stored: OnboardingState) -> Self {
        let steps: Vec<OnboardingStep> = steps
            .into_iter()
            .map(|mut step| {
                step.completed = stored
                    .steps
                    .iter()
                    .any(|s| s.id == step.id && s.completed);
                step
            })
            .collect();

        let phase = match stored.phase {
            Phase::Active { step_index } if step_index >= steps.len() => {
                tracing::warn!(step_index, "stored onboarding step is out of range");
                Phase::default()
            }
            phase => phase,
        };

        Self { phase, steps }
    }
}

// ---------------------------------------------------------------------------
// OnboardingSequencer
// ---------------------------------------------------------------------------

pub struct OnboardingSequencer {
    state: watch::Sender<OnboardingState>,
    storage: SharedStorage,
}

impl OnboardingSequencer {
    /// Build a sequencer over `steps`, restoring any persisted progress.
    pub fn new(storage: SharedStorage, steps: Vec<OnboardingStep>) -> Self {
        let initial = match storage::load_json::<OnboardingState>(
            storage.as_ref(),
            config::ONBOARDING_KEY,
        ) {
            Some(stored) => OnboardingState::reconcile(steps, stored),
            None => OnboardingState {
                phase: Phase::default(),
                steps,
            },
        };
        let (state, _) = watch::channel(initial);
        Self { state, storage }
    }

    pub fn with_default_steps(storage: SharedStorage) -> Self {
        Self::new(storage, Self::default_steps())
    }

    pub fn default_steps() -> Vec<OnboardingStep> {
        vec![
            OnboardingStep::new(
                "welcome",
                "Welcome to FinancesK!",
                "Let's set up your finances in a few simple steps",
                "/onboarding/welcome",
            ),
            OnboardingStep::new(
                "create-account",
                "Create a bank account",
                "Add your first bank account to start organising your money",
                "/accounts",
            ),
            OnboardingStep::new(
                "first-transaction",
                "Explore transactions",
                "Meet the dashboard where you manage income and expenses",
                "/home",
            ),
        ]
    }

    pub fn state(&self) -> OnboardingState {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().is_active()
    }

    pub fn current_step(&self) -> Option<OnboardingStep> {
        self.state.borrow().current_step().cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<OnboardingState> {
        self.state.subscribe()
    }

    /// True only when no onboarding progress was ever persisted.
    pub fn should_auto_start(&self) -> bool {
        match self.storage.get(config::ONBOARDING_KEY) {
            Ok(raw) => raw.is_none(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read onboarding state");
                false
            }
        }
    }

    // -- Transitions --------------------------------------------------------

    /// Begin (or restart) at the first step with every flag cleared.
    ///
    /// A definition without steps completes immediately.
    pub fn start(&self) -> Result<()> {
        self.transition(|s| {
            s.steps.iter_mut().for_each(|step| step.completed = false);
            s.phase = if s.steps.is_empty() {
                Phase::Inactive {
                    outcome: Some(Outcome::Completed),
                }
            } else {
                Phase::Active { step_index: 0 }
            };
            true
        })
    }

    /// Complete the current step and move on; past the last step the run
    /// ends as completed. No-op while inactive.
    pub fn next(&self) -> Result<()> {
        self.transition(|s| {
            let Phase::Active { step_index } = s.phase else {
                return false;
            };
            if let Some(step) = s.steps.get_mut(step_index) {
                step.completed = true;
            }
            let next = step_index + 1;
            s.phase = if next < s.steps.len() {
                Phase::Active { step_index: next }
            } else {
                Phase::Inactive {
                    outcome: Some(Outcome::Completed),
                }
            };
            true
        })
    }

    /// Flag step `id` as completed without moving. No-op while inactive or
    /// for an unknown id.
    pub fn complete_step(&self, id: &str) -> Result<()> {
        self.transition(|s| {
            if !s.is_active() {
                return false;
            }
            match s.steps.iter_mut().find(|step| step.id == id) {
                Some(step) if !step.completed => {
                    step.completed = true;
                    true
                }
                _ => false,
            }
        })
    }

    /// Abandon the run. No-op while inactive.
    pub fn skip(&self) -> Result<()> {
        self.transition(|s| {
            if !s.is_active() {
                return false;
            }
            s.phase = Phase::Inactive {
                outcome: Some(Outcome::Skipped),
            };
            true
        })
    }

    /// Mark every step completed and end the run as completed.
    pub fn finish(&self) -> Result<()> {
        self.transition(|s| {
            s.steps.iter_mut().for_each(|step| step.completed = true);
            s.phase = Phase::Inactive {
                outcome: Some(Outcome::Completed),
            };
            true
        })
    }

    /// Apply `change` and persist the result if it reported a modification.
    ///
    /// The in-memory state always advances; a storage failure is returned
    /// to the caller.
    fn transition(&self, change: impl FnOnce(&mut OnboardingState) -> bool) -> Result<()> {
        if !self.state.send_if_modified(change) {
            return Ok(());
        }
        let snapshot = self.state.borrow().clone();
        tracing::debug!(phase = ?snapshot.phase, "onboarding transition");
        storage::save_json(self.storage.as_ref(), config::ONBOARDING_KEY, &snapshot)
    }
}
