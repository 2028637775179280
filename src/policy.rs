use chrono::{DateTime, Duration, Utc};

use crate::{config::Criteria, PromptOutcome, PromptState};

/// Decides whether the rate prompt may be shown and how each answer changes [`PromptState`].
///
/// All functions are pure: they take a state and return the next one. Persisting it is the
/// caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityPolicy {
    criteria: Criteria,
}

impl EligibilityPolicy {
    /// Create a policy with the given thresholds.
    pub fn new(criteria: Criteria) -> Self {
        EligibilityPolicy { criteria }
    }

    /// Thresholds this policy evaluates against.
    pub fn criteria(&self) -> Criteria {
        self.criteria
    }

    /// Record one application launch.
    ///
    /// `first_install` is only called when the state has no install date yet.
    pub fn notify_launch(
        &self,
        state: PromptState,
        first_install: impl FnOnce() -> DateTime<Utc>,
    ) -> PromptState {
        PromptState {
            install_date: Some(state.install_date.unwrap_or_else(first_install)),
            launch_count: state.launch_count.saturating_add(1),
            ..state
        }
    }

    /// Whether the prompt should be shown at `now`.
    ///
    /// Enough launches are sufficient on their own. Otherwise `install_days` must have elapsed
    /// both since install and since the last deferral. An install date not recorded yet (before
    /// the first launch, or right after a deferral) counts as `now`.
    pub fn is_eligible(&self, state: &PromptState, now: DateTime<Utc>) -> bool {
        if state.opted_out {
            return false;
        }
        if state.launch_count >= self.criteria.launch_times {
            return true;
        }

        let installed_at = state.install_date.unwrap_or(now);
        let threshold = Duration::days(i64::from(self.criteria.install_days));
        now - installed_at >= threshold && now - state.last_deferred_at >= threshold
    }

    /// "Rate now".
    pub fn on_accept(&self, state: PromptState) -> PromptState {
        PromptState {
            opted_out: true,
            ..state
        }
    }

    /// "No, thanks".
    pub fn on_decline(&self, state: PromptState) -> PromptState {
        PromptState {
            opted_out: true,
            ..state
        }
    }

    /// "Later". Restarts both the install-age and the launch-count clocks from `now`.
    pub fn on_defer(&self, state: PromptState, now: DateTime<Utc>) -> PromptState {
        PromptState {
            install_date: None,
            launch_count: 0,
            last_deferred_at: now,
            ..state
        }
    }

    /// Apply the transition matching `outcome`.
    pub fn apply(
        &self,
        state: PromptState,
        outcome: PromptOutcome,
        now: DateTime<Utc>,
    ) -> PromptState {
        match outcome {
            PromptOutcome::Accepted => self.on_accept(state),
            PromptOutcome::Declined => self.on_decline(state),
            PromptOutcome::Deferred => self.on_defer(state, now),
        }
    }
}
