use serde::{Deserialize, Serialize};

/// The user's answer to the rate prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PromptOutcome {
    /// "Rate now". Opens the store listing and opts out.
    Accepted,
    /// "No, thanks". Opts out.
    Declined,
    /// "Later", or the dialog was dismissed. Restarts the eligibility clock.
    Deferred,
}

/// Receives the user's answers, before the client updates its state.
///
/// Closures taking a [`PromptOutcome`] implement this trait.
///
/// ```
/// # use rate_prompt::{PromptCallback, PromptOutcome};
/// struct Analytics;
///
/// impl PromptCallback for Analytics {
///     fn on_outcome(&self, outcome: PromptOutcome) {
///         if outcome == PromptOutcome::Accepted {
///             // record the conversion
///         }
///     }
/// }
/// ```
///
/// Implementations should not panic; the client does not catch it.
pub trait PromptCallback {
    /// Called once per answer.
    fn on_outcome(&self, outcome: PromptOutcome);
}

pub(crate) struct NoopPromptCallback;
impl PromptCallback for NoopPromptCallback {
    fn on_outcome(&self, _outcome: PromptOutcome) {}
}

impl<T: Fn(PromptOutcome)> PromptCallback for T {
    fn on_outcome(&self, outcome: PromptOutcome) {
        self(outcome);
    }
}
