use crate::{
    config::{Settings, ThemeId},
    listing::{LaunchTarget, StoreListing},
    platform::{resolve_install_time, Clock, InstallTimeSource},
    policy::EligibilityPolicy,
    prompt::{Presentation, PromptRenderer, PromptRequest, StoreReviewFlow},
    store::KeyValueStore,
    ClientConfig, PromptCallback, PromptOutcome, PromptState,
};

/// Decides when to ask the user to rate the app, and records their answer.
///
/// In order to create a client instance, first create [`ClientConfig`].
///
/// # Lifecycle
///
/// Call [`Client::notify_launch()`] once per application launch, then
/// [`Client::show_prompt_if_needed()`] (or [`Client::should_show()`] to render a custom view).
/// When the user answers, pass the answer to [`Client::handle_outcome()`].
///
/// The client never fails: storage, review SDK and URL errors are logged and replaced by their
/// fallback.
///
/// # Examples
/// ```
/// # use rate_prompt::{ClientConfig, PromptOutcome};
/// let mut client = ClientConfig::new("com.example.app").criteria(0, 1).to_client();
/// client.notify_launch();
/// assert!(client.should_show());
///
/// client.handle_outcome(PromptOutcome::Declined);
/// assert!(!client.should_show());
/// ```
pub struct Client<'a> {
    package_id: String,
    settings: Settings,
    policy: EligibilityPolicy,
    state: PromptState,
    store: Box<dyn KeyValueStore + 'a>,
    clock: Box<dyn Clock + 'a>,
    install_time: Box<dyn InstallTimeSource + 'a>,
    launch_target: Box<dyn LaunchTarget + 'a>,
    callback: Box<dyn PromptCallback + 'a>,
}

impl<'a> Client<'a> {
    /// Create a new `Client` using the specified configuration, loading the persisted state.
    pub fn new(config: ClientConfig<'a>) -> Self {
        let state = PromptState::load(&*config.store);
        Client {
            package_id: config.package_id,
            policy: EligibilityPolicy::new(config.settings.criteria),
            settings: config.settings,
            state,
            store: config.store,
            clock: config.clock,
            install_time: config.install_time,
            launch_target: config.launch_target,
            callback: config.callback,
        }
    }

    /// Replace the callback that receives the user's answers.
    pub fn set_callback(&mut self, callback: impl PromptCallback + 'a) {
        self.callback = Box::new(callback);
    }

    /// Record an application launch. Call it from the launcher screen's creation hook.
    ///
    /// The first launch (and the first one after a deferral) also records the install date.
    pub fn notify_launch(&mut self) {
        let now = self.clock.now();
        let stored = PromptState::load(&*self.store);
        let install_time = &*self.install_time;
        let state = self
            .policy
            .notify_launch(stored, || resolve_install_time(install_time, now));

        log::debug!(target: "rate_prompt",
                    launch_count = state.launch_count;
                    "recorded application launch");
        self.persist(state);

        log::debug!(target: "rate_prompt",
                    package_id:display = self.package_id,
                    state:serde = self.state;
                    "rate prompt status");
    }

    /// Whether the prompt should be shown now.
    ///
    /// Use this to show your own view instead of the dialog rendered through [`PromptRenderer`].
    pub fn should_show(&self) -> bool {
        self.policy.is_eligible(&self.state, self.clock.now())
    }

    /// Ask for a review if the criteria are met. Tries the in-store review flow first and falls
    /// back to the native prompt.
    ///
    /// Returns `true` if a prompt was requested.
    pub fn show_prompt_if_needed(
        &self,
        review: &mut dyn StoreReviewFlow,
        renderer: &mut dyn PromptRenderer,
        theme: Option<ThemeId>,
    ) -> bool {
        if !self.should_show() {
            return false;
        }
        self.show_store_review_prompt(review, renderer, theme);
        true
    }

    /// Launch the in-store review flow regardless of the criteria. On failure, show the native
    /// prompt instead.
    pub fn show_store_review_prompt(
        &self,
        review: &mut dyn StoreReviewFlow,
        renderer: &mut dyn PromptRenderer,
        theme: Option<ThemeId>,
    ) {
        match review.launch_review() {
            Ok(()) => {
                log::debug!(target: "rate_prompt", "launched in-store review flow");
            }
            Err(err) => {
                log::warn!(target: "rate_prompt",
                           "in-store review failed, showing native prompt: {:?}", err);
                self.show_prompt(renderer, theme);
            }
        }
    }

    /// Show the native prompt regardless of the criteria.
    ///
    /// Returns `true` if a new dialog was shown. Nothing happens while a prompt is already visible.
    pub fn show_prompt(&self, renderer: &mut dyn PromptRenderer, theme: Option<ThemeId>) -> bool {
        let request = PromptRequest::new(&self.settings.texts, self.settings.cancel_mode, theme);
        match renderer.present(&request) {
            Ok(Presentation::Shown) => {
                log::debug!(target: "rate_prompt", request:serde; "showing rate prompt");
                true
            }
            Ok(Presentation::AlreadyVisible) => {
                log::debug!(target: "rate_prompt", "rate prompt is already visible");
                false
            }
            Err(err) => {
                log::warn!(target: "rate_prompt", "failed to show rate prompt: {:?}", err);
                false
            }
        }
    }

    /// Record the user's answer to the prompt.
    ///
    /// The callback sees the answer first. Accepting then opens the store listing; accepting and
    /// declining opt out for good, deferring restarts the eligibility clock.
    pub fn handle_outcome(&mut self, outcome: PromptOutcome) {
        log::debug!(target: "rate_prompt", outcome:serde; "user answered rate prompt");
        self.callback.on_outcome(outcome);

        if outcome == PromptOutcome::Accepted {
            StoreListing::new(self.package_id.clone(), self.settings.url.clone())
                .open(&mut *self.launch_target);
        }

        let state = self.policy.apply(self.state, outcome, self.clock.now());
        self.persist(state);
    }

    /// Never show the prompt again (unless the application data is cleared).
    pub fn force_opt_out(&mut self) {
        let state = PromptState {
            opted_out: true,
            ..self.state
        };
        self.persist(state);
    }

    /// Number of launches recorded since install or the last deferral.
    pub fn launch_count(&self) -> u32 {
        self.state.launch_count
    }

    /// Current prompt state, as last loaded or written.
    pub fn state(&self) -> &PromptState {
        &self.state
    }

    /// Keep `state` in memory and write it to the store. A failed write is logged; the in-memory
    /// state still applies for this process.
    fn persist(&mut self, state: PromptState) {
        self.state = state;
        if let Err(err) = state.save(&mut *self.store) {
            log::warn!(target: "rate_prompt", "failed to persist rate prompt state: {:?}", err);
        }
    }
}
