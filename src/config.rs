use serde::{Deserialize, Serialize};

use crate::{
    callback::NoopPromptCallback,
    listing::{LaunchTarget, UnhandledLaunchTarget},
    platform::{Clock, InstallTimeSource, SystemClock, UnknownInstallTime},
    store::{InMemoryStore, KeyValueStore},
    Client, PromptCallback, Result,
};

/// Thresholds that make the prompt eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Criteria {
    /// Days since install (and since the last "later") before the prompt may show.
    pub install_days: u32,
    /// Launch count that makes the prompt eligible regardless of elapsed time.
    pub launch_times: u32,
}

impl Criteria {
    /// Criteria with the given day and launch thresholds.
    pub fn new(install_days: u32, launch_times: u32) -> Self {
        Criteria {
            install_days,
            launch_times,
        }
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Criteria::new(7, 10)
    }
}

/// Identifier of a host string resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub u32);

/// Identifier of a host dialog theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeId(pub u32);

/// Ways the user may dismiss the prompt without pressing a button. A dismissal counts as
/// [`PromptOutcome::Deferred`](crate::PromptOutcome::Deferred).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancelMode {
    /// Back key or a tap outside the dialog.
    #[default]
    BackKeyOrTouchOutside,
    /// Back key only.
    BackKey,
    /// The user must press one of the buttons.
    None,
}

/// Overrides for the prompt texts. Unset entries use the built-in texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialogTexts {
    /// Dialog title.
    pub title: Option<ResourceId>,
    /// Dialog body.
    pub message: Option<ResourceId>,
    /// "Rate now" button.
    pub yes_button: Option<ResourceId>,
    /// "No, thanks" button.
    pub no_button: Option<ResourceId>,
    /// "Later" button.
    pub cancel_button: Option<ResourceId>,
}

/// Serializable part of the configuration, so hosts can ship it as a JSON asset.
///
/// ```
/// # use rate_prompt::{CancelMode, Settings};
/// let settings = Settings::from_json_str(
///     r#"{"criteria": {"installDays": 3}, "cancelMode": "BACK_KEY"}"#,
/// )
/// .unwrap();
/// assert_eq!(settings.criteria.install_days, 3);
/// assert_eq!(settings.criteria.launch_times, 10);
/// assert_eq!(settings.cancel_mode, CancelMode::BackKey);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Eligibility thresholds.
    pub criteria: Criteria,
    /// Text overrides for the native prompt.
    pub texts: DialogTexts,
    /// Store listing opened on "Rate now" instead of the default market URL.
    pub url: Option<String>,
    /// How the native prompt may be dismissed.
    pub cancel_mode: CancelMode,
}

impl Settings {
    /// Parse settings from JSON. Missing fields take their defaults.
    ///
    /// Returns [`Error::MalformedStore`](crate::Error::MalformedStore) if `json` is not valid.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Configuration for [`Client`].
///
/// # Examples
/// ```
/// # use rate_prompt::{ClientConfig, PromptOutcome};
/// let client = ClientConfig::new("com.example.app")
///     .criteria(3, 5)
///     .callback(|outcome: PromptOutcome| {
///         println!("user answered {:?}", outcome);
///     })
///     .to_client();
/// ```
pub struct ClientConfig<'a> {
    pub(crate) package_id: String,
    pub(crate) settings: Settings,
    pub(crate) store: Box<dyn KeyValueStore + 'a>,
    pub(crate) clock: Box<dyn Clock + 'a>,
    pub(crate) install_time: Box<dyn InstallTimeSource + 'a>,
    pub(crate) launch_target: Box<dyn LaunchTarget + 'a>,
    pub(crate) callback: Box<dyn PromptCallback + 'a>,
}

impl<'a> ClientConfig<'a> {
    /// Create a default configuration for the application with the given package identifier.
    ///
    /// Defaults to an in-memory store, the system clock, and no install-time metadata.
    pub fn new(package_id: impl Into<String>) -> Self {
        Self::from_settings(package_id, Settings::default())
    }

    /// Create a configuration from deserialized [`Settings`], with the same collaborator defaults
    /// as [`ClientConfig::new`].
    pub fn from_settings(package_id: impl Into<String>, settings: Settings) -> Self {
        ClientConfig {
            package_id: package_id.into(),
            settings,
            store: Box::new(InMemoryStore::new()),
            clock: Box::new(SystemClock),
            install_time: Box::new(UnknownInstallTime),
            launch_target: Box::new(UnhandledLaunchTarget),
            callback: Box::new(NoopPromptCallback),
        }
    }

    /// Set both eligibility thresholds.
    pub fn criteria(mut self, install_days: u32, launch_times: u32) -> Self {
        self.settings.criteria = Criteria::new(install_days, launch_times);
        self
    }

    /// Set the title string resource.
    pub fn title(mut self, id: ResourceId) -> Self {
        self.settings.texts.title = Some(id);
        self
    }

    /// Set the message string resource.
    pub fn message(mut self, id: ResourceId) -> Self {
        self.settings.texts.message = Some(id);
        self
    }

    /// Set the "Rate now" string resource.
    pub fn yes_button_text(mut self, id: ResourceId) -> Self {
        self.settings.texts.yes_button = Some(id);
        self
    }

    /// Set the "No, thanks" string resource.
    pub fn no_button_text(mut self, id: ResourceId) -> Self {
        self.settings.texts.no_button = Some(id);
        self
    }

    /// Set the "Later" string resource.
    pub fn cancel_button_text(mut self, id: ResourceId) -> Self {
        self.settings.texts.cancel_button = Some(id);
        self
    }

    /// Open `url` on "Rate now" instead of the default market listing. An empty string keeps the
    /// default.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.settings.url = Some(url.into());
        self
    }

    /// Set which ways the user can dismiss the native prompt.
    pub fn cancel_mode(mut self, cancel_mode: CancelMode) -> Self {
        self.settings.cancel_mode = cancel_mode;
        self
    }

    /// Set the storage the prompt state is persisted to.
    pub fn store(mut self, store: impl KeyValueStore + 'a) -> Self {
        self.store = Box::new(store);
        self
    }

    /// Set the source of the current time. Closures returning `DateTime<Utc>` work.
    pub fn clock(mut self, clock: impl Clock + 'a) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Set where the true first-install time comes from.
    pub fn install_time_source(mut self, source: impl InstallTimeSource + 'a) -> Self {
        self.install_time = Box::new(source);
        self
    }

    /// Set what opens the store listing after "Rate now".
    pub fn launch_target(mut self, target: impl LaunchTarget + 'a) -> Self {
        self.launch_target = Box::new(target);
        self
    }

    /// Set the callback that receives the user's answers.
    pub fn callback(mut self, callback: impl PromptCallback + 'a) -> Self {
        self.callback = Box::new(callback);
        self
    }

    /// Create a new [`Client`] using the specified configuration.
    pub fn to_client(self) -> Client<'a> {
        Client::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{CancelMode, ClientConfig, Criteria, ResourceId, Settings};
    use crate::Error;

    #[test]
    fn defaults_match_documented_thresholds() {
        let settings = Settings::default();
        assert_eq!(settings.criteria, Criteria::new(7, 10));
        assert_eq!(settings.cancel_mode, CancelMode::BackKeyOrTouchOutside);
        assert_eq!(settings.url, None);
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(Settings::from_json_str("{}").unwrap(), Settings::default());
    }

    #[test]
    fn parses_full_settings() {
        let settings = Settings::from_json_str(
            r#"{
                "criteria": {"installDays": 1, "launchTimes": 3},
                "texts": {"title": 100, "noButton": 101},
                "url": "https://example.com/app",
                "cancelMode": "NONE"
            }"#,
        )
        .unwrap();

        assert_eq!(settings.criteria, Criteria::new(1, 3));
        assert_eq!(settings.texts.title, Some(ResourceId(100)));
        assert_eq!(settings.texts.no_button, Some(ResourceId(101)));
        assert_eq!(settings.texts.message, None);
        assert_eq!(settings.url.as_deref(), Some("https://example.com/app"));
        assert_eq!(settings.cancel_mode, CancelMode::None);
    }

    #[test]
    fn invalid_json_is_malformed() {
        assert!(matches!(
            Settings::from_json_str(r#"{"criteria": {"installDays": "seven"}}"#),
            Err(Error::MalformedStore(_))
        ));
    }

    #[test]
    fn builder_overrides_settings() {
        let config = ClientConfig::new("com.example.app")
            .criteria(2, 4)
            .title(ResourceId(7))
            .cancel_mode(CancelMode::BackKey)
            .url("market://details?id=other");

        assert_eq!(config.package_id, "com.example.app");
        assert_eq!(config.settings.criteria, Criteria::new(2, 4));
        assert_eq!(config.settings.texts.title, Some(ResourceId(7)));
        assert_eq!(config.settings.cancel_mode, CancelMode::BackKey);
        assert_eq!(
            config.settings.url.as_deref(),
            Some("market://details?id=other")
        );
    }
}
