//! Decide when to ask a mobile application's user to rate the app.
//!
//! # Overview
//!
//! The crate revolves around a [`Client`] that keeps a small [`PromptState`] (install date, launch
//! count, opt-out flag, last deferral) in a [`KeyValueStore`]. The host reports each launch with
//! [`Client::notify_launch`], asks [`Client::should_show`] (or lets
//! [`Client::show_prompt_if_needed`] decide), and passes the user's [`PromptOutcome`] to
//! [`Client::handle_outcome`].
//!
//! The rules themselves live in [`EligibilityPolicy`], a set of pure functions that can be used
//! without a client:
//! - a user who rated or declined is never asked again;
//! - enough launches make the prompt eligible immediately;
//! - otherwise the configured number of days must have passed since install and since the last
//!   "later".
//!
//! Rendering is left to the host through [`PromptRenderer`], [`StoreReviewFlow`] and
//! [`LaunchTarget`].
//!
//! # Error Handling
//!
//! Collaborators report failures with the [`Error`] enum. The client never returns them: a missing
//! install time becomes "installed now", a failed in-store review falls back to the native
//! prompt, and an unhandled store URL falls back to the web listing.
//!
//! # Logging
//!
//! The package uses the [`log`](https://docs.rs/log/latest/log/) crate with the `rate_prompt`
//! target. Consider integrating a `log`-compatible logger implementation for better visibility
//! into prompt decisions.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

mod callback;
mod client;
mod config;
mod error;
mod listing;
mod platform;
mod policy;
mod prompt;
mod state;
mod store;

pub use callback::{PromptCallback, PromptOutcome};
pub use client::Client;
pub use config::{CancelMode, ClientConfig, Criteria, DialogTexts, ResourceId, Settings, ThemeId};
pub use error::{Error, Result};
pub use listing::{LaunchTarget, StoreListing};
pub use platform::{Clock, InstallTimeSource, SystemClock, UnknownInstallTime};
pub use policy::EligibilityPolicy;
pub use prompt::{
    Label, ModalSlot, Presentation, PromptRenderer, PromptRequest, StoreReviewFlow, TextRef,
};
pub use state::{keys, PromptState};
pub use store::{InMemoryStore, JsonFileStore, KeyValueStore, StoredValue, NAMESPACE};
