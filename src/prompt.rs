//! Interfaces to the host UI: the native confirmation dialog and the in-store review flow.
//!
//! The crate never holds on to UI resources. A [`PromptRenderer`] owns the dialog it shows and is
//! the only authority on whether one is visible; the host reports the user's answer back through
//! [`Client::handle_outcome`](crate::Client::handle_outcome).
use serde::{Deserialize, Serialize};

use crate::{
    config::{CancelMode, DialogTexts, ResourceId, ThemeId},
    Result,
};

/// Text slots of the rate prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Label {
    /// Dialog title.
    Title,
    /// Dialog body.
    Message,
    /// "Rate now".
    Yes,
    /// "No, thanks".
    No,
    /// "Later".
    Cancel,
}

impl Label {
    /// Built-in English text for this slot.
    pub fn default_text(self) -> &'static str {
        match self {
            Label::Title => "Rate this app",
            Label::Message => {
                "If you enjoy using this app, would you mind taking a moment to rate it? \
                 It won't take more than a minute. Thanks for your support!"
            }
            Label::Yes => "Rate now",
            Label::No => "No, thanks",
            Label::Cancel => "Later",
        }
    }
}

/// Text shown in one slot: either the built-in text or a host resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextRef {
    /// Built-in text, see [`Label::default_text`].
    Builtin(Label),
    /// Host string resource.
    Resource(ResourceId),
}

impl TextRef {
    fn resolve(custom: Option<ResourceId>, label: Label) -> TextRef {
        custom.map_or(TextRef::Builtin(label), TextRef::Resource)
    }
}

/// Everything a renderer needs to build the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    /// Dialog title.
    pub title: TextRef,
    /// Dialog body.
    pub message: TextRef,
    /// "Rate now" button, reported as [`PromptOutcome::Accepted`](crate::PromptOutcome::Accepted).
    pub yes_button: TextRef,
    /// "No, thanks" button, reported as [`PromptOutcome::Declined`](crate::PromptOutcome::Declined).
    pub no_button: TextRef,
    /// "Later" button, reported as [`PromptOutcome::Deferred`](crate::PromptOutcome::Deferred).
    pub cancel_button: TextRef,
    /// Ways the dialog may be dismissed without a button.
    pub cancel_mode: CancelMode,
    /// Host theme to build the dialog with, or the default theme.
    pub theme: Option<ThemeId>,
}

impl PromptRequest {
    pub(crate) fn new(texts: &DialogTexts, cancel_mode: CancelMode, theme: Option<ThemeId>) -> Self {
        PromptRequest {
            title: TextRef::resolve(texts.title, Label::Title),
            message: TextRef::resolve(texts.message, Label::Message),
            yes_button: TextRef::resolve(texts.yes_button, Label::Yes),
            no_button: TextRef::resolve(texts.no_button, Label::No),
            cancel_button: TextRef::resolve(texts.cancel_button, Label::Cancel),
            cancel_mode,
            theme,
        }
    }
}

/// Result of asking a renderer to show the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// A new dialog is on screen.
    Shown,
    /// A prompt was already on screen, the request was ignored.
    AlreadyVisible,
}

/// Shows the native rate dialog.
///
/// At most one dialog may be alive at a time. A request made while one is showing must return
/// [`Presentation::AlreadyVisible`] without showing another; [`ModalSlot`] tracks this.
///
/// When the user presses a button (or dismisses the dialog as allowed by
/// [`PromptRequest::cancel_mode`]), the host passes the matching
/// [`PromptOutcome`](crate::PromptOutcome) to [`Client::handle_outcome`](crate::Client::handle_outcome)
/// exactly once.
pub trait PromptRenderer {
    /// Show the dialog described by `request`.
    fn present(&mut self, request: &PromptRequest) -> Result<Presentation>;
}

/// Single-dialog bookkeeping for [`PromptRenderer`] implementations.
#[derive(Debug, Default)]
pub struct ModalSlot {
    visible: bool,
}

impl ModalSlot {
    /// An empty slot.
    pub fn new() -> Self {
        ModalSlot::default()
    }

    /// Claim the slot. Returns `false` if a dialog is already visible.
    pub fn open(&mut self) -> bool {
        !std::mem::replace(&mut self.visible, true)
    }

    /// Release the slot once the dialog is dismissed.
    pub fn close(&mut self) {
        self.visible = false;
    }

    /// Whether a dialog currently holds the slot.
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// In-store review SDK.
///
/// Any error (including [`Error::ReviewUnavailable`](crate::Error::ReviewUnavailable)) makes the
/// client fall back to the native prompt.
pub trait StoreReviewFlow {
    /// Request review info and launch the review flow.
    fn launch_review(&mut self) -> Result<()>;
}
