//! Per-call run configuration.
//!
//! Every field is optional. [`RunConfig::resolve`] folds the call's values over
//! the runner's [`RunnerSettings`] once, at the top of a run, so the rest of the
//! runner only ever sees concrete values.

use std::fmt;

use crate::channel::{
    ChannelKind, ModalAction, ModalKind, ModalOptions, ToastOptions, ToastPosition,
};
use crate::failure::Failure;
use crate::settings::RunnerSettings;

pub type SuccessCallback<'a, T> = Box<dyn FnOnce(Option<&T>) + 'a>;
pub type FailureCallback<'a> = Box<dyn FnOnce(&Failure) + 'a>;
pub type PresentCallback<'a> = Box<dyn FnOnce(&str) + 'a>;

/// Options for a single run. Not retained after the run returns.
pub struct RunConfig<'a, T> {
    /// Label attached to log events for this run.
    pub label: Option<String>,

    /// Message shown on success. Success presentation only happens when set.
    pub success_message: Option<String>,

    /// Fallback failure text used when the failure carries no message.
    pub error_message: Option<String>,

    pub dismiss_focus: Option<bool>,

    pub success_channel: Option<ChannelKind>,

    pub failure_channel: Option<ChannelKind>,

    pub modal_title: Option<String>,

    pub modal_kind: Option<ModalKind>,

    pub modal_actions: Option<Vec<ModalAction>>,

    /// Applies to whichever toast this run shows.
    pub toast_position: Option<ToastPosition>,

    /// Applies to whichever toast this run shows.
    pub toast_duration_ms: Option<u64>,

    on_success: Option<SuccessCallback<'a, T>>,
    on_failure: Option<FailureCallback<'a>>,
    on_present_success: Option<PresentCallback<'a>>,
    on_present_failure: Option<PresentCallback<'a>>,
}

impl<'a, T> Default for RunConfig<'a, T> {
    fn default() -> Self {
        Self {
            label: None,
            success_message: None,
            error_message: None,
            dismiss_focus: None,
            success_channel: None,
            failure_channel: None,
            modal_title: None,
            modal_kind: None,
            modal_actions: None,
            toast_position: None,
            toast_duration_ms: None,
            on_success: None,
            on_failure: None,
            on_present_success: None,
            on_present_failure: None,
        }
    }
}

impl<'a, T> fmt::Debug for RunConfig<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("label", &self.label)
            .field("success_message", &self.success_message)
            .field("error_message", &self.error_message)
            .field("dismiss_focus", &self.dismiss_focus)
            .field("success_channel", &self.success_channel)
            .field("failure_channel", &self.failure_channel)
            .field("modal_title", &self.modal_title)
            .field("modal_kind", &self.modal_kind)
            .field("modal_actions", &self.modal_actions)
            .field("toast_position", &self.toast_position)
            .field("toast_duration_ms", &self.toast_duration_ms)
            .field("on_success", &self.on_success.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .field("on_present_success", &self.on_present_success.is_some())
            .field("on_present_failure", &self.on_present_failure.is_some())
            .finish()
    }
}

impl<'a, T> RunConfig<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn dismiss_focus(mut self, dismiss: bool) -> Self {
        self.dismiss_focus = Some(dismiss);
        self
    }

    pub fn on_success_channel(mut self, channel: ChannelKind) -> Self {
        self.success_channel = Some(channel);
        self
    }

    pub fn on_failure_channel(mut self, channel: ChannelKind) -> Self {
        self.failure_channel = Some(channel);
        self
    }

    pub fn modal_title(mut self, title: impl Into<String>) -> Self {
        self.modal_title = Some(title.into());
        self
    }

    pub fn modal_kind(mut self, kind: ModalKind) -> Self {
        self.modal_kind = Some(kind);
        self
    }

    pub fn modal_actions(mut self, actions: Vec<ModalAction>) -> Self {
        self.modal_actions = Some(actions);
        self
    }

    pub fn toast_position(mut self, position: ToastPosition) -> Self {
        self.toast_position = Some(position);
        self
    }

    pub fn toast_duration_ms(mut self, duration_ms: u64) -> Self {
        self.toast_duration_ms = Some(duration_ms);
        self
    }

    /// Called with the value after a successful run, once.
    pub fn on_success(mut self, f: impl FnOnce(Option<&T>) + 'a) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    /// Called with the failure after a failed run, once.
    pub fn on_failure(mut self, f: impl FnOnce(&Failure) + 'a) -> Self {
        self.on_failure = Some(Box::new(f));
        self
    }

    /// Presentation hook for the custom success channel.
    pub fn on_present_success(mut self, f: impl FnOnce(&str) + 'a) -> Self {
        self.on_present_success = Some(Box::new(f));
        self
    }

    /// Presentation hook for the inline and custom failure channels.
    pub fn on_present_failure(mut self, f: impl FnOnce(&str) + 'a) -> Self {
        self.on_present_failure = Some(Box::new(f));
        self
    }

    /// Fold this call's options over `settings`.
    pub fn resolve(self, settings: &RunnerSettings) -> ResolvedConfig<'a, T> {
        let toast_override = |base: ToastOptions| ToastOptions {
            position: self.toast_position.unwrap_or(base.position),
            duration_ms: self.toast_duration_ms.unwrap_or(base.duration_ms),
        };
        let toast_success = toast_override(settings.toast_success);
        let toast_failure = toast_override(settings.toast_failure);

        let modal = ModalOptions {
            title: self.modal_title.unwrap_or_else(|| settings.modal.title.clone()),
            kind: self.modal_kind.unwrap_or(settings.modal.kind),
            actions: self
                .modal_actions
                .filter(|actions| !actions.is_empty())
                .unwrap_or_else(|| settings.modal.actions.clone()),
        };

        ResolvedConfig {
            label: self.label,
            success_message: self.success_message,
            error_message: self
                .error_message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| settings.default_error_message.clone()),
            dismiss_focus: self.dismiss_focus.unwrap_or(settings.dismiss_focus),
            success_channel: self.success_channel.unwrap_or(settings.success_channel),
            failure_channel: self.failure_channel.unwrap_or(settings.failure_channel),
            presentation: PresentationOptions {
                toast_success,
                toast_failure,
                modal,
                alert_title: settings.alert.failure_title.clone(),
            },
            hooks: PresentHooks {
                on_present_success: self.on_present_success,
                on_present_failure: self.on_present_failure,
            },
            on_success: self.on_success,
            on_failure: self.on_failure,
        }
    }
}

/// Concrete per-channel options for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationOptions {
    pub toast_success: ToastOptions,
    pub toast_failure: ToastOptions,
    pub modal: ModalOptions,
    pub alert_title: String,
}

impl Default for PresentationOptions {
    fn default() -> Self {
        RunConfig::<()>::new().resolve(&RunnerSettings::default()).presentation
    }
}

/// Caller-supplied presentation callbacks, each consumed at most once.
#[derive(Default)]
pub struct PresentHooks<'a> {
    pub on_present_success: Option<PresentCallback<'a>>,
    pub on_present_failure: Option<PresentCallback<'a>>,
}

/// A [`RunConfig`] with every default applied.
pub struct ResolvedConfig<'a, T> {
    pub label: Option<String>,
    pub success_message: Option<String>,
    /// The caller's fallback text, or the runner-wide default.
    pub error_message: String,
    pub dismiss_focus: bool,
    pub success_channel: ChannelKind,
    pub failure_channel: ChannelKind,
    pub presentation: PresentationOptions,
    pub hooks: PresentHooks<'a>,
    pub on_success: Option<SuccessCallback<'a, T>>,
    pub on_failure: Option<FailureCallback<'a>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let resolved = RunConfig::<u32>::new().resolve(&RunnerSettings::default());
        assert_eq!(resolved.error_message, "Something went wrong");
        assert!(resolved.success_message.is_none());
        assert!(resolved.dismiss_focus);
        assert_eq!(resolved.success_channel, ChannelKind::ToastNotification);
        assert_eq!(resolved.failure_channel, ChannelKind::ModalDialog);
        assert_eq!(resolved.presentation.toast_success, ToastOptions::SUCCESS);
        assert_eq!(resolved.presentation.toast_failure, ToastOptions::FAILURE);
        assert_eq!(resolved.presentation.modal, ModalOptions::default());
        assert_eq!(resolved.presentation.alert_title, "Error");
    }

    #[test]
    fn test_resolve_call_overrides() {
        let resolved = RunConfig::<u32>::new()
            .error_message("Could not save recipe")
            .dismiss_focus(false)
            .on_failure_channel(ChannelKind::ToastNotification)
            .toast_position(ToastPosition::Bottom)
            .modal_title("Heads up")
            .modal_kind(ModalKind::Warning)
            .resolve(&RunnerSettings::default());

        assert_eq!(resolved.error_message, "Could not save recipe");
        assert!(!resolved.dismiss_focus);
        assert_eq!(resolved.failure_channel, ChannelKind::ToastNotification);
        assert_eq!(resolved.presentation.toast_failure.position, ToastPosition::Bottom);
        assert_eq!(resolved.presentation.toast_failure.duration_ms, 3000);
        assert_eq!(resolved.presentation.toast_success.duration_ms, 2000);
        assert_eq!(resolved.presentation.modal.title, "Heads up");
        assert_eq!(resolved.presentation.modal.kind, ModalKind::Warning);
        assert_eq!(resolved.presentation.modal.actions, vec![ModalAction::ok()]);
    }

    #[test]
    fn test_blank_error_message_falls_back_to_settings() {
        let resolved = RunConfig::<u32>::new()
            .error_message("")
            .resolve(&RunnerSettings::default());
        assert_eq!(resolved.error_message, "Something went wrong");
    }

    #[test]
    fn test_empty_modal_actions_use_default() {
        let resolved = RunConfig::<u32>::new()
            .modal_actions(Vec::new())
            .resolve(&RunnerSettings::default());
        assert_eq!(resolved.presentation.modal.actions, vec![ModalAction::ok()]);
    }

    #[test]
    fn test_callbacks_carried_through() {
        let resolved = RunConfig::<u32>::new()
            .on_success(|_| {})
            .on_present_failure(|_| {})
            .resolve(&RunnerSettings::default());
        assert!(resolved.on_success.is_some());
        assert!(resolved.on_failure.is_none());
        assert!(resolved.hooks.on_present_failure.is_some());
        assert!(resolved.hooks.on_present_success.is_none());
    }

    #[test]
    fn test_debug_hides_closures() {
        let config = RunConfig::<u32>::new().on_failure(|_| {});
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("on_failure: true"));
    }
}
