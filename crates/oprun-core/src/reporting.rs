//! Reporting context: the host-supplied presentation surface a runner reports through.
//!
//! A host builds one [`ReportingContext`] at startup, registering whichever
//! toast and modal handlers it supports, and shares it (via `Arc`) with every
//! runner. Channels whose handler is missing degrade to the blocking alert
//! with a logged warning; presentation trouble never changes a run's outcome.
//!
//! Dispatch table:
//!
//! | channel | success | failure |
//! |---|---|---|
//! | `BlockingAlert` | alert, no title | alert titled "Error" |
//! | `ModalDialog` | nothing | modal handler, else alert |
//! | `ToastNotification` | toast-success handler, else alert | toast-failure handler, else alert |
//! | `InlineCallback` | nothing | `on_present_failure` only |
//! | `CustomCallback` | `on_present_success` if given | `on_present_failure`, else alert |
//! | `Silent` | nothing | nothing |

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::channel::{ChannelKind, ModalOptions, ToastOptions};
use crate::config::{PresentHooks, PresentationOptions};
use crate::metrics::RunMetrics;
use crate::obs::emit_channel_fallback;

/// Native blocking alert provided by the host.
pub trait AlertPresenter: Send + Sync {
    fn alert(&self, title: Option<&str>, message: &str);
}

/// Best-effort input focus / keyboard dismissal. Hosts without a focus concept
/// use [`NoFocus`].
pub trait FocusDismisser: Send + Sync {
    fn dismiss(&self);
}

/// Toast handler: `(message, options)`.
pub type ToastHandler = Arc<dyn Fn(&str, &ToastOptions) + Send + Sync>;

/// Modal handler: `(message, options)`; options carry title, kind, and actions.
pub type ModalHandler = Arc<dyn Fn(&str, &ModalOptions) + Send + Sync>;

/// Alert that only logs. Used when the host supplies no alert presenter.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAlert;

impl AlertPresenter for TracingAlert {
    fn alert(&self, title: Option<&str>, message: &str) {
        info!(event = "alert", title = title.unwrap_or(""), message = message);
    }
}

/// Focus dismisser for hosts without input focus.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFocus;

impl FocusDismisser for NoFocus {
    fn dismiss(&self) {}
}

/// Optional toast and modal handlers.
#[derive(Clone, Default)]
pub struct ChannelHandlers {
    pub toast_success: Option<ToastHandler>,
    pub toast_failure: Option<ToastHandler>,
    pub modal_failure: Option<ModalHandler>,
}

impl fmt::Debug for ChannelHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelHandlers")
            .field("toast_success", &self.toast_success.is_some())
            .field("toast_failure", &self.toast_failure.is_some())
            .field("modal_failure", &self.modal_failure.is_some())
            .finish()
    }
}

/// What a dispatch actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// The requested channel presented the message.
    Shown(ChannelKind),

    /// The requested channel could not present; a blocking alert was shown instead.
    FellBack { requested: ChannelKind },

    /// Nothing was presented.
    Skipped,
}

/// Presentation surface shared by runners.
pub struct ReportingContext {
    handlers: ChannelHandlers,
    alert: Arc<dyn AlertPresenter>,
    focus: Arc<dyn FocusDismisser>,
    metrics: RunMetrics,
}

impl fmt::Debug for ReportingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportingContext")
            .field("handlers", &self.handlers)
            .field("metrics", &self.metrics.snapshot())
            .finish_non_exhaustive()
    }
}

impl Default for ReportingContext {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ReportingContext {
    /// Context with no handlers, a logging alert and no focus handling.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ReportingContextBuilder {
        ReportingContextBuilder::default()
    }

    pub fn handlers(&self) -> &ChannelHandlers {
        &self.handlers
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    pub(crate) fn dismiss_focus(&self) {
        self.focus.dismiss();
    }

    /// Present a success message on `channel`.
    pub fn present_success(
        &self,
        message: &str,
        channel: ChannelKind,
        options: &PresentationOptions,
        hooks: &mut PresentHooks<'_>,
    ) -> Presentation {
        let presentation = match channel {
            ChannelKind::BlockingAlert => {
                self.alert.alert(None, message);
                Presentation::Shown(channel)
            }
            ChannelKind::ToastNotification => match &self.handlers.toast_success {
                Some(toast) => {
                    toast(message, &options.toast_success);
                    Presentation::Shown(channel)
                }
                None => {
                    self.fall_back(channel, None, message, "no toast-success handler registered")
                }
            },
            ChannelKind::CustomCallback => match hooks.on_present_success.take() {
                Some(present) => {
                    present(message);
                    Presentation::Shown(channel)
                }
                None => Presentation::Skipped,
            },
            ChannelKind::ModalDialog | ChannelKind::InlineCallback | ChannelKind::Silent => {
                debug!(channel = %channel, "Channel does not present success messages");
                Presentation::Skipped
            }
        };
        self.count(presentation);
        presentation
    }

    /// Present a failure message on `channel`.
    pub fn present_failure(
        &self,
        message: &str,
        channel: ChannelKind,
        options: &PresentationOptions,
        hooks: &mut PresentHooks<'_>,
    ) -> Presentation {
        let title = Some(options.alert_title.as_str());
        let presentation = match channel {
            ChannelKind::BlockingAlert => {
                self.alert.alert(title, message);
                Presentation::Shown(channel)
            }
            ChannelKind::ModalDialog => match &self.handlers.modal_failure {
                Some(modal) => {
                    modal(message, &options.modal);
                    Presentation::Shown(channel)
                }
                None => self.fall_back(channel, title, message, "no modal handler registered"),
            },
            ChannelKind::ToastNotification => match &self.handlers.toast_failure {
                Some(toast) => {
                    toast(message, &options.toast_failure);
                    Presentation::Shown(channel)
                }
                None => {
                    self.fall_back(channel, title, message, "no toast-failure handler registered")
                }
            },
            ChannelKind::InlineCallback => match hooks.on_present_failure.take() {
                Some(present) => {
                    present(message);
                    Presentation::Shown(channel)
                }
                None => {
                    debug!("Inline channel requested without on_present_failure");
                    Presentation::Skipped
                }
            },
            ChannelKind::CustomCallback => match hooks.on_present_failure.take() {
                Some(present) => {
                    present(message);
                    Presentation::Shown(channel)
                }
                None => self.fall_back(channel, title, message, "no on_present_failure callback"),
            },
            ChannelKind::Silent => Presentation::Skipped,
        };
        self.count(presentation);
        presentation
    }

    fn fall_back(
        &self,
        requested: ChannelKind,
        title: Option<&str>,
        message: &str,
        reason: &str,
    ) -> Presentation {
        emit_channel_fallback(requested, reason);
        self.metrics.inc_fallbacks();
        self.alert.alert(title, message);
        Presentation::FellBack { requested }
    }

    fn count(&self, presentation: Presentation) {
        if presentation != Presentation::Skipped {
            self.metrics.inc_presentations();
        }
    }
}

/// Builder for [`ReportingContext`]. Registering a handler twice keeps the last one.
#[derive(Default)]
pub struct ReportingContextBuilder {
    handlers: ChannelHandlers,
    alert: Option<Arc<dyn AlertPresenter>>,
    focus: Option<Arc<dyn FocusDismisser>>,
}

impl ReportingContextBuilder {
    pub fn alert(mut self, alert: Arc<dyn AlertPresenter>) -> Self {
        self.alert = Some(alert);
        self
    }

    pub fn focus(mut self, focus: Arc<dyn FocusDismisser>) -> Self {
        self.focus = Some(focus);
        self
    }

    pub fn toast_success<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str, &ToastOptions) + Send + Sync + 'static,
    {
        self.handlers.toast_success = Some(Arc::new(handler));
        self
    }

    pub fn toast_failure<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str, &ToastOptions) + Send + Sync + 'static,
    {
        self.handlers.toast_failure = Some(Arc::new(handler));
        self
    }

    pub fn modal_failure<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str, &ModalOptions) + Send + Sync + 'static,
    {
        self.handlers.modal_failure = Some(Arc::new(handler));
        self
    }

    /// Replace all three channel handlers at once.
    pub fn handlers(mut self, handlers: ChannelHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn build(self) -> ReportingContext {
        ReportingContext {
            handlers: self.handlers,
            alert: self.alert.unwrap_or_else(|| Arc::new(TracingAlert)),
            focus: self.focus.unwrap_or_else(|| Arc::new(NoFocus)),
            metrics: RunMetrics::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ModalAction;
    use crate::fakes::{PresentationLog, Presented};
    use std::sync::Mutex;
    use tracing_test::traced_test;

    fn options() -> PresentationOptions {
        PresentationOptions::default()
    }

    #[test]
    fn test_failure_alert_is_titled() {
        let log = PresentationLog::new();
        let ctx = log.context();
        let result = ctx.present_failure(
            "boom",
            ChannelKind::BlockingAlert,
            &options(),
            &mut PresentHooks::default(),
        );

        assert_eq!(result, Presentation::Shown(ChannelKind::BlockingAlert));
        assert_eq!(log.entries(), vec![Presented::alert(Some("Error"), "boom")]);
    }

    #[test]
    fn test_success_alert_is_untitled() {
        let log = PresentationLog::new();
        let ctx = log.context();
        ctx.present_success(
            "saved",
            ChannelKind::BlockingAlert,
            &options(),
            &mut PresentHooks::default(),
        );
        assert_eq!(log.entries(), vec![Presented::alert(None, "saved")]);
    }

    #[test]
    fn test_modal_uses_registered_handler() {
        let log = PresentationLog::new();
        let ctx = log.context();
        ctx.present_failure(
            "bad",
            ChannelKind::ModalDialog,
            &options(),
            &mut PresentHooks::default(),
        );
        assert_eq!(
            log.entries(),
            vec![Presented::ModalFailure {
                message: "bad".to_string(),
                options: ModalOptions {
                    title: "Error".to_string(),
                    kind: Default::default(),
                    actions: vec![ModalAction::ok()],
                },
            }]
        );
    }

    #[test]
    fn test_missing_handlers_fall_back_to_alert() {
        let log = PresentationLog::new();
        let ctx = log.context_without_handlers();
        let mut hooks = PresentHooks::default();

        let toast = ChannelKind::ToastNotification;
        let modal = ctx.present_failure("m", ChannelKind::ModalDialog, &options(), &mut hooks);
        let toast_fail = ctx.present_failure("t", toast, &options(), &mut hooks);
        let toast_ok = ctx.present_success("s", toast, &options(), &mut hooks);
        let custom = ctx.present_failure("c", ChannelKind::CustomCallback, &options(), &mut hooks);

        let fell_back = |requested| Presentation::FellBack { requested };
        assert_eq!(modal, fell_back(ChannelKind::ModalDialog));
        assert_eq!(toast_fail, fell_back(toast));
        assert_eq!(toast_ok, fell_back(toast));
        assert_eq!(custom, fell_back(ChannelKind::CustomCallback));
        assert_eq!(
            log.entries(),
            vec![
                Presented::alert(Some("Error"), "m"),
                Presented::alert(Some("Error"), "t"),
                Presented::alert(None, "s"),
                Presented::alert(Some("Error"), "c"),
            ]
        );
        assert_eq!(ctx.metrics().snapshot().fallbacks, 4);
        assert_eq!(ctx.metrics().snapshot().presentations, 4);
    }

    #[test]
    fn test_success_modal_inline_silent_present_nothing() {
        let log = PresentationLog::new();
        let ctx = log.context();
        for channel in [
            ChannelKind::ModalDialog,
            ChannelKind::InlineCallback,
            ChannelKind::Silent,
        ] {
            let result =
                ctx.present_success("ok", channel, &options(), &mut PresentHooks::default());
            assert_eq!(result, Presentation::Skipped);
        }
        assert!(log.entries().is_empty());
        assert_eq!(ctx.metrics().snapshot().presentations, 0);
    }

    #[test]
    fn test_inline_without_callback_has_no_fallback() {
        let log = PresentationLog::new();
        let ctx = log.context_without_handlers();
        let result = ctx.present_failure(
            "x",
            ChannelKind::InlineCallback,
            &options(),
            &mut PresentHooks::default(),
        );
        assert_eq!(result, Presentation::Skipped);
        assert!(log.entries().is_empty());
    }

    #[test]
    fn test_custom_callbacks_receive_message() {
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let ctx = PresentationLog::new().context();

        let s1 = seen.clone();
        let s2 = seen.clone();
        let mut hooks = PresentHooks {
            on_present_success: Some(Box::new(move |m: &str| {
                s1.lock().unwrap().push(format!("ok:{m}"))
            })),
            on_present_failure: Some(Box::new(move |m: &str| {
                s2.lock().unwrap().push(format!("err:{m}"))
            })),
        };

        ctx.present_success("yay", ChannelKind::CustomCallback, &options(), &mut hooks);
        ctx.present_failure("nay", ChannelKind::CustomCallback, &options(), &mut hooks);

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["ok:yay".to_string(), "err:nay".to_string()]
        );
    }

    #[test]
    fn test_custom_success_without_callback_is_skipped() {
        let log = PresentationLog::new();
        let ctx = log.context();
        let result = ctx.present_success(
            "x",
            ChannelKind::CustomCallback,
            &options(),
            &mut PresentHooks::default(),
        );
        assert_eq!(result, Presentation::Skipped);
        assert!(log.entries().is_empty());
    }

    #[test]
    fn test_builder_last_registration_wins() {
        let hits = Arc::new(Mutex::new(Vec::<&'static str>::new()));
        let (h1, h2) = (hits.clone(), hits.clone());
        let ctx = ReportingContext::builder()
            .toast_failure(move |_, _| h1.lock().unwrap().push("first"))
            .toast_failure(move |_, _| h2.lock().unwrap().push("second"))
            .build();

        ctx.present_failure(
            "x",
            ChannelKind::ToastNotification,
            &options(),
            &mut PresentHooks::default(),
        );
        assert_eq!(*hits.lock().unwrap(), vec!["second"]);
    }

    #[test]
    fn test_default_context_has_no_handlers() {
        let ctx = ReportingContext::new();
        assert!(ctx.handlers().toast_success.is_none());
        assert!(ctx.handlers().toast_failure.is_none());
        assert!(ctx.handlers().modal_failure.is_none());
        // Falls back to the logging alert without panicking.
        let result = ctx.present_failure(
            "x",
            ChannelKind::ModalDialog,
            &options(),
            &mut PresentHooks::default(),
        );
        assert_eq!(
            result,
            Presentation::FellBack {
                requested: ChannelKind::ModalDialog
            }
        );
    }

    #[traced_test]
    #[test]
    fn test_fallback_logs_warning() {
        let log = PresentationLog::new();
        let ctx = log.context_without_handlers();

        ctx.present_failure(
            "disk full",
            ChannelKind::ModalDialog,
            &options(),
            &mut PresentHooks::default(),
        );

        assert!(logs_contain("channel.fallback"));
        assert!(logs_contain("no modal handler registered"));
        assert_eq!(log.alerts(), vec![Presented::alert(Some("Error"), "disk full")]);
    }

    #[traced_test]
    #[test]
    fn test_registered_handler_logs_no_fallback() {
        let ctx = PresentationLog::new().context();

        ctx.present_failure(
            "disk full",
            ChannelKind::ModalDialog,
            &options(),
            &mut PresentHooks::default(),
        );

        assert!(!logs_contain("channel.fallback"));
    }
}
