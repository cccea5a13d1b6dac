//! Recording fakes for the host presentation seams (testing only)
//!
//! [`PresentationLog`] captures every alert, toast, and modal a
//! [`ReportingContext`] shows, plus focus dismissals, so tests can assert on
//! exactly what a user would have seen.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::channel::{ModalOptions, ToastOptions};
use crate::reporting::{AlertPresenter, FocusDismisser, ReportingContext, ReportingContextBuilder};

/// One captured presentation.
#[derive(Debug, Clone, PartialEq)]
pub enum Presented {
    Alert {
        title: Option<String>,
        message: String,
    },
    ToastSuccess {
        message: String,
        options: ToastOptions,
    },
    ToastFailure {
        message: String,
        options: ToastOptions,
    },
    ModalFailure {
        message: String,
        options: ModalOptions,
    },
}

impl Presented {
    pub fn alert(title: Option<&str>, message: &str) -> Self {
        Presented::Alert {
            title: title.map(str::to_string),
            message: message.to_string(),
        }
    }

    pub fn is_alert(&self) -> bool {
        matches!(self, Presented::Alert { .. })
    }
}

/// Shared, cloneable log of presentations.
#[derive(Debug, Clone, Default)]
pub struct PresentationLog {
    entries: Arc<Mutex<Vec<Presented>>>,
    focus_dismissals: Arc<AtomicUsize>,
}

impl PresentationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Presented> {
        self.entries.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<Presented> {
        self.entries().into_iter().filter(Presented::is_alert).collect()
    }

    pub fn focus_dismissals(&self) -> usize {
        self.focus_dismissals.load(Ordering::SeqCst)
    }

    fn push(&self, entry: Presented) {
        self.entries.lock().unwrap().push(entry);
    }

    /// Builder preloaded with a recording alert and focus dismisser, no handlers.
    pub fn builder(&self) -> ReportingContextBuilder {
        ReportingContext::builder()
            .alert(Arc::new(RecordingAlert { log: self.clone() }))
            .focus(Arc::new(RecordingFocus { log: self.clone() }))
    }

    /// Context with recording toast and modal handlers registered.
    pub fn context(&self) -> ReportingContext {
        let (ok, fail, modal) = (self.clone(), self.clone(), self.clone());
        self.builder()
            .toast_success(move |message, options| {
                ok.push(Presented::ToastSuccess {
                    message: message.to_string(),
                    options: *options,
                })
            })
            .toast_failure(move |message, options| {
                fail.push(Presented::ToastFailure {
                    message: message.to_string(),
                    options: *options,
                })
            })
            .modal_failure(move |message, options| {
                modal.push(Presented::ModalFailure {
                    message: message.to_string(),
                    options: options.clone(),
                })
            })
            .build()
    }

    /// Context with only the alert and focus seams; every handler missing.
    pub fn context_without_handlers(&self) -> ReportingContext {
        self.builder().build()
    }
}

/// Alert presenter that records into a [`PresentationLog`].
#[derive(Debug, Clone)]
pub struct RecordingAlert {
    log: PresentationLog,
}

impl AlertPresenter for RecordingAlert {
    fn alert(&self, title: Option<&str>, message: &str) {
        self.log.push(Presented::alert(title, message));
    }
}

/// Focus dismisser that counts calls.
#[derive(Debug, Clone)]
pub struct RecordingFocus {
    log: PresentationLog,
}

impl FocusDismisser for RecordingFocus {
    fn dismiss(&self) {
        self.log.focus_dismissals.fetch_add(1, Ordering::SeqCst);
    }
}
