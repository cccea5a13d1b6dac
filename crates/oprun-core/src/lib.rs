//! oprun Core - async operation runner with pluggable result reporting
//!
//! Runs a caller-supplied async operation exactly once and:
//! - tracks an observable running flag, lowered on every exit path
//! - normalizes raised errors, returned error objects, and panics into one [`Failure`]
//! - reports the outcome through a [`ReportingContext`] channel
//!   (alert, toast, modal, inline, custom, silent)
//! - returns an [`OperationOutcome`] and never propagates an error or panic
//!
//! ```rust,ignore
//! let context = Arc::new(
//!     ReportingContext::builder()
//!         .toast_success(|msg, opts| ui.toast(msg, opts))
//!         .build(),
//! );
//! let runner = OperationRunner::new(context);
//! let outcome = runner
//!     .run(|| api.save_recipe(&draft), RunConfig::new().success_message("Saved"))
//!     .await;
//! ```

pub mod channel;
pub mod config;
pub mod error;
pub mod failure;
pub mod fakes;
pub mod metrics;
pub mod obs;
pub mod outcome;
pub mod reporting;
pub mod runner;
pub mod settings;
pub mod telemetry;

pub use channel::{
    ActionStyle, ChannelKind, ModalAction, ModalKind, ModalOptions, ToastOptions, ToastPosition,
};
pub use config::{PresentHooks, PresentationOptions, ResolvedConfig, RunConfig};
pub use error::{Result, RunnerError};
pub use failure::{ErrorObject, Failure};
pub use metrics::{MetricsSnapshot, RunMetrics};
pub use outcome::{DualResult, OperationOutcome};
pub use reporting::{
    AlertPresenter, ChannelHandlers, FocusDismisser, ModalHandler, NoFocus, Presentation,
    ReportingContext, ReportingContextBuilder, ToastHandler, TracingAlert,
};
pub use runner::{OperationRunner, RunnerState};
pub use settings::{OverlapPolicy, RunnerSettings, DEFAULT_ALERT_TITLE, DEFAULT_ERROR_MESSAGE};
pub use telemetry::init_tracing;

/// oprun version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
