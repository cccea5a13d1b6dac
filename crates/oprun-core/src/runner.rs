//! Operation runner: runs one async operation, tracks the running flag,
//! normalizes failures, and reports the outcome through a [`ReportingContext`].
//!
//! Two entry points share one algorithm:
//! - [`OperationRunner::run`] for operations that signal failure by returning `Err`
//! - [`OperationRunner::run_dual`] for operations returning a [`DualResult`]
//!
//! Neither ever returns an error or lets a panic escape, whether it comes from
//! the operation, a callback, or a presentation handler; callers inspect
//! [`OperationOutcome::succeeded`].

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tokio::sync::watch;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{ResolvedConfig, RunConfig};
use crate::failure::Failure;
use crate::obs::{
    emit_report_panicked, emit_run_finished, emit_run_rejected, emit_run_started, run_span,
};
use crate::outcome::{DualResult, OperationOutcome};
use crate::reporting::ReportingContext;
use crate::settings::{OverlapPolicy, RunnerSettings};

/// The running flag of one runner, observable through a watch channel.
#[derive(Debug)]
pub struct RunnerState {
    running: watch::Sender<bool>,
}

impl Default for RunnerState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunnerState {
    pub fn new() -> Self {
        let (running, _) = watch::channel(false);
        Self { running }
    }

    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    /// Receiver that observes every running-flag transition.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.running.subscribe()
    }

    /// Raise the flag. Under [`OverlapPolicy::Reject`] returns `None` when it
    /// was already raised; the flag is then left untouched.
    fn try_begin(&self, policy: OverlapPolicy) -> Option<RunningGuard<'_>> {
        match policy {
            OverlapPolicy::Allow => {
                self.running.send_replace(true);
                Some(RunningGuard { state: self })
            }
            OverlapPolicy::Reject => {
                let raised = self.running.send_if_modified(|running| {
                    if *running {
                        false
                    } else {
                        *running = true;
                        true
                    }
                });
                raised.then(|| RunningGuard { state: self })
            }
        }
    }
}

/// RAII guard that lowers the running flag on every exit path.
struct RunningGuard<'s> {
    state: &'s RunnerState,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.state.running.send_replace(false);
    }
}

/// Runs operations for one caller context (for example one screen) and
/// reports outcomes through a shared [`ReportingContext`].
#[derive(Debug)]
pub struct OperationRunner {
    context: Arc<ReportingContext>,
    settings: RunnerSettings,
    state: RunnerState,
}

impl OperationRunner {
    /// Runner with default settings.
    pub fn new(context: Arc<ReportingContext>) -> Self {
        Self::with_settings(context, RunnerSettings::default())
    }

    pub fn with_settings(context: Arc<ReportingContext>, settings: RunnerSettings) -> Self {
        Self {
            context,
            settings,
            state: RunnerState::new(),
        }
    }

    pub fn context(&self) -> &Arc<ReportingContext> {
        &self.context
    }

    pub fn settings(&self) -> &RunnerSettings {
        &self.settings
    }

    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    /// Run an operation that signals failure by returning `Err`.
    ///
    /// The operation is invoked exactly once, unless the overlap policy rejects the run.
    pub async fn run<'a, T, E, F, Fut>(
        &self,
        operation: F,
        config: RunConfig<'a, T>,
    ) -> OperationOutcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<Failure>,
    {
        let normalized = async move { operation().await.map(Some).map_err(Into::into) };
        self.execute(normalized, config).await
    }

    /// Run an operation returning a [`DualResult`]. A present failure marks the
    /// run failed even though nothing was raised.
    pub async fn run_dual<'a, T, F, Fut>(
        &self,
        operation: F,
        config: RunConfig<'a, T>,
    ) -> OperationOutcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = DualResult<T>>,
    {
        let normalized = async move { operation().await.into_result() };
        self.execute(normalized, config).await
    }

    async fn execute<'a, T, Fut>(
        &self,
        operation: Fut,
        config: RunConfig<'a, T>,
    ) -> OperationOutcome<T>
    where
        Fut: Future<Output = Result<Option<T>, Failure>>,
    {
        let config = config.resolve(&self.settings);
        let run_id = Uuid::new_v4();
        let span = run_span(&run_id, config.label.as_deref());
        self.execute_resolved(run_id, operation, config)
            .instrument(span)
            .await
    }

    async fn execute_resolved<'a, T, Fut>(
        &self,
        run_id: Uuid,
        operation: Fut,
        mut config: ResolvedConfig<'a, T>,
    ) -> OperationOutcome<T>
    where
        Fut: Future<Output = Result<Option<T>, Failure>>,
    {
        let Some(_guard) = self.state.try_begin(self.settings.overlap) else {
            emit_run_rejected(&run_id);
            self.context.metrics().inc_rejected();
            let message = Failure::Rejected
                .message()
                .unwrap_or_else(|| config.error_message.clone());
            return OperationOutcome::failed(Failure::Rejected, message);
        };

        emit_run_started(&run_id);
        if config.dismiss_focus {
            self.context.dismiss_focus();
        }

        let started = Instant::now();
        // The operation is polled inside catch_unwind, so a panic while
        // building or polling it becomes a failure instead of unwinding.
        let result = AssertUnwindSafe(operation)
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(Failure::from_panic(payload)));

        // Success presentation and `on_success` run inside the same guard as the
        // operation: a panic there turns the run into a failure.
        let result = match result {
            Ok(value) => {
                let settled = panic::catch_unwind(AssertUnwindSafe(|| {
                    if let Some(message) = config.success_message.as_deref() {
                        self.context.present_success(
                            message,
                            config.success_channel,
                            &config.presentation,
                            &mut config.hooks,
                        );
                    }
                    if let Some(on_success) = config.on_success.take() {
                        on_success(value.as_ref());
                    }
                }));
                match settled {
                    Ok(()) => Ok(value),
                    Err(payload) => Err(Failure::from_panic(payload)),
                }
            }
            Err(failure) => Err(failure),
        };

        let outcome = match result {
            Ok(value) => OperationOutcome::success(value),
            Err(failure) => {
                let message = failure
                    .message()
                    .unwrap_or_else(|| config.error_message.clone());
                let reported = panic::catch_unwind(AssertUnwindSafe(|| {
                    self.context.present_failure(
                        &message,
                        config.failure_channel,
                        &config.presentation,
                        &mut config.hooks,
                    );
                    if let Some(on_failure) = config.on_failure.take() {
                        on_failure(&failure);
                    }
                }));
                if let Err(payload) = reported {
                    emit_report_panicked(&run_id, &Failure::from_panic(payload));
                }
                OperationOutcome::failed(failure, message)
            }
        };

        self.context.metrics().record_run(outcome.succeeded);
        emit_run_finished(
            &run_id,
            started.elapsed().as_millis() as u64,
            outcome.succeeded,
            outcome.failure.as_ref().map(Failure::kind),
        );
        outcome
    }
}
