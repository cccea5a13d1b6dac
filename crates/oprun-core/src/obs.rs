//! Structured observability hooks for the run lifecycle.
//!
//! Events are emitted at `info!` level except fallbacks and rejections,
//! which are warnings. Filter with `RUST_LOG`.

use tracing::{info, warn, Span};
use uuid::Uuid;

use crate::channel::ChannelKind;
use crate::failure::Failure;

/// Span that scopes every event of one run. Attach it with
/// `tracing::Instrument::instrument` so it survives across awaits.
pub fn run_span(run_id: &Uuid, label: Option<&str>) -> Span {
    tracing::info_span!("oprun.run", run_id = %run_id, label = label.unwrap_or("-"))
}

/// Emit event: run started.
pub fn emit_run_started(run_id: &Uuid) {
    info!(event = "run.started", run_id = %run_id);
}

/// Emit event: run finished with duration and outcome.
pub fn emit_run_finished(
    run_id: &Uuid,
    duration_ms: u64,
    succeeded: bool,
    failure_kind: Option<&str>,
) {
    info!(
        event = "run.finished",
        run_id = %run_id,
        duration_ms = duration_ms,
        succeeded = succeeded,
        failure_kind = failure_kind.unwrap_or("-"),
    );
}

/// Emit event: run refused because another run on the same runner was in flight.
pub fn emit_run_rejected(run_id: &Uuid) {
    warn!(event = "run.rejected", run_id = %run_id, "operation already in progress");
}

/// Emit event: failure presentation or `on_failure` panicked. The run keeps its
/// already-computed failed outcome.
pub fn emit_report_panicked(run_id: &Uuid, failure: &Failure) {
    warn!(event = "run.report_panicked", run_id = %run_id, error = %failure);
}

/// Emit event: requested channel could not present, falling back to a blocking alert.
pub fn emit_channel_fallback(requested: ChannelKind, reason: &str) {
    warn!(
        event = "channel.fallback",
        requested = %requested,
        fallback = %ChannelKind::BlockingAlert,
        reason = reason,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emitters_do_not_panic() {
        let run_id = Uuid::new_v4();
        let span = run_span(&run_id, Some("save_recipe"));
        let _entered = span.enter();
        emit_run_started(&run_id);
        emit_run_finished(&run_id, 12, false, Some("error"));
        emit_run_rejected(&run_id);
        emit_channel_fallback(ChannelKind::ModalDialog, "no modal handler registered");
        emit_report_panicked(&run_id, &Failure::Panic("toast bug".to_string()));
    }
}
