//! Console-backed presentation channels.
//!
//! Everything is written to stderr so a command's own stdout passes through untouched.

use std::io::Write;
use std::sync::Arc;

use oprun_core::{AlertPresenter, ModalOptions, ReportingContext, ToastOptions};

/// Blocking alert rendered as a framed block on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleAlert;

impl AlertPresenter for ConsoleAlert {
    fn alert(&self, title: Option<&str>, message: &str) {
        write_stderr(&render_alert(title, message));
    }
}

/// Reporting context wired to the console.
pub fn console_context() -> ReportingContext {
    ReportingContext::builder()
        .alert(Arc::new(ConsoleAlert))
        .toast_success(|message, options| write_stderr(&render_toast("ok", message, options)))
        .toast_failure(|message, options| write_stderr(&render_toast("error", message, options)))
        .modal_failure(|message, options| write_stderr(&render_modal(message, options)))
        .build()
}

fn write_stderr(text: &str) {
    let mut stderr = std::io::stderr().lock();
    // Presentation is best-effort; a closed stderr must not fail the run.
    let _ = writeln!(stderr, "{}", text);
}

pub fn render_alert(title: Option<&str>, message: &str) -> String {
    match title {
        Some(title) => format!("== {} ==\n{}", title, message),
        None => message.to_string(),
    }
}

pub fn render_toast(tone: &str, message: &str, options: &ToastOptions) -> String {
    format!(
        "[toast {} {} {}ms] {}",
        tone, options.position, options.duration_ms, message
    )
}

pub fn render_modal(message: &str, options: &ModalOptions) -> String {
    let width = message.len().max(options.title.len()) + 4;
    let rule = "-".repeat(width);
    let actions = options
        .actions
        .iter()
        .map(|a| format!("[ {} ]", a.label))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "+{rule}+\n| {title} ({kind:?})\n| {message}\n| {actions}\n+{rule}+",
        rule = rule,
        title = options.title,
        kind = options.kind,
        message = message,
        actions = actions,
    )
}
