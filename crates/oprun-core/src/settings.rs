//! Runner-wide defaults.
//!
//! Built-in defaults can be overridden from a TOML file and then from the
//! environment (`OPRUN_ERROR_MESSAGE`, `OPRUN_SUCCESS_CHANNEL`,
//! `OPRUN_FAILURE_CHANNEL`, `OPRUN_OVERLAP`). Per-call [`RunConfig`] values
//! override whatever ends up here.
//!
//! [`RunConfig`]: crate::config::RunConfig

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::channel::{ChannelKind, ModalOptions, ToastOptions};
use crate::error::{Result, RunnerError};

/// Message used when neither the failure nor the caller supplies one.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong";

/// Title of the blocking alert shown for failures.
pub const DEFAULT_ALERT_TITLE: &str = "Error";

/// What a runner does when asked to start while a previous run is in flight.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Start the new run anyway. The shared running flag then reflects
    /// whichever run settled last.
    #[default]
    Allow,

    /// Refuse the new run without invoking its operation.
    Reject,
}

impl std::str::FromStr for OverlapPolicy {
    type Err = RunnerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(OverlapPolicy::Allow),
            "reject" => Ok(OverlapPolicy::Reject),
            other => Err(RunnerError::InvalidSetting(format!(
                "unknown overlap policy '{}'",
                other
            ))),
        }
    }
}

/// Blocking alert settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AlertSettings {
    pub failure_title: String,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            failure_title: DEFAULT_ALERT_TITLE.to_string(),
        }
    }
}

/// Defaults shared by every run of a runner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunnerSettings {
    /// Last-resort failure message.
    pub default_error_message: String,

    /// Channel used for success messages when the call names none.
    pub success_channel: ChannelKind,

    /// Channel used for failure messages when the call names none.
    pub failure_channel: ChannelKind,

    /// Whether to dismiss input focus before running.
    pub dismiss_focus: bool,

    pub overlap: OverlapPolicy,

    pub toast_success: ToastOptions,

    pub toast_failure: ToastOptions,

    pub modal: ModalOptions,

    pub alert: AlertSettings,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            default_error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            success_channel: ChannelKind::ToastNotification,
            failure_channel: ChannelKind::ModalDialog,
            dismiss_focus: true,
            overlap: OverlapPolicy::Allow,
            toast_success: ToastOptions::SUCCESS,
            toast_failure: ToastOptions::FAILURE,
            modal: ModalOptions::default(),
            alert: AlertSettings::default(),
        }
    }
}

impl RunnerSettings {
    /// Parse settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: RunnerSettings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&text)?.with_env_overrides()?;
        debug!(path = %path.display(), "Loaded runner settings");
        Ok(settings)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(message) = lookup("OPRUN_ERROR_MESSAGE") {
            self.default_error_message = message;
        }
        if let Some(channel) = lookup("OPRUN_SUCCESS_CHANNEL") {
            self.success_channel = channel.parse()?;
        }
        if let Some(channel) = lookup("OPRUN_FAILURE_CHANNEL") {
            self.failure_channel = channel.parse()?;
        }
        if let Some(policy) = lookup("OPRUN_OVERLAP") {
            self.overlap = policy.parse()?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_error_message.trim().is_empty() {
            return Err(RunnerError::InvalidSetting(
                "default_error_message must not be empty".to_string(),
            ));
        }
        for (name, toast) in [
            ("toast_success", &self.toast_success),
            ("toast_failure", &self.toast_failure),
        ] {
            if toast.duration_ms == 0 {
                return Err(RunnerError::InvalidSetting(format!(
                    "{}.duration_ms must be positive",
                    name
                )));
            }
        }
        Ok(())
    }
}
