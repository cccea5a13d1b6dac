//! Presentation channels and their per-channel options.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RunnerError;

/// Strategy used to surface a success or failure message to the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Native blocking alert.
    BlockingAlert,

    /// Transient toast through the registered toast handlers.
    ToastNotification,

    /// Modal dialog through the registered modal handler.
    ModalDialog,

    /// Caller's `on_present_failure` callback only.
    InlineCallback,

    /// Caller's `on_present_success` / `on_present_failure` callbacks.
    CustomCallback,

    /// Nothing is shown.
    Silent,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 6] = [
        ChannelKind::BlockingAlert,
        ChannelKind::ToastNotification,
        ChannelKind::ModalDialog,
        ChannelKind::InlineCallback,
        ChannelKind::CustomCallback,
        ChannelKind::Silent,
    ];

    /// Get the channel name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            ChannelKind::BlockingAlert => "blocking_alert",
            ChannelKind::ToastNotification => "toast_notification",
            ChannelKind::ModalDialog => "modal_dialog",
            ChannelKind::InlineCallback => "inline_callback",
            ChannelKind::CustomCallback => "custom_callback",
            ChannelKind::Silent => "silent",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChannelKind {
    type Err = RunnerError;

    /// Accepts the full snake_case name or the short form (`alert`, `toast`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let kind = match normalized.as_str() {
            "blocking_alert" | "alert" => ChannelKind::BlockingAlert,
            "toast_notification" | "toast" => ChannelKind::ToastNotification,
            "modal_dialog" | "modal" => ChannelKind::ModalDialog,
            "inline_callback" | "inline" => ChannelKind::InlineCallback,
            "custom_callback" | "custom" => ChannelKind::CustomCallback,
            "silent" | "none" => ChannelKind::Silent,
            _ => {
                return Err(RunnerError::InvalidSetting(format!(
                    "unknown channel '{}'",
                    s
                )))
            }
        };
        Ok(kind)
    }
}

/// Where a toast appears.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ToastPosition {
    Top,
    Bottom,
}

impl fmt::Display for ToastPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToastPosition::Top => f.write_str("top"),
            ToastPosition::Bottom => f.write_str("bottom"),
        }
    }
}

/// Options forwarded to a toast handler.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastOptions {
    pub position: ToastPosition,
    pub duration_ms: u64,
}

impl ToastOptions {
    /// Defaults for success toasts: bottom, 2 seconds.
    pub const SUCCESS: ToastOptions = ToastOptions {
        position: ToastPosition::Bottom,
        duration_ms: 2000,
    };

    /// Defaults for failure toasts: top, 3 seconds.
    pub const FAILURE: ToastOptions = ToastOptions {
        position: ToastPosition::Top,
        duration_ms: 3000,
    };

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Visual flavour of a modal dialog.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModalKind {
    #[default]
    Error,
    Warning,
    Info,
    Success,
}

/// Button style hint for a modal action.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionStyle {
    #[default]
    Default,
    Cancel,
    Destructive,
}

/// One button of a modal dialog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModalAction {
    pub label: String,

    #[serde(default)]
    pub style: ActionStyle,
}

impl ModalAction {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            style: ActionStyle::Default,
        }
    }

    pub fn style(mut self, style: ActionStyle) -> Self {
        self.style = style;
        self
    }

    /// The single acknowledgement button used when a caller names none.
    pub fn ok() -> Self {
        Self::new("OK")
    }
}

/// Options forwarded to the modal handler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModalOptions {
    pub title: String,

    #[serde(default)]
    pub kind: ModalKind,

    pub actions: Vec<ModalAction>,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            title: "Error".to_string(),
            kind: ModalKind::Error,
            actions: vec![ModalAction::ok()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names_round_trip_through_from_str() {
        for kind in ChannelKind::ALL {
            assert_eq!(kind.name().parse::<ChannelKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_channel_short_names() {
        assert_eq!("toast".parse::<ChannelKind>().unwrap(), ChannelKind::ToastNotification);
        assert_eq!("Modal".parse::<ChannelKind>().unwrap(), ChannelKind::ModalDialog);
        assert_eq!("blocking-alert".parse::<ChannelKind>().unwrap(), ChannelKind::BlockingAlert);
        assert!("carrier_pigeon".parse::<ChannelKind>().is_err());
    }

    #[test]
    fn test_channel_serde_snake_case() {
        let json = serde_json::to_string(&ChannelKind::InlineCallback).unwrap();
        assert_eq!(json, "\"inline_callback\"");
    }

    #[test]
    fn test_toast_defaults_are_asymmetric() {
        assert_eq!(ToastOptions::SUCCESS.position, ToastPosition::Bottom);
        assert_eq!(ToastOptions::SUCCESS.duration(), Duration::from_millis(2000));
        assert_eq!(ToastOptions::FAILURE.position, ToastPosition::Top);
        assert_eq!(ToastOptions::FAILURE.duration(), Duration::from_millis(3000));
    }

    #[test]
    fn test_modal_defaults() {
        let modal = ModalOptions::default();
        assert_eq!(modal.title, "Error");
        assert_eq!(modal.kind, ModalKind::Error);
        assert_eq!(modal.actions, vec![ModalAction::ok()]);
    }
}
