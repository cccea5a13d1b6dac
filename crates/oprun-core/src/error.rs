//! Error types for runner setup and guard rejections

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Operation already in progress")]
    AlreadyRunning,
}

/// Result type for runner setup operations
pub type Result<T> = std::result::Result<T, RunnerError>;
