//! Failure carriers produced by operations.
//!
//! An operation can fail in several shapes: it can raise an error, return an
//! explicit error object through the dual-result convention, raise a bare value
//! that is not an error at all, or panic. All of them collapse into [`Failure`],
//! which the runner inspects only for an optional human-readable message.

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Explicit error object returned by an operation (for example a backend
/// error body). Only `message` takes part in message resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ErrorObject {
    /// Human-readable message, if the backend supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Machine-readable error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Free-form details, forwarded untouched.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl ErrorObject {
    /// Error object carrying only a message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Attach a machine-readable code.
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Opaque failure of one operation run.
#[derive(Debug)]
pub enum Failure {
    /// The operation raised an error.
    Error(anyhow::Error),

    /// The operation returned an explicit error object.
    Object(ErrorObject),

    /// The operation raised a value that is not an error (a bare string, null, ...).
    /// Such values carry no message.
    Value(serde_json::Value),

    /// The operation panicked; holds the rendered panic payload for diagnostics.
    Panic(String),

    /// The runner refused to start the operation because another run was in flight.
    Rejected,
}

impl Failure {
    /// Wrap any standard error.
    pub fn from_error<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Failure::Error(anyhow::Error::new(error))
    }

    /// Raise a bare value, mirroring a `throw "boom"` style failure.
    pub fn raise(value: impl Into<serde_json::Value>) -> Self {
        Failure::Value(value.into())
    }

    /// Convert a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        Failure::Panic(panic_payload_to_string(&payload))
    }

    /// The failure's own human-readable message, if it has a non-empty one.
    ///
    /// Bare values and panics never have one; their text is diagnostic only.
    pub fn message(&self) -> Option<String> {
        let message = match self {
            Failure::Error(err) => Some(err.to_string()),
            Failure::Object(obj) => obj.message.clone(),
            Failure::Value(_) | Failure::Panic(_) => None,
            Failure::Rejected => Some(crate::error::RunnerError::AlreadyRunning.to_string()),
        };
        message.filter(|m| !m.trim().is_empty())
    }

    /// Short kind name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Failure::Error(_) => "error",
            Failure::Object(_) => "object",
            Failure::Value(_) => "value",
            Failure::Panic(_) => "panic",
            Failure::Rejected => "rejected",
        }
    }

    /// The error object, when the failure came through the dual-result convention.
    pub fn as_object(&self) -> Option<&ErrorObject> {
        match self {
            Failure::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Error(err) => write!(f, "{err}"),
            Failure::Object(obj) => match &obj.message {
                Some(m) => write!(f, "{m}"),
                None => write!(f, "error object without message"),
            },
            Failure::Value(v) => write!(f, "raised value: {v}"),
            Failure::Panic(p) => write!(f, "panicked: {p}"),
            Failure::Rejected => write!(f, "rejected: operation already in progress"),
        }
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Failure::Error(err)
    }
}

impl From<ErrorObject> for Failure {
    fn from(obj: ErrorObject) -> Self {
        Failure::Object(obj)
    }
}

impl From<serde_json::Value> for Failure {
    fn from(value: serde_json::Value) -> Self {
        Failure::Value(value)
    }
}

impl From<std::io::Error> for Failure {
    fn from(err: std::io::Error) -> Self {
        Failure::from_error(err)
    }
}

fn panic_payload_to_string(payload: &Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
