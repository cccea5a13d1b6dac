//! Operation results: the dual-result shape operations may return, and the
//! normalized outcome the runner hands back to its caller.

use crate::failure::Failure;

/// Dual-result return shape: an operation may hand back a value, a failure,
/// or both. Any failure present marks the run failed, even without a raised error.
#[derive(Debug)]
pub struct DualResult<T> {
    pub value: Option<T>,
    pub failure: Option<Failure>,
}

impl<T> DualResult<T> {
    /// Successful result carrying `value`.
    pub fn ok(value: T) -> Self {
        Self {
            value: Some(value),
            failure: None,
        }
    }

    /// Failed result carrying `failure`.
    pub fn err(failure: impl Into<Failure>) -> Self {
        Self {
            value: None,
            failure: Some(failure.into()),
        }
    }

    /// Successful result with no value.
    pub fn empty() -> Self {
        Self {
            value: None,
            failure: None,
        }
    }

    /// Whether a failure marker is present.
    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }

    /// Collapse into a tagged result. A present failure wins over a present value.
    pub fn into_result(self) -> Result<Option<T>, Failure> {
        match self.failure {
            Some(failure) => Err(failure),
            None => Ok(self.value),
        }
    }
}

impl<T, E: Into<Failure>> From<Result<T, E>> for DualResult<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => DualResult::ok(value),
            Err(e) => DualResult::err(e),
        }
    }
}

/// Result of one runner invocation.
///
/// Exactly one side holds: `succeeded == true` with no failure, or
/// `succeeded == false` with both `failure` and `failure_message` set.
/// A successful dual-result run may still carry no value.
#[derive(Debug)]
pub struct OperationOutcome<T> {
    pub succeeded: bool,
    pub value: Option<T>,
    pub failure: Option<Failure>,
    pub failure_message: Option<String>,
}

impl<T> OperationOutcome<T> {
    pub(crate) fn success(value: Option<T>) -> Self {
        Self {
            succeeded: true,
            value,
            failure: None,
            failure_message: None,
        }
    }

    pub(crate) fn failed(failure: Failure, failure_message: String) -> Self {
        Self {
            succeeded: false,
            value: None,
            failure: Some(failure),
            failure_message: Some(failure_message),
        }
    }

    pub fn is_success(&self) -> bool {
        self.succeeded
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    /// The resolved, user-facing failure message.
    pub fn failure_message(&self) -> Option<&str> {
        self.failure_message.as_deref()
    }

    /// Convert into a standard `Result`, dropping the resolved message.
    pub fn into_result(self) -> Result<Option<T>, Failure> {
        match self.failure {
            Some(failure) => Err(failure),
            None => Ok(self.value),
        }
    }
}
