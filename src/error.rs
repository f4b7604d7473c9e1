//! Errors produced while turning a tool call into a dispatched 2Do URL.
//!
//! Every failure is detected synchronously, either while reading the call's
//! parameters or during the single `open` invocation. None of them are retried:
//! re-sending a task-creation URL would create the task twice.

/// A failed tool invocation.
///
/// # Examples
///
/// ```
/// use twodo_mcp::Error;
///
/// let error = Error::missing("task");
/// assert_eq!(error.kind(), "MissingParameter");
/// assert_eq!(error.to_string(), "missing required parameter 'task'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A required parameter was absent, null, or empty after trimming.
    ///
    /// Raised before any dispatch is attempted.
    #[error("missing required parameter '{name}'")]
    MissingParameter {
        /// The parameter name as the caller spells it.
        name: String,
    },

    /// A parameter was supplied but falls outside its documented domain.
    ///
    /// Raised before any dispatch is attempted.
    #[error("invalid value for parameter '{name}': {reason}")]
    InvalidParameterValue {
        /// The parameter name as the caller spells it.
        name: String,
        /// What was wrong with the value.
        reason: String,
    },

    /// The OS URL handler could not be launched or exited unsuccessfully.
    ///
    /// Carries whatever diagnostic text the OS provided.
    #[error("dispatch failed: {0}")]
    DispatchFailed(String),
}

impl Error {
    /// Shorthand for [`Error::MissingParameter`].
    pub fn missing(name: &str) -> Self {
        Error::MissingParameter {
            name: name.to_string(),
        }
    }

    /// Shorthand for [`Error::InvalidParameterValue`].
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Error::InvalidParameterValue {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// The taxonomy name of this error, as reported to MCP clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingParameter { .. } => "MissingParameter",
            Error::InvalidParameterValue { .. } => "InvalidParameterValue",
            Error::DispatchFailed(_) => "DispatchFailed",
        }
    }
}
