//! Error taxonomy for the CCC tools.
//!
//! Every failure is one of a handful of families, and each family wraps the
//! same [`ErrorInfo`] record so callers can match on stable codes.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code, message and diagnostics carried by a [`CccError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Dotted identifier such as `ccc_data.bvd_averages`.
    pub code: String,
    /// What went wrong, for the operator.
    pub message: String,
    /// Offending inputs: file paths, labels, raw field values.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Suggested remedy, when there is an obvious one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Starts a record with no context and no hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records `key = value`; a repeated key keeps the latest value.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Attaches a remedy shown after the message.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// `[code] message {key=value, ...}; hint`
impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if !self.context.is_empty() {
            let pairs: Vec<String> = self
                .context
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            write!(f, " {{{}}}", pairs.join(", "))?;
        }
        match &self.hint {
            Some(hint) => write!(f, "; {hint}"),
            None => Ok(()),
        }
    }
}

/// Error type returned throughout the CCC crates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum CccError {
    /// Filesystem and stream failures.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// A field was present but could not be converted.
    #[error("parse error: {0}")]
    Parse(ErrorInfo),
    /// Required data is missing or fails a sanity requirement.
    #[error("data error: {0}")]
    Data(ErrorInfo),
    /// Instrument transport and protocol failures.
    #[error("instrument error: {0}")]
    Instrument(ErrorInfo),
    /// Invalid or unreadable configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Invalid uncertain-number construction or arithmetic.
    #[error("uncertainty error: {0}")]
    Uncertainty(ErrorInfo),
}

impl CccError {
    /// The record shared by every family.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            CccError::Io(info)
            | CccError::Parse(info)
            | CccError::Data(info)
            | CccError::Instrument(info)
            | CccError::Config(info)
            | CccError::Uncertainty(info) => info,
        }
    }

    /// Adds a context entry to the payload, keeping the error family.
    pub fn with_context(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            CccError::Io(info) => CccError::Io(info.with_context(key, value)),
            CccError::Parse(info) => CccError::Parse(info.with_context(key, value)),
            CccError::Data(info) => CccError::Data(info.with_context(key, value)),
            CccError::Instrument(info) => CccError::Instrument(info.with_context(key, value)),
            CccError::Config(info) => CccError::Config(info.with_context(key, value)),
            CccError::Uncertainty(info) => CccError::Uncertainty(info.with_context(key, value)),
        }
    }

    /// Wraps an I/O failure on `path` under the given code.
    pub fn io(code: &str, path: &Path, err: impl ToString) -> Self {
        CccError::Io(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
        )
    }
}
