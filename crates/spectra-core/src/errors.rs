//! Structured error types shared across spectra crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`SpectraError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (dimensions, limits, indices, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the spectra workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum SpectraError {
    /// A dense-only operation received a sparse operator above the dense limit.
    #[error("size error: {0}")]
    Size(ErrorInfo),
    /// An iterative eigensolver exhausted its iteration budget.
    #[error("convergence error: {0}")]
    Convergence(ErrorInfo),
    /// The continued-fraction recursion hit a vanishing or non-finite denominator.
    #[error("division error: {0}")]
    Division(ErrorInfo),
    /// Malformed caller input (dimension mismatches, empty samples, bad config).
    #[error("input error: {0}")]
    Input(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

/// Payload-free discriminant of [`SpectraError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// See [`SpectraError::Size`].
    Size,
    /// See [`SpectraError::Convergence`].
    Convergence,
    /// See [`SpectraError::Division`].
    Division,
    /// See [`SpectraError::Input`].
    Input,
    /// See [`SpectraError::Serde`].
    Serde,
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl SpectraError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            SpectraError::Size(info)
            | SpectraError::Convergence(info)
            | SpectraError::Division(info)
            | SpectraError::Input(info)
            | SpectraError::Serde(info) => info,
        }
    }

    /// Returns the error family without its payload.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SpectraError::Size(_) => ErrorKind::Size,
            SpectraError::Convergence(_) => ErrorKind::Convergence,
            SpectraError::Division(_) => ErrorKind::Division,
            SpectraError::Input(_) => ErrorKind::Input,
            SpectraError::Serde(_) => ErrorKind::Serde,
        }
    }

    /// Shorthand for an [`SpectraError::Input`] with the given code.
    pub fn input(code: &str, message: impl Into<String>) -> Self {
        SpectraError::Input(ErrorInfo::new(code, message))
    }
}
