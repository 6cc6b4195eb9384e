//! Error types for the personalization client.
//!
//! # Design
//! Callers only ever see `XaynError`: a closed `ErrorKind` plus the status
//! code and message that produced it. The status and message are
//! diagnostics; control flow should match on `kind` alone.
//!
//! `BuildError` and `TransportError` are the two non-HTTP failure sources.
//! They stay distinct types at the seams that produce them and collapse into
//! `ErrorKind::UnknownError` once they reach the façade.

use std::fmt;

use thiserror::Error;

/// The closed set of failures the service can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownError,
    InvalidRequest,
    /// Reserved; no current status mapping produces it.
    InvalidUserId,
    InvalidUserOrDocumentId,
    UserNotFound,
    UnableToCreateListForUser,
    DocumentsNotSuccessfullyUploaded,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::UnknownError => "unknown error",
            ErrorKind::InvalidRequest => "invalid request",
            ErrorKind::InvalidUserId => "invalid user id",
            ErrorKind::InvalidUserOrDocumentId => "invalid user or document id",
            ErrorKind::UserNotFound => "user not found",
            ErrorKind::UnableToCreateListForUser => "unable to create list for user",
            ErrorKind::DocumentsNotSuccessfullyUploaded => "documents not successfully uploaded",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The only error type surfaced by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XaynError {
    pub kind: ErrorKind,
    pub status: Option<u16>,
    pub message: Option<String>,
}

impl fmt::Display for XaynError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {status})")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for XaynError {}

impl XaynError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            status: None,
            message: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownError).with_message(message)
    }
}

pub type XaynResult<T> = Result<T, XaynError>;

/// Failure while turning an operation into an `HttpRequest`.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("request payload could not be serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<BuildError> for XaynError {
    fn from(err: BuildError) -> Self {
        XaynError::unknown(format!("unable to build request: {err}"))
    }
}

/// Failure of the network exchange itself; no HTTP status is available.
#[derive(Debug, Clone, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<TransportError> for XaynError {
    fn from(err: TransportError) -> Self {
        XaynError::unknown(err.to_string())
    }
}
