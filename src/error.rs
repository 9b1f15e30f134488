//! Error types for chatrelay.
//!
//! Every failure a submission can hit maps to one variant here. Failures
//! during a submission are additionally wrapped in the stage they occurred
//! in: [`Error::SessionCreationFailed`] or [`Error::MessageSendFailed`].

use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;

/// The main error type for chatrelay.
#[derive(Clone, Debug)]
pub enum Error {
    /// The backend answered with a non-success HTTP status.
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Response body, or a description of it.
        message: String,
    },

    /// The backend answered successfully but refused the message.
    Rejected {
        /// The `error` field of the reply.
        message: String,
    },

    /// The request did not complete within the configured timeout.
    Timeout {
        /// Human-readable error message.
        message: String,
        /// Duration of the timeout in seconds.
        duration: Option<f64>,
    },

    /// The request was cancelled by a reset or an interrupt.
    Aborted {
        /// Human-readable error message.
        message: String,
    },

    /// Could not reach the backend.
    Connection {
        /// Human-readable error message.
        message: String,
        /// Underlying cause.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// Malformed JSON or a reply missing required fields.
    Serialization {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// Reading from or writing to the terminal failed.
    Io {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Arc<io::Error>,
    },

    /// HTTP client error.
    HttpClient {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// Invalid configuration value.
    Validation {
        /// Human-readable error message.
        message: String,
        /// Parameter that failed validation.
        param: Option<String>,
    },

    /// A URL parsing or joining error.
    Url {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<url::ParseError>,
    },

    /// Establishing the conversation failed.
    SessionCreationFailed {
        /// What went wrong.
        source: Box<Error>,
    },

    /// Sending a message within an established conversation failed.
    MessageSendFailed {
        /// What went wrong.
        source: Box<Error>,
    },
}

impl Error {
    /// Creates a new API error.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Error::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a new rejection error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Error::Rejected {
            message: message.into(),
        }
    }

    /// Creates a new timeout error.
    pub fn timeout(message: impl Into<String>, duration: Option<f64>) -> Self {
        Error::Timeout {
            message: message.into(),
            duration,
        }
    }

    /// Creates a new aborted error.
    pub fn aborted(message: impl Into<String>) -> Self {
        Error::Aborted {
            message: message.into(),
        }
    }

    /// Creates a new connection error.
    pub fn connection(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Connection {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new serialization error.
    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Serialization {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new I/O error.
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    /// Creates a new HTTP client error.
    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HttpClient {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new validation error.
    pub fn validation(message: impl Into<String>, param: Option<String>) -> Self {
        Error::Validation {
            message: message.into(),
            param,
        }
    }

    /// Creates a new URL error.
    pub fn url(message: impl Into<String>, source: Option<url::ParseError>) -> Self {
        Error::Url {
            message: message.into(),
            source,
        }
    }

    /// Wraps an error raised while creating the conversation.
    pub fn session_creation_failed(source: Error) -> Self {
        Error::SessionCreationFailed {
            source: Box::new(source),
        }
    }

    /// Wraps an error raised while sending a message.
    pub fn message_send_failed(source: Error) -> Self {
        Error::MessageSendFailed {
            source: Box::new(source),
        }
    }

    /// Returns true if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self.root(), Error::Timeout { .. })
    }

    /// Returns true if the request was cancelled.
    pub fn is_aborted(&self) -> bool {
        matches!(self.root(), Error::Aborted { .. })
    }

    /// Returns true if this error is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self.root(), Error::Connection { .. })
    }

    /// Returns true if the backend refused the message.
    pub fn is_rejected(&self) -> bool {
        matches!(self.root(), Error::Rejected { .. })
    }

    /// Returns true if the backend could not be reached or did not answer in time.
    pub fn is_network(&self) -> bool {
        matches!(
            self.root(),
            Error::Connection { .. } | Error::Timeout { .. } | Error::HttpClient { .. }
        )
    }

    /// Returns true if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Returns true if the failure happened while establishing the conversation.
    pub fn is_session_creation(&self) -> bool {
        matches!(self, Error::SessionCreationFailed { .. })
    }

    /// Returns true if the failure happened while sending a message.
    pub fn is_message_send(&self) -> bool {
        matches!(self, Error::MessageSendFailed { .. })
    }

    /// Returns the status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self.root() {
            Error::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Strips the submission stage wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::SessionCreationFailed { source } | Error::MessageSendFailed { source } => {
                source.root()
            }
            other => other,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Api {
                status_code,
                message,
            } => {
                if message.is_empty() {
                    write!(f, "API error: HTTP {status_code}")
                } else {
                    write!(f, "API error: HTTP {status_code}: {message}")
                }
            }
            Error::Rejected { message } => {
                write!(f, "Rejected by backend: {message}")
            }
            Error::Timeout { message, duration } => {
                if let Some(duration) = duration {
                    write!(f, "Timeout error: {message} ({duration} seconds)")
                } else {
                    write!(f, "Timeout error: {message}")
                }
            }
            Error::Aborted { message } => {
                write!(f, "Request aborted: {message}")
            }
            Error::Connection { message, .. } => {
                write!(f, "Connection error: {message}")
            }
            Error::Serialization { message, .. } => {
                write!(f, "Serialization error: {message}")
            }
            Error::Io { message, .. } => {
                write!(f, "I/O error: {message}")
            }
            Error::HttpClient { message, .. } => {
                write!(f, "HTTP client error: {message}")
            }
            Error::Validation { message, param } => {
                if let Some(param) = param {
                    write!(f, "Validation error: {message} (parameter: {param})")
                } else {
                    write!(f, "Validation error: {message}")
                }
            }
            Error::Url { message, .. } => {
                write!(f, "URL error: {message}")
            }
            Error::SessionCreationFailed { source } => {
                write!(f, "Could not start a conversation: {source}")
            }
            Error::MessageSendFailed { source } => {
                write!(f, "Could not send message: {source}")
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Connection { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Serialization { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Io { source, .. } => Some(source),
            Error::HttpClient { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Url { source, .. } => {
                source.as_ref().map(|e| e as &(dyn error::Error + 'static))
            }
            Error::SessionCreationFailed { source } | Error::MessageSendFailed { source } => {
                Some(source.as_ref() as &(dyn error::Error + 'static))
            }
            _ => None,
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::url(format!("URL parse error: {err}"), Some(err))
    }
}

/// A specialized Result type for chatrelay operations.
pub type Result<T> = std::result::Result<T, Error>;
