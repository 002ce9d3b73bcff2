use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum FinanceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Request superseded by a newer one")]
    Superseded,
}

pub type Result<T> = std::result::Result<T, FinanceError>;

impl FinanceError {
    /// Build a field-level validation error.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        FinanceError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Classify the error for the store's `last_error` diagnostics.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FinanceError::Http(_) => ErrorKind::Network,
            FinanceError::Timeout => ErrorKind::Timeout,
            FinanceError::Api { .. } | FinanceError::NotFound(_) => ErrorKind::Backend,
            FinanceError::Validation { .. } => ErrorKind::Validation,
            FinanceError::Superseded => ErrorKind::Superseded,
            FinanceError::Io(_)
            | FinanceError::Json(_)
            | FinanceError::Url(_)
            | FinanceError::InvalidArgument(_) => ErrorKind::Internal,
        }
    }
}

// ---------------------------------------------------------------------------
// ErrorDescriptor
// ---------------------------------------------------------------------------

/// Broad category of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never reached the backend or no response arrived.
    Network,
    Timeout,
    /// The backend answered with a 4xx/5xx status.
    Backend,
    /// Rejected client-side before any request was made.
    Validation,
    Superseded,
    Internal,
}

/// Cloneable summary of a [`FinanceError`], kept as a store's `last_error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDescriptor {
    pub kind: ErrorKind,
    pub message: String,
    /// HTTP status for backend-reported failures.
    pub status: Option<u16>,
    /// Offending field for validation failures.
    pub field: Option<&'static str>,
}

impl From<&FinanceError> for ErrorDescriptor {
    fn from(err: &FinanceError) -> Self {
        let (status, field, message) = match err {
            FinanceError::Api { status, message } => (Some(*status), None, message.clone()),
            FinanceError::Validation { field, message } => (None, Some(*field), message.clone()),
            other => (None, None, other.to_string()),
        };
        Self {
            kind: err.kind(),
            message,
            status,
            field,
        }
    }
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, self.field) {
            (Some(status), _) => write!(f, "{} ({})", self.message, status),
            (None, Some(field)) => write!(f, "{}: {}", field, self.message),
            (None, None) => f.write_str(&self.message),
        }
    }
}
