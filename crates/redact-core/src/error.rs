use std::fmt;

use thiserror::Error;

use crate::artifact::ArtifactFormat;

/// Network call a failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Extract,
    Redact,
    Export(ArtifactFormat),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Extract => f.write_str("extraction"),
            Operation::Redact => f.write_str("redaction"),
            Operation::Export(format) => write!(f, "{} export", format),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("Redaction failed: {0}")]
    Redaction(String),

    #[error("{format} download failed: {message}")]
    Download {
        format: ArtifactFormat,
        message: String,
    },

    #[error("Network error during {operation}: {message}")]
    Transport {
        operation: Operation,
        message: String,
    },

    /// The HTTP client itself could not be set up; affects every call
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Failure of `operation` reported by the service itself (non-success status,
    /// unusable body, or a timeout)
    pub fn rejected(operation: Operation, message: impl Into<String>) -> Self {
        let message = message.into();
        match operation {
            Operation::Extract => Error::Extraction(message),
            Operation::Redact => Error::Redaction(message),
            Operation::Export(format) => Error::Download { format, message },
        }
    }

    pub fn transport(operation: Operation, message: impl Into<String>) -> Self {
        Error::Transport {
            operation,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_maps_to_operation_variant() {
        assert!(matches!(
            Error::rejected(Operation::Extract, "bad pdf"),
            Error::Extraction(m) if m == "bad pdf"
        ));
        assert!(matches!(
            Error::rejected(Operation::Redact, "500"),
            Error::Redaction(_)
        ));
        assert!(matches!(
            Error::rejected(Operation::Export(ArtifactFormat::Pdf), "boom"),
            Error::Download {
                format: ArtifactFormat::Pdf,
                ..
            }
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = Error::Extraction("Failed to parse PDF".to_string());
        assert_eq!(err.to_string(), "PDF extraction failed: Failed to parse PDF");

        let err = Error::transport(Operation::Export(ArtifactFormat::Text), "connection refused");
        assert_eq!(
            err.to_string(),
            "Network error during text export: connection refused"
        );

        let err = Error::Client("no TLS backend".to_string());
        assert_eq!(err.to_string(), "HTTP client setup failed: no TLS backend");
    }
}
