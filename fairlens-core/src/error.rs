//! Error types for the FairLens client core.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering the remote API, local input validation, and configuration.

use std::fmt;
use std::path::PathBuf;

/// Top-level error type for the FairLens core library.
#[derive(Debug, thiserror::Error)]
pub enum FairlensError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the remote fairness service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response. `message` is the server's `detail` field when it
    /// could be parsed, otherwise `Server error: {status}`.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// A 2xx response whose body does not have the expected shape.
    #[error("{message}")]
    MalformedResponse { message: String },

    #[error("Connection failed: {message}")]
    Connection { message: String },

    #[error("Invalid API URL: {message}")]
    InvalidUrl { message: String },
}

impl ApiError {
    /// Message suitable for a notification body.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A single reason a local input was rejected before any request was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingFile,
    InvalidExtension { file: String, expected: Vec<String> },
    MissingTarget,
    NoProtectedAttributes,
    NoFeatures,
    MissingTechnique,
    MissingProtectedAttribute,
    MitigationAlreadyApplied,
    RequestPending,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFile => write!(f, "no file selected"),
            Self::InvalidExtension { file, expected } => {
                write!(f, "'{}' must have extension {}", file, expected.join(", "))
            }
            Self::MissingTarget => write!(f, "target column is required"),
            Self::NoProtectedAttributes => write!(f, "select at least one protected attribute"),
            Self::NoFeatures => write!(f, "select at least one feature column"),
            Self::MissingTechnique => write!(f, "mitigation technique is required"),
            Self::MissingProtectedAttribute => write!(f, "protected attribute is required"),
            Self::MitigationAlreadyApplied => write!(f, "mitigation has already been applied"),
            Self::RequestPending => write!(f, "the same request is still running"),
        }
    }
}

/// Local input rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn single(issue: ValidationIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }

    pub fn contains(&self, issue: &ValidationIssue) -> bool {
        self.issues.contains(issue)
    }
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// A type alias for results using the top-level `FairlensError`.
pub type Result<T> = std::result::Result<T, FairlensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_shows_detail_only() {
        let err = ApiError::Server {
            status: 400,
            message: "Target column not found".into(),
        };
        assert_eq!(err.to_string(), "Target column not found");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_error_display_api_wrapped() {
        let err = FairlensError::Api(ApiError::MalformedResponse {
            message: "Invalid response: missing columns data".into(),
        });
        assert_eq!(
            err.to_string(),
            "API error: Invalid response: missing columns data"
        );
    }

    #[test]
    fn test_validation_error_joins_issues() {
        let err = ValidationError::new(vec![
            ValidationIssue::NoProtectedAttributes,
            ValidationIssue::NoFeatures,
        ]);
        assert_eq!(
            err.to_string(),
            "select at least one protected attribute; select at least one feature column"
        );
        assert!(err.contains(&ValidationIssue::NoFeatures));
        assert!(!err.contains(&ValidationIssue::MissingTarget));
    }

    #[test]
    fn test_invalid_extension_display() {
        let issue = ValidationIssue::InvalidExtension {
            file: "data.xlsx".into(),
            expected: vec![".csv".into()],
        };
        assert_eq!(issue.to_string(), "'data.xlsx' must have extension .csv");
    }

    #[test]
    fn test_connection_error_has_no_status() {
        let err = ApiError::Connection {
            message: "refused".into(),
        };
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "Connection failed: refused");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FairlensError = io_err.into();
        assert!(matches!(err, FairlensError::Io(_)));
    }

    #[test]
    fn test_error_display_config() {
        let err = FairlensError::Config(ConfigError::Invalid {
            message: "api.base_url is empty".into(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid configuration: api.base_url is empty"
        );
    }
}
