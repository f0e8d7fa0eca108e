//! Custom error types for baseliner with improved type safety and error handling.

use thiserror::Error;

/// Main error type for baseliner operations.
#[derive(Error, Debug)]
pub enum BaselinerError {
    // Configuration errors
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingEnvVars(Vec<String>),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // History walk errors
    #[error("reference '{reference}' not found in repository {repository}")]
    RefNotFound {
        repository: String,
        reference: String,
    },

    #[error(
        "baseline commit {commit} was never reached walking the history of {repository}"
    )]
    BaselineNotFound { repository: String, commit: String },

    // Network/API errors
    #[error("Remote API request failed: {0}")]
    RemoteApi(String),

    // External tool errors
    #[error("{program} failed: {status}")]
    CommandFailed { program: String, status: String },

    // Git errors
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    // Parsing errors - automatic conversions via #[from]
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Regular expression error: {0}")]
    Regex(#[from] regex::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Logger initialization error: {0}")]
    Logger(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using BaselinerError
pub type Result<T> = std::result::Result<T, BaselinerError>;

impl BaselinerError {
    /// Create a remote API error with context
    pub fn remote_api(msg: impl Into<String>) -> Self {
        Self::RemoteApi(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a ref-not-found error for a repository
    pub fn ref_not_found(
        repository: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self::RefNotFound {
            repository: repository.into(),
            reference: reference.into(),
        }
    }

    /// Create a baseline-not-found error for a repository
    pub fn baseline_not_found(
        repository: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self::BaselineNotFound {
            repository: repository.into(),
            commit: commit.into(),
        }
    }
}

// Implement From for std::io::Error - wraps in Other variant for generic I/O errors
impl From<std::io::Error> for BaselinerError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

// Implement From for reqwest errors (network/API)
impl From<reqwest::Error> for BaselinerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::RemoteApi(format!("network error: {}", err))
        } else {
            Self::RemoteApi(err.to_string())
        }
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for BaselinerError {
    fn from(err: octocrab::Error) -> Self {
        Self::RemoteApi(format!("GitHub API error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_formats() {
        let err = BaselinerError::remote_api("API call failed");
        assert_eq!(
            err.to_string(),
            "Remote API request failed: API call failed"
        );

        let err = BaselinerError::invalid_config("missing field");
        assert_eq!(err.to_string(), "Invalid configuration: missing field");

        let err = BaselinerError::MissingEnvVars(vec![
            "GITHUB_USERNAME".into(),
            "DOCKER_TOKEN".into(),
        ]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: GITHUB_USERNAME, DOCKER_TOKEN"
        );
    }

    #[test]
    fn test_error_helpers() {
        let err = BaselinerError::ref_not_found("iotagent", "abc123");
        assert!(matches!(err, BaselinerError::RefNotFound { .. }));
        assert_eq!(
            err.to_string(),
            "reference 'abc123' not found in repository iotagent"
        );

        let err = BaselinerError::baseline_not_found("iotagent", "def456");
        assert!(matches!(err, BaselinerError::BaselineNotFound { .. }));
    }

    #[test]
    fn test_from_conversions() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json");
        assert!(json_err.is_err());
        let err: BaselinerError = json_err.unwrap_err().into();
        assert!(matches!(err, BaselinerError::JsonParse(_)));
    }
}
