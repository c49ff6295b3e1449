use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubwayError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("{resource} name already exists: {name}")]
    DuplicateNameError { resource: &'static str, name: String },

    #[error("{resource} not found: {id}")]
    NotFoundError { resource: &'static str, id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Network,
    System,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Network => "network",
            ErrorCategory::System => "system",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SubwayError {
    pub fn validation(message: impl Into<String>) -> Self {
        SubwayError::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SubwayError::ValidationError { .. } | SubwayError::DuplicateNameError { .. } => {
                ErrorCategory::Validation
            }
            SubwayError::NotFoundError { .. } => ErrorCategory::NotFound,
            SubwayError::ConfigError { .. } | SubwayError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            SubwayError::HttpError(_) => ErrorCategory::Network,
            SubwayError::IoError(_) | SubwayError::SerializationError(_) => ErrorCategory::System,
        }
    }

    /// 客戶端錯誤為 Low，其餘依來源遞增
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::NotFound => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// HTTP status the error is surfaced with.
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Validation => 400,
            ErrorCategory::NotFound => 404,
            _ => 500,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SubwayError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            SubwayError::IoError(e) => format!("File system error: {}", e),
            SubwayError::HttpError(e) => format!("Could not reach the server: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SubwayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_category() {
        assert_eq!(SubwayError::validation("bad").status_code(), 400);

        let duplicate = SubwayError::DuplicateNameError {
            resource: "Line",
            name: "신분당선".to_string(),
        };
        assert_eq!(duplicate.status_code(), 400);
        assert_eq!(duplicate.category(), ErrorCategory::Validation);

        let missing = SubwayError::NotFoundError {
            resource: "Line",
            id: 7,
        };
        assert_eq!(missing.status_code(), 404);
        assert_eq!(missing.to_string(), "Line not found: 7");

        let config = SubwayError::ConfigError {
            message: "broken".to_string(),
        };
        assert_eq!(config.status_code(), 500);
        assert_eq!(config.severity(), ErrorSeverity::High);
    }
}
