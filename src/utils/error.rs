use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsentError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("No frontend configuration found for language {language}")]
    MissingLanguageConfiguration { language: u32 },

    #[error("Invalid site configuration: {message}")]
    InvalidSiteConfiguration { message: String },

    #[error("Asset registration failed for '{name}': {message}")]
    AssetRegistrationError { name: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ConsentError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ConsentError::ApiError(_) => ErrorSeverity::Medium,
            ConsentError::IoError(_) | ConsentError::SerializationError(_) => ErrorSeverity::High,
            ConsentError::ConfigError { .. }
            | ConsentError::ConfigValidationError { .. }
            | ConsentError::InvalidConfigValueError { .. }
            | ConsentError::MissingConfigError { .. } => ErrorSeverity::High,
            ConsentError::MissingLanguageConfiguration { .. } => ErrorSeverity::High,
            ConsentError::InvalidSiteConfiguration { .. } => ErrorSeverity::Critical,
            ConsentError::AssetRegistrationError { .. } => ErrorSeverity::Medium,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ConsentError::ApiError(_) => "Check that the seed endpoint is reachable and retry the import",
            ConsentError::IoError(_) => "Check that the file exists and is readable",
            ConsentError::SerializationError(_) => "Check the record store file for malformed JSON",
            ConsentError::ConfigError { .. }
            | ConsentError::ConfigValidationError { .. }
            | ConsentError::InvalidConfigValueError { .. }
            | ConsentError::MissingConfigError { .. } => "Review the extension settings file",
            ConsentError::MissingLanguageConfiguration { .. } => {
                "Create and enable a frontend setting for this language and storage scope"
            }
            ConsentError::InvalidSiteConfiguration { .. } => {
                "Every site declaration needs at least one locale entry"
            }
            ConsentError::AssetRegistrationError { .. } => "Check the asset sink configuration",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ConsentError::MissingLanguageConfiguration { language } => format!(
                "The consent banner cannot be rendered: language {} has no frontend configuration",
                language
            ),
            ConsentError::InvalidSiteConfiguration { message } => {
                format!("Import aborted, the site configuration is broken: {}", message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_language_is_reported_with_language() {
        let err = ConsentError::MissingLanguageConfiguration { language: 3 };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("language 3"));
    }

    #[test]
    fn test_invalid_site_configuration_is_critical() {
        let err = ConsentError::InvalidSiteConfiguration {
            message: "empty".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
