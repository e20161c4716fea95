use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Git operation failed: {0}")]
    GitError(#[from] git2::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("XML processing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Manifest parsing error: {message}")]
    ManifestParseError { message: String },

    #[error("Dependency '{artifact}' is missing required element <{element}>")]
    MissingElementError { artifact: String, element: String },

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

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Repository,
    Network,
    Manifest,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl InventoryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::GitError(_) => ErrorCategory::Repository,
            Self::ApiError(_) => ErrorCategory::Network,
            Self::XmlError(_) | Self::ManifestParseError { .. } | Self::MissingElementError { .. } => {
                ErrorCategory::Manifest
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) | Self::ProcessingError { .. } => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 解析與網路錯誤在流程內已被吸收，僅作記錄
            ErrorCategory::Manifest => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Repository | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::GitError(_) => {
                "Check the repository URL and network access, or remove a half-cloned destination directory"
            }
            Self::ApiError(_) => "Check the API endpoint and your network connection",
            Self::XmlError(_) | Self::ManifestParseError { .. } => {
                "Make sure the manifest is well-formed XML"
            }
            Self::MissingElementError { .. } => {
                "Every dependency needs groupId, artifactId and version elements"
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Review the command line flags or the TOML configuration file",
            Self::IoError(_) => "Check file permissions and available disk space",
            Self::SerializationError(_) => "The API returned a body that is not valid JSON",
            Self::ProcessingError { .. } => "Re-run with --verbose for more detail",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::GitError(e) => format!("Could not clone the repository: {}", e.message()),
            Self::ApiError(_) => "Could not reach the inventory API".to_string(),
            Self::MissingElementError { artifact, element } => {
                format!("Dependency '{}' has no <{}> element", artifact, element)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InventoryError>;
