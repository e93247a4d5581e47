use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("{service} service returned {status}: {body}")]
    GenerationServiceError {
        service: String,
        status: u16,
        body: String,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input: {message}")]
    InputError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Configuration,
    Input,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AdvisorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AdvisorError::ApiError(_) | AdvisorError::GenerationServiceError { .. } => {
                ErrorCategory::Transport
            }
            AdvisorError::MissingConfigError { .. }
            | AdvisorError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            AdvisorError::InputError { .. } => ErrorCategory::Input,
            AdvisorError::CsvError(_) | AdvisorError::SerializationError(_) => {
                ErrorCategory::Processing
            }
            AdvisorError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Processing | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// HTTP 語義的狀態碼，輸入錯誤為 400，其餘為 500
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Input => 400,
            _ => 500,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AdvisorError::ApiError(_) => "Check network connectivity and the API base URL",
            AdvisorError::GenerationServiceError { status, .. } if *status == 401 => {
                "Check that the API key is valid"
            }
            AdvisorError::GenerationServiceError { .. } => {
                "The generation service rejected the request, try again later"
            }
            AdvisorError::MissingConfigError { .. } => {
                "Set the missing variable in the environment or in a .env file"
            }
            AdvisorError::InvalidConfigValueError { .. } => "Review the configuration values",
            AdvisorError::InputError { .. } => "Provide a readable, non-empty menu image",
            AdvisorError::IoError(_) => "Check file paths and permissions",
            AdvisorError::CsvError(_) | AdvisorError::SerializationError(_) => {
                "Re-run with --verbose for details"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Transport => format!("Generation service unavailable: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Bad input: {}", self),
            ErrorCategory::Processing => format!("Menu processing failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
