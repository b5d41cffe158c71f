use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required field: {field}")]
    MissingConfigError { field: String },

    #[error("Card rule '{network}' is malformed: {reason}")]
    RuleTableError { network: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Output,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CardError::ConfigError { .. }
            | CardError::InvalidConfigValueError { .. }
            | CardError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CardError::CsvError(_) => ErrorCategory::Input,
            CardError::IoError(_) | CardError::SerializationError(_) => ErrorCategory::Output,
            CardError::RuleTableError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Output => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// Process exit code by severity. 0 and 1 are left to valid/invalid verdicts.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 3,
            ErrorSeverity::Critical => 4,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CardError::IoError(_) => {
                "Check that the file exists and that the output directory is writable".to_string()
            }
            CardError::CsvError(_) => {
                "Check the CSV delimiter and header settings in the [batch] section".to_string()
            }
            CardError::SerializationError(_) => "Retry with --format text".to_string(),
            CardError::ConfigError { .. } => "Make sure the config file is valid TOML".to_string(),
            CardError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' in the config file", field)
            }
            CardError::MissingConfigError { field } => {
                format!("Add '{}' to the input or the config file", field)
            }
            CardError::RuleTableError { .. } => {
                "The built-in card table is broken; please report a bug".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CardError::IoError(e) => format!("Could not read or write a file: {}", e),
            CardError::CsvError(e) => format!("The batch input is not valid CSV: {}", e),
            CardError::SerializationError(e) => format!("Could not render the report: {}", e),
            CardError::ConfigError { message } => format!("Configuration problem: {}", message),
            CardError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            CardError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            CardError::RuleTableError { network, reason } => {
                format!("Internal card table error for '{}': {}", network, reason)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CardError>;
