use thiserror::Error;

#[derive(Error, Debug)]
pub enum FortuneError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid birth input '{field}': {message}")]
    ValidationError { field: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Language model API returned {status}: {body}")]
    LlmApiError { status: u16, body: String },

    #[error("Malformed response from {service}: {message}")]
    MalformedResponseError { service: String, message: String },

    #[error("Ephemeris kernel error: {message}")]
    KernelError { message: String },

    #[error("No ephemeris segment for target {target} relative to center {center}")]
    SegmentNotFound { target: i32, center: i32 },

    #[error("Epoch {epoch_tdb_s} s outside segment coverage for target {target}")]
    EpochOutOfRange { target: i32, epoch_tdb_s: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Network,
    LanguageModel,
    Ephemeris,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FortuneError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn kernel(message: impl Into<String>) -> Self {
        Self::KernelError {
            message: message.into(),
        }
    }

    pub fn malformed(service: &str, message: impl Into<String>) -> Self {
        Self::MalformedResponseError {
            service: service.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } => ErrorCategory::Input,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::HttpError(_) => ErrorCategory::Network,
            Self::LlmApiError { .. } | Self::MalformedResponseError { .. } => {
                ErrorCategory::LanguageModel
            }
            Self::KernelError { .. } | Self::SegmentNotFound { .. } | Self::EpochOutOfRange { .. } => {
                ErrorCategory::Ephemeris
            }
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ValidationError { .. } => ErrorSeverity::High,
            Self::HttpError(_) | Self::LlmApiError { .. } => ErrorSeverity::Medium,
            Self::MalformedResponseError { .. } => ErrorSeverity::High,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
            Self::KernelError { .. } | Self::SegmentNotFound { .. } | Self::EpochOutOfRange { .. } => {
                ErrorSeverity::Critical
            }
            Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { field, message } => {
                format!("Invalid date or input ({}): {}", field, message)
            }
            Self::MissingConfigError { field } => {
                format!("Required setting '{}' is not configured", field)
            }
            Self::LlmApiError { status, .. } => {
                format!("The fortune service rejected the request (HTTP {})", status)
            }
            Self::HttpError(_) => "A network request failed".to_string(),
            Self::KernelError { .. } | Self::SegmentNotFound { .. } | Self::EpochOutOfRange { .. } => {
                format!("Planet positions could not be computed: {}", self)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check the birth date; the day must exist in the given month",
            ErrorCategory::Configuration => {
                "Check astro-fortune.toml and make sure OPENAI_API_KEY is set"
            }
            ErrorCategory::Network => "Check the network connection and try again",
            ErrorCategory::LanguageModel => {
                "Check the API key, account quota and the configured model name"
            }
            ErrorCategory::Ephemeris => {
                "Make sure the ephemeris file (de421.bsp) exists or configure ephemeris.download_url"
            }
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, FortuneError>;
