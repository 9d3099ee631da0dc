use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolboxError {
    #[error("No eligible participants left to draw from")]
    EmptyPool,

    #[error("At least {required} participants are required for grouping, got {actual}")]
    InsufficientParticipants { required: usize, actual: usize },

    #[error("Group size must be at least 1, got {size}")]
    InvalidGroupSize { size: usize },

    #[error("A draw is already in progress")]
    DrawInProgress,

    #[error("No draw is in progress")]
    NotDrawing,

    #[error("Name generation failed: {message}")]
    Generation { message: String },

    #[error("Saved roster could not be parsed: {message}")]
    PersistenceParse { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Draw,
    Grouping,
    NameGeneration,
    Persistence,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ToolboxError {
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyPool | Self::DrawInProgress | Self::NotDrawing => ErrorCategory::Draw,
            Self::InsufficientParticipants { .. } | Self::InvalidGroupSize { .. } => {
                ErrorCategory::Grouping
            }
            Self::Generation { .. } | Self::ApiError(_) => ErrorCategory::NameGeneration,
            Self::PersistenceParse { .. } | Self::SerializationError(_) => {
                ErrorCategory::Persistence
            }
            Self::CsvError(_) | Self::IoError(_) => ErrorCategory::Io,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Rejected user actions are `Low`; nothing in the engine is fatal.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EmptyPool
            | Self::DrawInProgress
            | Self::NotDrawing
            | Self::InsufficientParticipants { .. }
            | Self::InvalidGroupSize { .. }
            | Self::Generation { .. }
            | Self::PersistenceParse { .. } => ErrorSeverity::Low,
            Self::ApiError(_) => ErrorSeverity::Medium,
            Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
            Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::EmptyPool => {
                "Everyone has already won. Clear the winner history or enable repeat mode."
                    .to_string()
            }
            Self::InsufficientParticipants { required, .. } => {
                format!("Import at least {} participants before grouping.", required)
            }
            Self::InvalidGroupSize { .. } => "Choose a group size of 1 or more.".to_string(),
            Self::DrawInProgress => "Wait for the current draw to finish.".to_string(),
            Self::NotDrawing => "Start a draw before advancing it.".to_string(),
            Self::Generation { .. } | Self::ApiError(_) => {
                "Check the name generator endpoint and API key; default group names are used meanwhile."
                    .to_string()
            }
            Self::PersistenceParse { .. } | Self::SerializationError(_) => {
                "The saved roster is unreadable; re-import the participant list.".to_string()
            }
            Self::CsvError(_) | Self::IoError(_) => {
                "Check that the data directory exists and is writable.".to_string()
            }
            Self::ConfigValidationError { field, .. }
            | Self::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting in the configuration.", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::EmptyPool => "No eligible participants".to_string(),
            Self::InsufficientParticipants { required, actual } => format!(
                "Grouping needs at least {} participants (currently {})",
                required, actual
            ),
            Self::DrawInProgress => "A draw is already running".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolboxError>;
