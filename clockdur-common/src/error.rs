use std::path::PathBuf;
use thiserror::Error;

use crate::field::Field;
use crate::unit::StoreAs;

/// Main error type for clockdur operations
#[derive(Error, Debug)]
pub enum ClockdurError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),
}

/// Configuration-related errors, raised once when a converter is built
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {path:?}")]
    FileRead { path: PathBuf, source: std::io::Error },

    #[error("Failed to parse TOML configuration: {message}")]
    TomlParse { message: String },

    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Cannot display seconds when duration is stored as {store_as}")]
    DisplaySecondsRequiresSeconds { store_as: StoreAs },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },

    #[error("No [fields.{name}] section in the configuration")]
    UnknownField { name: String },

    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Per-call conversion errors. Always recoverable by the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("not a non-negative integer: {value:?}")]
    NotAnInteger { value: String },

    #[error("negative duration: {value}")]
    Negative { value: i64 },

    #[error("expected 2 or 3 colon-separated fields, got {count}")]
    PieceCount { count: usize },

    #[error("{field} field is empty")]
    EmptyPiece { field: Field },

    #[error("{field} field is not a decimal number: {piece:?}")]
    NotDecimal { field: Field, piece: String },

    #[error("{field} field out of range: {value} (max: {max})")]
    OutOfRange { field: Field, value: u64, max: u64 },

    #[error("duration does not fit in the stored integer range")]
    Overflow,
}

// Convenience type alias
pub type Result<T> = std::result::Result<T, ClockdurError>;

impl From<toml::de::Error> for ClockdurError {
    fn from(err: toml::de::Error) -> Self {
        ClockdurError::InvalidConfiguration(ConfigError::TomlParse {
            message: err.to_string(),
        })
    }
}

impl ClockdurError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ClockdurError::InvalidInput(_))
    }

    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, ClockdurError::InvalidConfiguration(_))
    }

    /// Configuration failures stop the host; bad input is routine.
    pub fn log_level(&self) -> log::Level {
        match self {
            ClockdurError::InvalidConfiguration(_) => log::Level::Error,
            ClockdurError::InvalidInput(_) => log::Level::Debug,
        }
    }
}

// Error reporting utilities
pub trait ErrorReporting {
    fn log_error(&self, context: &str);
    fn user_friendly_message(&self) -> String;
}

impl ErrorReporting for ClockdurError {
    fn log_error(&self, context: &str) {
        log::log!(self.log_level(), "{}: {:?}", context, self);
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ClockdurError::InvalidConfiguration(ConfigError::FileRead { path, .. }) => {
                format!("Configuration file not found: {:?}", path)
            }
            ClockdurError::InvalidConfiguration(ConfigError::TomlParse { message }) => {
                format!("Invalid configuration format: {}", message)
            }
            ClockdurError::InvalidConfiguration(ConfigError::DisplaySecondsRequiresSeconds { .. }) => {
                "display_seconds can only be enabled when store_as = \"seconds\"".to_string()
            }
            ClockdurError::InvalidInput(InputError::OutOfRange { field, max, .. }) => {
                format!("Please enter {} between 00 and {:02}", field, max)
            }
            ClockdurError::InvalidInput(InputError::NotAnInteger { .. }) => {
                "Stored duration must be a non-negative whole number".to_string()
            }
            ClockdurError::InvalidInput(InputError::Negative { .. }) => {
                "Durations cannot be negative".to_string()
            }
            ClockdurError::InvalidInput(InputError::Overflow) => {
                "Duration is too long".to_string()
            }
            ClockdurError::InvalidInput(_) => {
                "Please enter a duration as HH:MM or HH:MM:SS".to_string()
            }
            _ => self.to_string(),
        }
    }
}
