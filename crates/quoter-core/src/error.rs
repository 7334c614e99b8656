//! Error types for the quoting engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// One or more required profile fields were absent. Validation
    /// collects every missing field before failing so the caller can
    /// fix a request in one round trip.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// A categorical value was never observed when the encoder tables
    /// were built. User-correctable; names the offending field and value.
    #[error("unknown value {value:?} for field {field:?}")]
    UnknownCategory { field: String, value: String },

    /// A field was present but outside its valid range.
    #[error("invalid value for field {field:?}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Feature vector length disagrees with an artifact's expected
    /// length. Indicates a builder/model version skew, never user input.
    #[error("feature vector length {actual} does not match expected length {expected}")]
    SchemaMismatch { expected: usize, actual: usize },

    /// A model/encoder/dataset artifact failed to load at startup.
    /// The engine refuses to serve rather than run on partial state.
    #[error("failed to load artifact {path}: {reason}")]
    ArtifactLoad { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    /// Whether this error was caused by bad client input (fixable by
    /// the caller) as opposed to a broken deployment.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::MissingFields(_) | Error::UnknownCategory { .. } | Error::InvalidField { .. }
        )
    }

    /// Wrap a lower-level failure with the artifact path it came from.
    pub(crate) fn artifact(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Error::ArtifactLoad {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
