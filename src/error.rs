//! Error types for DietMaster operations.

use std::io;

use crate::db::DbError;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Activity level outside the five recognized multipliers
    #[error("Invalid activity level '{0}' (expected sedentary, lightly active, moderately active, very active or extra active)")]
    InvalidActivityLevel(String),

    #[error("Invalid gender '{0}' (expected male or female)")]
    InvalidGender(String),

    #[error("Invalid unit system '{0}' (expected metric or imperial)")]
    InvalidUnits(String),

    /// Calorie amounts must be finite and non-negative
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("No profile found. Run `dietmaster init` first.")]
    ProfileMissing,

    #[error("A profile already exists. Use `dietmaster update` or `dietmaster reset`.")]
    ProfileExists,

    #[error("Report error: {0}")]
    Report(String),
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Db(DbError::Sqlite(e))
    }
}
