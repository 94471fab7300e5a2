//! Unified error types and result handling for `VoiceBuddy`.
//!
//! Every fallible function in the crate returns [`Result`], so persistence,
//! configuration, and Discord failures all flow through one [`Error`] enum.

use thiserror::Error;

/// Unified error type for all `VoiceBuddy` operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or validation failed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable missing or invalid
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// A warning id was referenced that does not exist
    #[error("No warning found with id {id}")]
    WarningNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// String formatting failed while building a reply
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Discord framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
