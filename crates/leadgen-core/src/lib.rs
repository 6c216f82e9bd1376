//! Shared configuration and record types for the lead discovery pipeline.

pub mod app_config;
pub mod config;
pub mod record;

pub use app_config::{ScoringWeights, Settings};
pub use config::{load_settings, load_settings_from_env};
pub use record::{Record, COLUMNS};

use thiserror::Error;

/// Errors raised while building [`Settings`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required variables are absent. All missing names are
    /// reported together so a single run surfaces the full list.
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingEnvVars(Vec<String>),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
