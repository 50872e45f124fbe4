//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment could not merge or extract a layer. Boxed, the figment error is large.
    #[error("Configuration error: {0}")]
    Figment(Box<figment::Error>),

    /// A section needed by the requested operation is missing required fields.
    #[error("Configuration section '{section}' is not configured (missing required fields)")]
    NotConfigured { section: String },

    /// A field parsed but holds a value that cannot work.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        Self::Figment(Box::new(error))
    }
}
