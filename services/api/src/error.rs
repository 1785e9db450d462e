//! services/api/src/error.rs
//!
//! Defines the startup error type for the API service. Request-time failures
//! go through `web::reject` instead.

use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn startup() -> Result<Config, ApiError> {
        Ok(Config::from_source(|_| None)?)
    }

    #[test]
    fn missing_database_url_surfaces_as_config_error() {
        let err = startup().unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::MissingVar(ref var)) if var == "DATABASE_URL"));
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn bind_failures_surface_as_io_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err: ApiError = io.into();
        assert_eq!(err.to_string(), "IO error: port taken");
    }
}
