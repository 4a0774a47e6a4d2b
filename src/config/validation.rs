use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("logs.default_limit must be at least 1")]
    InvalidDefaultLimit,

    #[error("server.max_body_bytes must be positive")]
    InvalidMaxBodyBytes,

    #[error("logs.file_path must name a file, got '{path}'")]
    InvalidLogFilePath { path: String },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_server(config)?;
    validate_logs(config)?;
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    if config.server.max_body_bytes == 0 {
        return Err(ValidationError::InvalidMaxBodyBytes);
    }
    Ok(())
}

fn validate_logs(config: &Config) -> Result<(), ValidationError> {
    if config.logs.default_limit < 1 {
        return Err(ValidationError::InvalidDefaultLimit);
    }

    let path = &config.logs.file_path;
    let raw = path.to_string_lossy();
    if path.file_name().is_none() || raw.ends_with('/') || raw.ends_with('\\') {
        return Err(ValidationError::InvalidLogFilePath {
            path: raw.into_owned(),
        });
    }

    Ok(())
}
