use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Save interval is not 0
/// - Video directory and backup path are set
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.library.save_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "library.save_interval_secs cannot be 0".to_string(),
        ));
    }

    if config.library.video_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "library.video_dir cannot be empty".to_string(),
        ));
    }

    if config.library.backup_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "library.backup_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
