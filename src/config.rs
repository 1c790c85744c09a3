// src/config.rs
use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;
use log::LevelFilter;

// Runtime settings for the vault, defaults overridable per environment
#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub data_dir: PathBuf,

    // PIN gate
    pub max_pin_attempts: u32,
    pub lockout_minutes: u64,
    pub session_timeout_minutes: u64,

    // Logging
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_pin_attempts: 3,
            lockout_minutes: 5,
            session_timeout_minutes: 30,
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    // Load configuration from environment variables
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Ok(dir) = env::var("AIVAULT_DATA_DIR") {
            if !dir.trim().is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }

        if let Ok(val) = env::var("AIVAULT_MAX_PIN_ATTEMPTS") {
            if let Ok(attempts) = val.parse() {
                config.max_pin_attempts = attempts;
            }
        }

        if let Ok(val) = env::var("AIVAULT_LOCKOUT_MINUTES") {
            if let Ok(minutes) = val.parse() {
                config.lockout_minutes = minutes;
            }
        }

        if let Ok(val) = env::var("AIVAULT_SESSION_TIMEOUT_MINUTES") {
            if let Ok(minutes) = val.parse() {
                config.session_timeout_minutes = minutes;
            }
        }

        if let Ok(level) = env::var("AIVAULT_LOG_LEVEL") {
            match level.to_lowercase().as_str() {
                "error" => config.log_level = LevelFilter::Error,
                "warn" => config.log_level = LevelFilter::Warn,
                "info" => config.log_level = LevelFilter::Info,
                "debug" => config.log_level = LevelFilter::Debug,
                "trace" => config.log_level = LevelFilter::Trace,
                _ => {}
            }
        }

        config
    }
}

// Per-user data directory, falling back to ./data when the platform
// directories cannot be resolved
fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "aivault", "aivault")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_policy() {
        let config = Config::default();
        assert_eq!(config.max_pin_attempts, 3);
        assert_eq!(config.lockout_minutes, 5);
        assert_eq!(config.session_timeout_minutes, 30);
        assert_eq!(config.log_level, LevelFilter::Info);
    }
}
