// src/auth.rs
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Vault is locked, try again in {seconds}s")]
    LockedOut { seconds: i64 },

    #[error("Invalid PIN, {attempts_remaining} attempts remaining")]
    InvalidPin { attempts_remaining: u32 },

    #[error("Corrupt auth state: {0}")]
    InvalidState(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

/// The PIN a fresh vault starts with. Demo-grade on purpose; the gate
/// exists to stop shoulder-surfing, not attackers.
pub const DEFAULT_PIN: &str = "445566";

const AUTH_FILE: &str = "auth.json";

#[derive(Debug, Serialize, Deserialize)]
struct AuthState {
    pin_hash: String,
    failed_attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    locked_until: Option<String>,
}

/// PIN gate persisted in `auth.json` next to the vault file: a SHA-256
/// hash of the PIN, the failed-attempt counter, and an optional lockout
/// expiry timestamp.
pub struct AuthManager {
    auth_path: PathBuf,
    max_attempts: u32,
    lockout: Duration,
}

impl AuthManager {
    pub fn new(data_dir: &Path, max_attempts: u32, lockout_minutes: u64) -> Result<Self> {
        if !data_dir.exists() {
            fs::create_dir_all(data_dir)?;
        }
        Ok(Self {
            auth_path: data_dir.join(AUTH_FILE),
            max_attempts,
            lockout: Duration::minutes(lockout_minutes as i64),
        })
    }

    /// Check a PIN against the stored hash, enforcing the lockout policy.
    ///
    /// While a lockout is active every call fails with [`AuthError::LockedOut`]
    /// without touching the counter. A wrong PIN increments the counter; at
    /// `max_attempts` a lockout starts and the counter resets, so the full
    /// allowance is available once it expires.
    pub fn verify_pin(&self, pin: &str) -> Result<()> {
        let mut state = self.load_state()?;

        if let Some(until) = state.locked_until.as_deref() {
            let until = parse_timestamp(until)?;
            let now = Utc::now();
            if now < until {
                return Err(AuthError::LockedOut {
                    seconds: (until - now).num_seconds().max(1),
                });
            }
            state.locked_until = None;
            state.failed_attempts = 0;
        }

        if hash_pin(pin) == state.pin_hash {
            state.failed_attempts = 0;
            state.locked_until = None;
            self.save_state(&state)?;
            return Ok(());
        }

        state.failed_attempts += 1;
        if state.failed_attempts >= self.max_attempts {
            state.locked_until = Some((Utc::now() + self.lockout).to_rfc3339());
            state.failed_attempts = 0;
            self.save_state(&state)?;
            warn!(
                "Too many failed PIN attempts, locked for {}s",
                self.lockout.num_seconds()
            );
            return Err(AuthError::LockedOut {
                seconds: self.lockout.num_seconds(),
            });
        }

        let attempts_remaining = self.max_attempts - state.failed_attempts;
        self.save_state(&state)?;
        Err(AuthError::InvalidPin { attempts_remaining })
    }

    /// Replace the stored PIN after verifying the current one.
    pub fn change_pin(&self, current: &str, new_pin: &str) -> Result<()> {
        self.verify_pin(current)?;
        let mut state = self.load_state()?;
        state.pin_hash = hash_pin(new_pin);
        self.save_state(&state)
    }

    /// True while the vault still uses the factory PIN.
    pub fn uses_default_pin(&self) -> Result<bool> {
        Ok(self.load_state()?.pin_hash == hash_pin(DEFAULT_PIN))
    }

    fn load_state(&self) -> Result<AuthState> {
        if !self.auth_path.exists() {
            warn!("No auth state found, initializing with the default PIN; change it with set-pin");
            let state = AuthState {
                pin_hash: hash_pin(DEFAULT_PIN),
                failed_attempts: 0,
                locked_until: None,
            };
            self.save_state(&state)?;
            return Ok(state);
        }
        let content = fs::read_to_string(&self.auth_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save_state(&self, state: &AuthState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.auth_path, json)?;
        Ok(())
    }
}

fn hash_pin(pin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pin.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AuthError::InvalidState(format!("bad lockout timestamp: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(dir: &TempDir) -> AuthManager {
        AuthManager::new(dir.path(), 3, 5).unwrap()
    }

    #[test]
    fn first_run_accepts_default_pin() {
        let dir = TempDir::new().unwrap();
        let auth = manager(&dir);
        auth.verify_pin(DEFAULT_PIN).unwrap();
        assert!(dir.path().join("auth.json").exists());
        assert!(auth.uses_default_pin().unwrap());
    }

    #[test]
    fn wrong_pin_counts_down_then_locks() {
        let dir = TempDir::new().unwrap();
        let auth = manager(&dir);

        match auth.verify_pin("000000").unwrap_err() {
            AuthError::InvalidPin { attempts_remaining } => assert_eq!(attempts_remaining, 2),
            other => panic!("unexpected error: {other:?}"),
        }
        match auth.verify_pin("000000").unwrap_err() {
            AuthError::InvalidPin { attempts_remaining } => assert_eq!(attempts_remaining, 1),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            auth.verify_pin("000000").unwrap_err(),
            AuthError::LockedOut { .. }
        ));

        // Even the right PIN is refused while locked.
        assert!(matches!(
            auth.verify_pin(DEFAULT_PIN).unwrap_err(),
            AuthError::LockedOut { .. }
        ));
    }

    #[test]
    fn expired_lockout_clears_and_allows_login() {
        let dir = TempDir::new().unwrap();
        let auth = manager(&dir);
        let state = AuthState {
            pin_hash: hash_pin(DEFAULT_PIN),
            failed_attempts: 0,
            locked_until: Some((Utc::now() - Duration::minutes(1)).to_rfc3339()),
        };
        auth.save_state(&state).unwrap();

        auth.verify_pin(DEFAULT_PIN).unwrap();
    }

    #[test]
    fn change_pin_requires_current_pin() {
        let dir = TempDir::new().unwrap();
        let auth = manager(&dir);

        assert!(auth.change_pin("999999", "123456").is_err());
        auth.verify_pin(DEFAULT_PIN).unwrap();

        auth.change_pin(DEFAULT_PIN, "123456").unwrap();
        assert!(!auth.uses_default_pin().unwrap());
        auth.verify_pin("123456").unwrap();
        assert!(matches!(
            auth.verify_pin(DEFAULT_PIN).unwrap_err(),
            AuthError::InvalidPin { .. }
        ));
    }

    #[test]
    fn corrupt_lockout_timestamp_reports_invalid_state() {
        let dir = TempDir::new().unwrap();
        let auth = manager(&dir);
        let state = AuthState {
            pin_hash: hash_pin(DEFAULT_PIN),
            failed_attempts: 0,
            locked_until: Some("not a timestamp".into()),
        };
        auth.save_state(&state).unwrap();

        assert!(matches!(
            auth.verify_pin(DEFAULT_PIN).unwrap_err(),
            AuthError::InvalidState(_)
        ));
    }
}
