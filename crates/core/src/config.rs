//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the store. Request handling never reads process-wide environment variables.

use crate::{StoreError, StoreResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct CoreConfig {
    data_dir: Option<PathBuf>,
    seed_defaults: bool,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `data_dir` selects the on-disk document store; `None` keeps every collection in memory
    /// for the lifetime of the process.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if `data_dir` exists but is not a directory.
    pub fn new(data_dir: Option<PathBuf>, seed_defaults: bool) -> StoreResult<Self> {
        if let Some(dir) = &data_dir {
            if dir.as_os_str().is_empty() {
                return Err(StoreError::InvalidConfig(
                    "data directory cannot be empty".into(),
                ));
            }
            if dir.exists() && !dir.is_dir() {
                return Err(StoreError::InvalidConfig(format!(
                    "data directory {} is not a directory",
                    dir.display()
                )));
            }
        }

        Ok(Self {
            data_dir,
            seed_defaults,
        })
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    pub fn seed_defaults(&self) -> bool {
        self.seed_defaults
    }
}

/// Parse the data directory from an optional environment value.
///
/// Missing or whitespace-only values select the in-memory store.
pub fn data_dir_from_env_value(value: Option<String>) -> Option<PathBuf> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Parse the seed flag from an optional environment value.
///
/// Accepts `true/false`, `1/0` and `yes/no` in any case. Missing or empty values mean `false`.
///
/// # Errors
///
/// Returns [`StoreError::InvalidConfig`] for any other value.
pub fn seed_flag_from_env_value(value: Option<String>) -> StoreResult<bool> {
    let Some(value) = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty())
    else {
        return Ok(false);
    };

    match value.as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(StoreError::InvalidConfig(format!(
            "invalid seed flag {other:?} (expected true/false)"
        ))),
    }
}
