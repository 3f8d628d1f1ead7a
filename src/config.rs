//! Storage-path configuration persisted as a small JSON document.
//!
//! The configuration is replaced as a whole, never field by field: a new
//! pair of paths is normalized, both directories are created, and only
//! then is the JSON written. Any failure leaves the previous configuration
//! in effect.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{SalesError, SalesResult};

pub const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub upload_folder: PathBuf,
    pub output_folder: PathBuf,
}

/// Raw on-disk shape; both fields tolerated as missing or blank.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    upload_folder: Option<String>,
    output_folder: Option<String>,
}

/// Resolves a user-supplied folder value against `base`: blank input maps
/// to the default folder name, relative paths resolve under `base`, and
/// absolute paths pass through.
pub fn normalize_storage_path(value: Option<&str>, base: &Path, fallback: &str) -> PathBuf {
    let cleaned = value.map(str::trim).unwrap_or("");
    if cleaned.is_empty() {
        return base.join(fallback);
    }
    let candidate = Path::new(cleaned);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}

impl StorageConfig {
    pub fn defaults(base: &Path) -> Self {
        Self {
            upload_folder: base.join(DEFAULT_UPLOAD_DIR),
            output_folder: base.join(DEFAULT_OUTPUT_DIR),
        }
    }

    /// Builds a config from operator input, normalizing both paths.
    pub fn from_inputs(upload: Option<&str>, output: Option<&str>, base: &Path) -> Self {
        Self {
            upload_folder: normalize_storage_path(upload, base, DEFAULT_UPLOAD_DIR),
            output_folder: normalize_storage_path(output, base, DEFAULT_OUTPUT_DIR),
        }
    }

    /// Applies a partial update on top of the current configuration:
    /// provided values are normalized, omitted fields keep their current
    /// path. The result still replaces the configuration as a whole.
    pub fn with_updates(&self, upload: Option<&str>, output: Option<&str>, base: &Path) -> Self {
        Self {
            upload_folder: match upload {
                Some(value) => normalize_storage_path(Some(value), base, DEFAULT_UPLOAD_DIR),
                None => self.upload_folder.clone(),
            },
            output_folder: match output {
                Some(value) => normalize_storage_path(Some(value), base, DEFAULT_OUTPUT_DIR),
                None => self.output_folder.clone(),
            },
        }
    }

    /// Loads the persisted configuration, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load(config_path: &Path, base: &Path) -> Self {
        let raw = match fs::read_to_string(config_path) {
            Ok(text) => match serde_json::from_str::<RawConfig>(&text) {
                Ok(raw) => raw,
                Err(err) => {
                    warn!("Ignoring malformed config {config_path:?}: {err}");
                    RawConfig::default()
                }
            },
            Err(_) => return Self::defaults(base),
        };
        Self::from_inputs(raw.upload_folder.as_deref(), raw.output_folder.as_deref(), base)
    }

    /// Creates both directories and persists the JSON. Nothing is written
    /// unless both directories exist afterwards.
    pub fn apply_and_save(&self, config_path: &Path) -> SalesResult<()> {
        self.ensure_directories()?;
        let json = serde_json::to_string_pretty(self)
            .map_err(|err| SalesError::StorageConfigError(err.to_string()))?;
        fs::write(config_path, json)
            .map_err(|err| SalesError::StorageConfigError(err.to_string()))?;
        debug!(
            "Storage paths set to uploads={:?} output={:?}",
            self.upload_folder, self.output_folder
        );
        Ok(())
    }

    /// Re-creates the storage directories if absent.
    pub fn ensure_directories(&self) -> SalesResult<()> {
        for dir in [&self.upload_folder, &self.output_folder] {
            fs::create_dir_all(dir).map_err(|err| {
                SalesError::StorageConfigError(format!("{}: {err}", dir.display()))
            })?;
        }
        Ok(())
    }
}
