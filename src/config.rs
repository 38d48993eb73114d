//! Transfer configuration.
//!
//! Handles loading, validating and saving the JSON config file. The default
//! location is `ImageTrim.json` in the working directory; the format is the
//! one earlier releases wrote, so existing files keep working.
//!
//! ## Configuration Options
//!
//! ```json
//! {
//!   "SrcDir": "",          // directory to read images from
//!   "DstDir": "",          // directory to write results to
//!   "AllowColor": false,   // false: border is black; true: border is the top-left pixel color
//!   "Threshold": 20,       // color distance tolerance, clamped to 0-200
//!   "WindowWidth": 800,    // kept for compatibility with the desktop build
//!   "WindowHeight": 600,
//!   "MaxProcesses": 1      // parallel workers; null = one per CPU core
//! }
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: keys that are absent keep their defaults. Unknown
//! keys are rejected to catch typos early.

use crate::imaging::{BorderColor, Threshold};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// File name used when no `--config` path is given.
pub const DEFAULT_CONFIG_FILE: &str = "ImageTrim.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "PascalCase")]
pub struct AppConfig {
    pub src_dir: String,
    pub dst_dir: String,
    /// Use the top-left pixel color as border color instead of black.
    pub allow_color: bool,
    /// Raw threshold as typed by the user; see [`AppConfig::threshold`].
    pub threshold: i32,
    pub window_width: u32,
    pub window_height: u32,
    /// Maximum number of parallel workers.
    /// `null` means one per CPU core; values above the core count are clamped.
    pub max_processes: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            src_dir: String::new(),
            dst_dir: String::new(),
            allow_color: false,
            threshold: 20,
            window_width: 800,
            window_height: 600,
            max_processes: Some(1),
        }
    }
}

impl AppConfig {
    /// Check that a transfer can start: both directories set and distinct.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.src_dir.is_empty() {
            return Err(ConfigError::Validation("SrcDir must not be empty".into()));
        }
        if self.dst_dir.is_empty() {
            return Err(ConfigError::Validation("DstDir must not be empty".into()));
        }
        if same_directory(Path::new(&self.src_dir), Path::new(&self.dst_dir)) {
            return Err(ConfigError::Validation(
                "SrcDir and DstDir must be different directories".into(),
            ));
        }
        Ok(())
    }

    /// Threshold clamped to the valid 0-200 range.
    pub fn threshold(&self) -> Threshold {
        Threshold::new(self.threshold)
    }

    pub fn border_color(&self) -> BorderColor {
        BorderColor::from_allow_color(self.allow_color)
    }

    /// Store the clamped threshold back into the raw field.
    pub fn clamp_threshold(&mut self) {
        self.threshold = self.threshold().value() as i32;
    }

    /// Apply per-run overrides on top of the loaded file.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(dir) = &overrides.src_dir {
            self.src_dir = dir.clone();
        }
        if let Some(dir) = &overrides.dst_dir {
            self.dst_dir = dir.clone();
        }
        if let Some(t) = overrides.threshold {
            self.threshold = t;
            self.clamp_threshold();
        }
        if let Some(allow) = overrides.allow_color {
            self.allow_color = allow;
        }
        if let Some(max) = overrides.max_processes {
            self.max_processes = max;
        }
    }
}

/// Values given on the command line. `None` keeps the file's value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub src_dir: Option<String>,
    pub dst_dir: Option<String>,
    pub threshold: Option<i32>,
    pub allow_color: Option<bool>,
    /// `Some(None)` selects one worker per core.
    pub max_processes: Option<Option<usize>>,
}

/// Absolute form of `path` with symlinks and `.`/`..` resolved.
///
/// Paths that do not exist yet are made absolute and normalized lexically.
fn resolve_dir(path: &Path) -> PathBuf {
    if let Ok(real) = path.canonicalize() {
        return real;
    }
    let absolute = std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf());
    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    resolved
}

/// Whether two paths name the same directory.
pub fn same_directory(a: &Path, b: &Path) -> bool {
    resolve_dir(a) == resolve_dir(b)
}

/// Resolve the effective worker count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1 (user can constrain down, not up)
pub fn effective_threads(config: &AppConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and saving
// =============================================================================

/// Returns the default config as a JSON object.
///
/// Used as the base layer for merging a user file on top.
pub fn defaults_value() -> serde_json::Value {
    serde_json::to_value(AppConfig::default()).unwrap_or_default()
}

/// Merge the top-level keys of `overlay` over `base`.
///
/// The config is flat, so overlay values replace base values whole. Keys in
/// base that are not in overlay are preserved.
pub fn merge_json(base: serde_json::Value, overlay: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            base_map.extend(overlay_map);
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw JSON value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<serde_json::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value = serde_json::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value and deserialize.
///
/// The threshold is clamped here so a loaded config never carries an
/// out-of-range value.
pub fn resolve_config(
    base: serde_json::Value,
    overlay: Option<serde_json::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_json(base, ov),
        None => base,
    };
    let mut config: AppConfig = serde_json::from_value(merged)?;
    config.clamp_threshold();
    Ok(config)
}

/// Load config from `path`, falling back to defaults when the file is absent.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    resolve_config(defaults_value(), overlay)
}

/// Write `config` to `path` as pretty-printed JSON.
pub fn save_config(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

/// Pretty-printed default config, used by the `gen-config` command.
pub fn stock_config_json() -> String {
    serde_json::to_string_pretty(&AppConfig::default()).unwrap_or_default()
}
