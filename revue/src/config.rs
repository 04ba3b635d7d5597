//! User configuration for revue.
//!
//! Read from `$XDG_CONFIG_HOME/revue/config.toml` (or `~/.config/revue/config.toml`).
//! Every key is optional; a missing file means all defaults. Command-line flags
//! are applied on top with [`Config::apply_cli`].
//!
//! ```toml
//! theme = "catppuccin-mocha"
//!
//! [intake]
//! max_size_bytes = 5242880
//! extensions = [".rs", ".py"]
//!
//! [analysis]
//! delay_ms = 3000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use revue_core::intake::{IntakePolicy, DEFAULT_EXTENSIONS, DEFAULT_MAX_SIZE_BYTES};

use crate::cli::Cli;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub theme: String,
    pub intake: IntakeConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntakeConfig {
    pub max_size_bytes: u64,
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Simulated latency of the mock analyzer.
    pub delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "catppuccin-mocha".to_owned(),
            intake: IntakeConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_owned()).collect(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { delay_ms: 3000 }
    }
}

impl Config {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML or unknown keys.
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        toml::from_str(raw).context("invalid revue config")
    }

    /// Loads the config at `path`. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read config {}", path.display()))
            }
        };
        Self::from_toml(&raw).with_context(|| format!("in {}", path.display()))
    }

    /// Overrides file values with flags given on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(theme) = &cli.theme {
            self.theme = theme.clone();
        }
        if let Some(max) = cli.max_size {
            self.intake.max_size_bytes = max;
        }
        if let Some(delay) = cli.analysis_delay_ms {
            self.analysis.delay_ms = delay;
        }
    }

    pub fn intake_policy(&self) -> IntakePolicy {
        IntakePolicy {
            max_size_bytes: self.intake.max_size_bytes,
            accepted_extensions: self
                .intake
                .extensions
                .iter()
                .map(|e| normalize_extension(e))
                .collect(),
        }
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis.delay_ms)
    }
}

/// `"RS"` and `".rs"` both become `".rs"`.
fn normalize_extension(ext: &str) -> String {
    let lower = ext.trim().to_ascii_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

/// Base directory from an XDG variable, falling back to `$HOME/<fallback>`.
fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(fallback))
        })
        .unwrap_or_else(|| PathBuf::from(fallback))
}

/// Returns the path to the revue config file.
pub fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config").join("revue").join("config.toml")
}

/// Returns the path to the revue log file.
pub fn log_path() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state").join("revue").join("revue.log")
}
