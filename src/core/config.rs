//! Configuration module for `delay-atlas`

use crate::core::models::DelayWindow;
use crate::logger::Level;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the config directory inside config values.
const DIR_VARIABLE: &str = "$DELAY_ATLAS";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Input and output locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Flight-delay CSV (headered; `DEPSTN`, `ARRSTN`, `target`, ...)
    #[serde(default)]
    pub flights_file: String,
    /// Airport reference file in the OpenFlights `airports.dat` layout
    #[serde(default)]
    pub airports_file: String,
    /// Directory the chart HTML files are written to
    #[serde(default)]
    pub out_dir: String,
}

/// Delay filter bounds (both exclusive)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Lower bound; records must be strictly above it
    #[serde(default = "default_min_delay")]
    pub min_delay: f64,
    /// Upper bound; records must be strictly below it
    #[serde(default = "default_max_delay")]
    pub max_delay: f64,
}

const fn default_min_delay() -> f64 {
    DelayWindow::DEFAULT.min
}

const fn default_max_delay() -> f64 {
    DelayWindow::DEFAULT.max
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_delay: default_min_delay(),
            max_delay: default_max_delay(),
        }
    }
}

/// Git publishing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Remote name to push to
    #[serde(default)]
    pub remote: String,
    /// Branch name to push to
    #[serde(default)]
    pub branch: String,
    /// Whether charts are committed and pushed after being written
    #[serde(default = "default_push")]
    pub push: bool,
}

const fn default_push() -> bool {
    true
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: String::new(),
            branch: String::new(),
            push: default_push(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Delay filter
    #[serde(default)]
    pub filter: FilterConfig,
    /// Git settings
    #[serde(default)]
    pub git: GitConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override flights CSV path
    pub flights_file: Option<String>,
    /// Override airports file path
    pub airports_file: Option<String>,
    /// Override output directory
    pub out_dir: Option<String>,
    /// Override git remote
    pub remote: Option<String>,
    /// Override git branch
    pub branch: Option<String>,
    /// Override whether to publish
    pub push: Option<bool>,
}

impl Config {
    /// Get the `$DELAY_ATLAS` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/delayatlas`
    /// - macOS: `~/Library/Application Support/delayatlas`
    /// - Windows: `%APPDATA%\delayatlas`
    #[must_use]
    pub fn get_delayatlas_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("delayatlas")
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds.
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_delayatlas_dir().join(CONFIG_FILE_NAME)
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only string fields that are empty here and non-empty in `defaults` are
    /// filled in, so that upgrading the binary adds new settings without
    /// touching existing ones.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let pairs: [(&mut String, &String); 7] = [
            (&mut self.logging.level, &defaults.logging.level),
            (&mut self.logging.file, &defaults.logging.file),
            (&mut self.paths.flights_file, &defaults.paths.flights_file),
            (&mut self.paths.airports_file, &defaults.paths.airports_file),
            (&mut self.paths.out_dir, &defaults.paths.out_dir),
            (&mut self.git.remote, &defaults.git.remote),
            (&mut self.git.branch, &defaults.git.branch),
        ];

        let mut changed = false;
        for (value, default) in pairs {
            if value.is_empty() && !default.is_empty() {
                value.clone_from(default);
                changed = true;
            }
        }
        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides only affect this run; they are never saved. `None` values leave
    /// the loaded setting untouched.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        let strings = [
            (&mut self.logging.level, &overrides.level),
            (&mut self.logging.file, &overrides.file),
            (&mut self.paths.flights_file, &overrides.flights_file),
            (&mut self.paths.airports_file, &overrides.airports_file),
            (&mut self.paths.out_dir, &overrides.out_dir),
            (&mut self.git.remote, &overrides.remote),
            (&mut self.git.branch, &overrides.branch),
        ];
        for (value, replacement) in strings {
            if let Some(replacement) = replacement {
                value.clone_from(replacement);
            }
        }

        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(push) = overrides.push {
            self.git.push = push;
        }
    }

    /// Expand `$DELAY_ATLAS` in a string to the config directory path
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_delayatlas_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing sections and fields fall back to their serde defaults, and
    /// `$DELAY_ATLAS` is expanded in path-like values.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.flights_file = Self::expand_variables(&config.paths.flights_file);
        config.paths.airports_file = Self::expand_variables(&config.paths.airports_file);
        config.paths.out_dir = Self::expand_variables(&config.paths.out_dir);

        Ok(config)
    }

    /// Load configuration from the compiled-in defaults
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The
    /// defaults are compiled into the binary and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from the user config file, creating it on first run
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_file_path())
    }

    /// Load configuration from `config_file`, creating it from defaults when absent
    ///
    /// An existing file gets any newly introduced default fields merged in and is
    /// re-saved when that changed anything.
    #[must_use]
    pub fn load_from(config_file: &Path) -> Self {
        let defaults = Self::from_defaults();

        if !config_file.exists() {
            let _ = defaults.save_to(config_file);
            return defaults;
        }

        match fs::read_to_string(config_file)
            .ok()
            .and_then(|content| Self::from_toml(&content).ok())
        {
            Some(mut config) => {
                if config.merge_defaults(&defaults) {
                    let _ = config.save_to(config_file);
                }
                config
            }
            None => defaults,
        }
    }

    /// Save configuration as pretty TOML to `config_file`
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, the config cannot be
    /// serialized, or the file cannot be written.
    pub fn save_to(&self, config_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `flights_file`,
    /// `airports_file`, `out_dir`, `min_delay`, `max_delay`, `remote`,
    /// `branch`, `push`. Hyphenated spellings are accepted too.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match normalize_key(key).as_str() {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "flights_file" => Some(self.paths.flights_file.clone()),
            "airports_file" => Some(self.paths.airports_file.clone()),
            "out_dir" => Some(self.paths.out_dir.clone()),
            "min_delay" => Some(self.filter.min_delay.to_string()),
            "max_delay" => Some(self.filter.max_delay.to_string()),
            "remote" => Some(self.git.remote.clone()),
            "branch" => Some(self.git.branch.clone()),
            "push" => Some(self.git.push.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Only updates the in-memory config; call [`save_to()`](Config::save_to) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value does not parse
    /// (booleans, delays, log levels).
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match normalize_key(key).as_str() {
            "level" => {
                let level = value.parse::<Level>()?;
                self.logging.level = level.to_string();
            }
            "file" => self.logging.file = value.to_string(),
            "verbose" => self.logging.verbose = parse_bool(key, value)?,
            "flights_file" => self.paths.flights_file = value.to_string(),
            "airports_file" => self.paths.airports_file = value.to_string(),
            "out_dir" => self.paths.out_dir = value.to_string(),
            "min_delay" => self.filter.min_delay = parse_delay(key, value)?,
            "max_delay" => self.filter.max_delay = parse_delay(key, value)?,
            "remote" => self.git.remote = value.to_string(),
            "branch" => self.git.branch = value.to_string(),
            "push" => self.git.push = parse_bool(key, value)?,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to its value in `defaults`)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match normalize_key(key).as_str() {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "flights_file" => self
                .paths
                .flights_file
                .clone_from(&defaults.paths.flights_file),
            "airports_file" => self
                .paths
                .airports_file
                .clone_from(&defaults.paths.airports_file),
            "out_dir" => self.paths.out_dir.clone_from(&defaults.paths.out_dir),
            "min_delay" => self.filter.min_delay = defaults.filter.min_delay,
            "max_delay" => self.filter.max_delay = defaults.filter.max_delay,
            "remote" => self.git.remote.clone_from(&defaults.git.remote),
            "branch" => self.git.branch.clone_from(&defaults.git.branch),
            "push" => self.git.push = defaults.git.push,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Delete the user config file so the next [`load()`](Config::load) recreates it
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }

    /// The delay window configured under `[filter]`
    #[must_use]
    pub const fn delay_window(&self) -> DelayWindow {
        DelayWindow::new(self.filter.min_delay, self.filter.max_delay)
    }

    /// Path of `file_name` inside the configured output directory
    #[must_use]
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        if self.paths.out_dir.is_empty() {
            PathBuf::from(file_name)
        } else {
            PathBuf::from(&self.paths.out_dir).join(file_name)
        }
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('-', "_")
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    value
        .parse::<bool>()
        .map_err(|_| format!("Invalid boolean value for '{key}': '{value}'"))
}

fn parse_delay(key: &str, value: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Invalid number for '{key}': '{value}'"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  flights_file = \"{}\"", self.paths.flights_file)?;
        writeln!(f, "  airports_file = \"{}\"", self.paths.airports_file)?;
        writeln!(f, "  out_dir = \"{}\"", self.paths.out_dir)?;

        writeln!(f, "\n[filter]")?;
        writeln!(f, "  min_delay = {}", self.filter.min_delay)?;
        writeln!(f, "  max_delay = {}", self.filter.max_delay)?;

        writeln!(f, "\n[git]")?;
        writeln!(f, "  remote = \"{}\"", self.git.remote)?;
        writeln!(f, "  branch = \"{}\"", self.git.branch)?;
        writeln!(f, "  push = {}", self.git.push)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        let config = Config::from_defaults();
        assert!(!config.paths.flights_file.is_empty());
        assert!(!config.git.branch.is_empty());
        assert!((config.filter.min_delay - 15.0).abs() < f64::EPSILON);
        assert!((config.filter.max_delay - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hyphenated_keys() {
        let mut config = Config::from_defaults();
        config.set("out-dir", "charts").unwrap();
        assert_eq!(config.get("out_dir").as_deref(), Some("charts"));
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::from_defaults();
        assert!(config.set("push", "maybe").is_err());
        assert!(config.set("min_delay", "soon").is_err());
        assert!(config.set("max_delay", "inf").is_err());
        assert!(config.set("level", "loud").is_err());
        assert!(config.set("nope", "x").is_err());
    }

    #[test]
    fn test_output_path_joins_out_dir() {
        let mut config = Config::from_defaults();
        config.paths.out_dir = "site".to_string();
        assert_eq!(config.output_path("a.html"), PathBuf::from("site/a.html"));
        config.paths.out_dir.clear();
        assert_eq!(config.output_path("a.html"), PathBuf::from("a.html"));
    }
}
