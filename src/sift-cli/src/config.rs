//! Configuration management for sift
//!
//! Configuration comes from, in increasing priority: built-in defaults, the
//! first config file found (`./sift.toml`, `./.sift.toml`, then
//! `<config dir>/sift/sift.toml`), the file named by `--config`, `SIFT_*`
//! environment variables, and finally command-line flags.

use crate::cli::Cli;
use sift_shared::constants::{DEFAULT_MAX_DEPTH, MAX_ALLOWED_DEPTH};
use sift_shared::error::config_error;
use sift_shared::Result;

use serde::{Deserialize, Serialize};

use std::fs;
use std::path::{Path, PathBuf};

/// File names searched in the working directory
const CONFIG_NAMES: [&str; 2] = ["sift.toml", ".sift.toml"];

/// Main configuration structure for the sift CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (`error`, `warn`, `info`, `debug`, `trace`, `off`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    /// Parser configuration
    pub parser: ParserConfig,
    /// Output configuration
    pub output: OutputConfig,
}

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum group nesting depth
    pub max_depth: usize,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Percent-encode canonical filter text
    pub url_encode: bool,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: None,
            parser: ParserConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            url_encode: false,
            pretty: true,
        }
    }
}

impl Config {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a specific file, on top of the defaults
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge_file(path)?;
        Ok(config)
    }

    /// Load configuration from the standard locations, an explicit
    /// `--config` file and the environment
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_layers(Self::find_config_file(None), explicit, |key| {
            std::env::var(key).ok()
        })
    }

    /// Searched file, then explicit file, then environment
    fn load_layers<F>(
        searched: Option<PathBuf>,
        explicit: Option<&Path>,
        env_reader: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        if let Some(config_path) = searched {
            log::debug!("loading config from {}", config_path.display());
            config.merge_file(&config_path)?;
        }

        // 2. The file named on the command line
        if let Some(config_path) = explicit {
            log::debug!("loading config from {}", config_path.display());
            config.merge_file(config_path)?;
        }

        // 3. Apply environment variables
        config.merge_env_with_reader(env_reader)?;

        Ok(config)
    }

    /// Find configuration file in standard locations
    pub(crate) fn find_config_file(current_dir: Option<&Path>) -> Option<PathBuf> {
        let current_dir = match current_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };
        let user_dir = dirs::config_dir().map(|dir| dir.join("sift"));
        find_config_in(&current_dir, user_dir.as_deref())
    }

    /// Merge configuration from a TOML file
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
        if extension != "toml" {
            return Err(config_error(format!(
                "Unsupported config file format: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            config_error(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let file_config: Config = toml::from_str(&content)
            .map_err(|e| config_error(format!("Invalid TOML config: {}", e)))?;
        self.merge(file_config);
        Ok(())
    }

    /// Merge configuration from environment variables with custom reader
    fn merge_env_with_reader<F>(&mut self, env_reader: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // SIFT_URL_ENCODE
        if let Some(val) = env_reader("SIFT_URL_ENCODE") {
            self.output.url_encode = val != "0" && val.to_lowercase() != "false";
        }

        // SIFT_MAX_DEPTH
        if let Some(val) = env_reader("SIFT_MAX_DEPTH") {
            if let Ok(depth) = val.parse() {
                self.parser.max_depth = depth;
            } else {
                log::warn!("ignoring invalid SIFT_MAX_DEPTH value '{}'", val);
                self.parser.max_depth = ParserConfig::default().max_depth;
            }
        }

        // SIFT_LOG
        if let Some(val) = env_reader("SIFT_LOG") {
            self.log_level = Some(val);
        }

        Ok(())
    }

    /// Merge another config into this one; values left at their default do not override
    fn merge(&mut self, other: Config) {
        let defaults = Config::default();

        if other.parser.max_depth != defaults.parser.max_depth {
            self.parser.max_depth = other.parser.max_depth;
        }
        if other.output.url_encode != defaults.output.url_encode {
            self.output.url_encode = other.output.url_encode;
        }
        if other.output.pretty != defaults.output.pretty {
            self.output.pretty = other.output.pretty;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
    }

    /// Apply command-line overrides
    pub fn apply_cli(&mut self, cli: &Cli) -> Result<()> {
        if let Some(max_depth) = cli.max_depth {
            self.parser.max_depth = max_depth;
        }
        validate_config(self)
    }

    /// The configured log level, if any
    pub fn log_level_filter(&self) -> Result<Option<log::LevelFilter>> {
        self.log_level
            .as_deref()
            .map(|level| {
                level
                    .parse::<log::LevelFilter>()
                    .map_err(|_| config_error(format!("Invalid log level: {}", level)))
            })
            .transpose()
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("toml");
        if extension != "toml" {
            return Err(config_error("Unsupported config file format"));
        }

        let content = self.to_toml()?;
        fs::write(path, content)
            .map_err(|e| config_error(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| config_error(format!("Failed to serialize config: {}", e)))
    }
}

fn find_config_in(current_dir: &Path, user_dir: Option<&Path>) -> Option<PathBuf> {
    // Check current directory
    for name in CONFIG_NAMES {
        let path = current_dir.join(name);
        if path.exists() {
            return Some(path);
        }
    }

    // Check the user config directory
    let path = user_dir?.join("sift.toml");
    path.exists().then_some(path)
}

/// Create a default config file
pub fn create_default_config_file(path: &Path) -> Result<()> {
    let config = Config::default();
    config.save(path)?;
    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.parser.max_depth == 0 {
        return Err(config_error("Max depth must be greater than 0"));
    }

    if config.parser.max_depth > MAX_ALLOWED_DEPTH {
        return Err(config_error(format!(
            "Max depth {} exceeds the limit of {}",
            config.parser.max_depth, MAX_ALLOWED_DEPTH
        )));
    }

    config.log_level_filter()?;

    Ok(())
}
