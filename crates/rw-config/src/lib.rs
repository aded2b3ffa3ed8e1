//! Configuration management for RW.
//!
//! Parses `rw.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [parser]
//! max_nested_level = 6
//!
//! [plugins]
//! tables = true
//! directives = ["fenced", "rst"]
//! admonitions = true
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override directive nesting limit.
    pub max_nested_level: Option<usize>,
    /// Override table plugin flag.
    pub tables: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "rw.toml";

/// Default directive nesting limit, shared with the block parser.
pub use rw_blocks::DEFAULT_MAX_NESTED_LEVEL;

/// Largest accepted `parser.max_nested_level`.
pub const MAX_NESTED_LEVEL_LIMIT: usize = 64;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Block parser configuration.
    pub parser: ParserConfig,
    /// Plugin selection.
    pub plugins: PluginsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Block parser configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum directive nesting level (default: 6).
    pub max_nested_level: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_nested_level: DEFAULT_MAX_NESTED_LEVEL,
        }
    }
}

/// Plugin selection.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    /// Enable pipe tables (default: true).
    pub tables: bool,
    /// Directive syntaxes to enable (default: fenced and rst).
    pub directives: Vec<DirectiveSyntaxKind>,
    /// Register admonition directives on every enabled syntax (default: true).
    pub admonitions: bool,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            tables: true,
            directives: vec![DirectiveSyntaxKind::Fenced, DirectiveSyntaxKind::Rst],
            admonitions: true,
        }
    }
}

/// Directive syntax variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectiveSyntaxKind {
    /// `:::{name}` fences.
    Fenced,
    /// `.. name::` blocks.
    Rst,
}

impl DirectiveSyntaxKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fenced => "fenced",
            Self::Rst => "rst",
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `rw.toml` in current directory and parents,
    /// falling back to defaults.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values. The result is validated last.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final values are invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(level) = settings.max_nested_level {
            self.parser.max_nested_level = level;
        }
        if let Some(tables) = settings.tables {
            self.plugins.tables = tables;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        Self::discover_from(&std::env::current_dir().ok()?)
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_parser()?;
        self.validate_plugins()?;
        Ok(())
    }

    fn validate_parser(&self) -> Result<(), ConfigError> {
        let level = self.parser.max_nested_level;
        if !(1..=MAX_NESTED_LEVEL_LIMIT).contains(&level) {
            return Err(ConfigError::Validation(format!(
                "parser.max_nested_level must be between 1 and {MAX_NESTED_LEVEL_LIMIT}, got {level}"
            )));
        }
        Ok(())
    }

    fn validate_plugins(&self) -> Result<(), ConfigError> {
        let directives = &self.plugins.directives;
        for (i, kind) in directives.iter().enumerate() {
            if directives[..i].contains(kind) {
                return Err(ConfigError::Validation(format!(
                    "plugins.directives lists `{}` more than once",
                    kind.as_str()
                )));
            }
        }
        Ok(())
    }
}
