//! Rule configuration files.
//!
//! Rules can be kept in a TOML file so the same reorganization can be run
//! repeatedly. Rules are applied in file order.
//!
//! # Configuration File Format
//!
//! ```toml
//! [[rules]]
//! condition_type = "extension"
//! condition_value = "pdf"
//! destination_folder = "Documents"
//!
//! [[rules]]
//! condition_type = "name_contains"
//! condition_value = "invoice"
//! destination_folder = "Invoices"
//! ```

use crate::contract::is_bare_folder_name;
use crate::rules::{ConditionType, Rule};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading rules.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// A rule is well-formed TOML but unusable.
    InvalidRule {
        /// 1-based position of the rule.
        position: usize,
        /// Why the rule was rejected.
        reason: String,
    },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidRule { position, reason } => {
                write!(f, "Invalid rule #{}: {}", position, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Ordered rules loaded from a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl RulesConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.cluttercutrc.toml` in the current directory
    /// 3. Look for `~/.config/cluttercut/config.toml` in home directory
    /// 4. Fall back to an empty rule list
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read, or if any discovered file is invalid.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".cluttercutrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("cluttercut")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::InvalidRule` if a destination is a path.
    /// Returns `ConfigError::IoError` if file cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config = Self::from_toml(&content)?;
        log::debug!(
            "Loaded {} rule(s) from {}",
            config.rules.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parses and validates configuration text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects destinations that are paths instead of bare folder names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, rule) in self.rules.iter().enumerate() {
            if !is_bare_folder_name(&rule.destination_folder) {
                return Err(ConfigError::InvalidRule {
                    position: index + 1,
                    reason: format!(
                        "destination '{}' must be a visible folder name, not a path",
                        rule.destination_folder
                    ),
                });
            }
        }
        Ok(())
    }

    /// Appends rules given on the command line after the configured ones.
    pub fn extend_from_specs<'a, I>(&mut self, specs: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for spec in specs {
            let position = self.rules.len() + 1;
            let rule = parse_rule_spec(spec)
                .map_err(|reason| ConfigError::InvalidRule { position, reason })?;
            self.rules.push(rule);
        }
        self.validate()
    }
}

/// Parses a `KIND:VALUE=FOLDER` rule, e.g. `ext:pdf=Documents`.
pub fn parse_rule_spec(spec: &str) -> Result<Rule, String> {
    let (kind, rest) = spec
        .split_once(':')
        .ok_or_else(|| format!("'{}' is not of the form KIND:VALUE=FOLDER", spec))?;
    let condition_type = ConditionType::parse(kind)
        .ok_or_else(|| format!("unknown condition '{}' (use ext or name)", kind))?;
    let (value, folder) = rest
        .rsplit_once('=')
        .ok_or_else(|| format!("'{}' is missing '=FOLDER'", spec))?;

    if folder.trim().is_empty() {
        return Err(format!("'{}' has an empty destination folder", spec));
    }

    Ok(Rule::new(condition_type, value, folder.trim()))
}
