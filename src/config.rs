//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: explicit path, or `$XDG_CONFIG_HOME/orgchart/orgchart.toml`
//! 3. Environment variables: `ORGCHART_*` prefix
//! 4. Command line flags (applied by the CLI layer)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Company name used for the root department when nothing is configured.
pub const DEFAULT_COMPANY_NAME: &str = "TechCorp HQ";

/// Data file used by save/load when nothing is configured.
pub const DEFAULT_DATA_FILE: &str = "org_data.txt";

/// Unified configuration for orgchart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Name of the root department of a new chart
    pub company_name: String,
    /// Chart file used by save, load, show and budget
    pub data_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            company_name: DEFAULT_COMPANY_NAME.into(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

/// Raw settings for intermediate parsing (None means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub company_name: Option<String>,
    pub data_file: Option<PathBuf>,
}

/// Get the XDG config directory for orgchart.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgchart").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgchart.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_file.to_string_lossy().as_ref());
        self.data_file = PathBuf::from(expanded);
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            company_name: overlay
                .company_name
                .clone()
                .unwrap_or_else(|| self.company_name.clone()),
            data_file: overlay
                .data_file
                .clone()
                .unwrap_or_else(|| self.data_file.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit config file; must exist when given. Without
    ///   it the global config file is used if present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Config file
        match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                current = current.merge_with(&load_raw_settings(path)?);
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    if global_path.exists() {
                        current = current.merge_with(&load_raw_settings(&global_path)?);
                    }
                }
            }
        }

        // 3. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply ORGCHART_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("ORGCHART")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("company_name") {
            settings.company_name = val;
        }
        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = PathBuf::from(val);
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_uses_builtin_values() {
        let settings = Settings::default();
        assert_eq!(settings.company_name, "TechCorp HQ");
        assert_eq!(settings.data_file, PathBuf::from("org_data.txt"));
    }

    #[test]
    fn given_tilde_in_data_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            company_name: "HQ".into(),
            data_file: PathBuf::from("~/org.txt"),
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let data_file = settings.data_file.to_string_lossy();
        assert!(
            data_file.starts_with(&home),
            "data_file should start with home dir: {}",
            data_file
        );
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified_fields() {
        let base = Settings::default();
        let overlay = RawSettings {
            company_name: Some("Acme".into()),
            data_file: None,
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.company_name, "Acme");
        assert_eq!(merged.data_file, base.data_file);
    }

    #[test]
    fn given_settings_when_serializing_then_emits_toml_keys() {
        let toml = Settings::default().to_toml().unwrap();
        assert!(toml.contains("company_name = \"TechCorp HQ\""));
        assert!(toml.contains("data_file = \"org_data.txt\""));
    }
}
