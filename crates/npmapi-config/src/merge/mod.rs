//! Configuration layering, fallback logic, and environment overrides

use std::collections::HashMap;
use camino::{Utf8Path, Utf8PathBuf};
use npmapi_core::error::NpmError;
use crate::{ConfigResult, toml::ApiToml};

/// File name looked up from the working directory upwards
pub const PROJECT_CONFIG_FILE: &str = "npmapi.toml";

/// Prefix of recognized environment variables
pub const ENV_PREFIX: &str = "NPMAPI_";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
    /// Home directory holding `.npmapi/config.toml`
    home: Option<Utf8PathBuf>,
}

/// Configuration layering and merging
pub struct ConfigLayering;

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Built-in defaults, no file found
    Default,
    /// Global config file
    Global(Utf8PathBuf),
    /// Project npmapi.toml file
    Project(Utf8PathBuf),
}

impl ConfigLoader {
    /// Create a new configuration loader using the user's home directory
    pub fn new(cwd: Utf8PathBuf) -> Self {
        let home = dirs::home_dir().and_then(|dir| Utf8PathBuf::try_from(dir).ok());
        Self { cwd, home }
    }

    /// Create a loader with an explicit home directory
    pub fn with_home(cwd: Utf8PathBuf, home: Utf8PathBuf) -> Self {
        Self { cwd, home: Some(home) }
    }

    /// Load the effective configuration.
    ///
    /// The project file replaces the global file; environment variables and
    /// then command-line overrides are applied on top.
    pub async fn load(
        &self,
        env_overrides: &HashMap<String, String>,
        cli_overrides: &HashMap<String, String>,
    ) -> ConfigResult<(ApiToml, ConfigSource)> {
        let project = self.load_project_config().await?;
        let global = match project {
            Some(_) => None,
            None => self.load_global_config().await?,
        };

        let source = match (&project, &global) {
            (Some((_, path)), _) => ConfigSource::Project(path.clone()),
            (None, Some((_, path))) => ConfigSource::Global(path.clone()),
            (None, None) => ConfigSource::Default,
        };

        let config = ConfigLayering::merge_configs(
            global.map(|(config, _)| config),
            project.map(|(config, _)| config),
            env_overrides,
            cli_overrides,
        )?;

        Ok((config, source))
    }

    /// Load the nearest project configuration, if any
    pub async fn load_project_config(&self) -> ConfigResult<Option<(ApiToml, Utf8PathBuf)>> {
        let path = self.resolve_config_path(PROJECT_CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let config = crate::toml::load_from_file(&path).await?;
        Ok(Some((config, path)))
    }

    /// Find configuration file in project (walks up directory tree)
    pub fn resolve_config_path(&self, filename: &str) -> Utf8PathBuf {
        let mut current: Option<&Utf8Path> = Some(self.cwd.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(filename);
            if config_path.exists() {
                return config_path;
            }
            current = dir.parent();
        }

        // Return path in current directory even if it doesn't exist
        self.cwd.join(filename)
    }

    /// Path of the global configuration file
    pub fn global_config_path(&self) -> ConfigResult<Utf8PathBuf> {
        let home = self.home.as_ref().ok_or_else(|| NpmError::ConfigValidation {
            field: "home_dir".to_string(),
            reason: "Could not determine a UTF-8 home directory".to_string(),
        })?;

        Ok(home.join(".npmapi").join("config.toml"))
    }

    /// Load global configuration
    pub async fn load_global_config(&self) -> ConfigResult<Option<(ApiToml, Utf8PathBuf)>> {
        if self.home.is_none() {
            return Ok(None);
        }

        let path = self.global_config_path()?;
        if !path.exists() {
            return Ok(None);
        }

        let config = crate::toml::load_from_file(&path).await?;
        Ok(Some((config, path)))
    }
}

impl ConfigLayering {
    /// Recognized variables from the process environment
    pub fn env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect()
    }

    /// Merge multiple configuration layers
    pub fn merge_configs(
        global_config: Option<ApiToml>,
        project_config: Option<ApiToml>,
        env_overrides: &HashMap<String, String>,
        cli_overrides: &HashMap<String, String>,
    ) -> ConfigResult<ApiToml> {
        let mut merged = project_config.or(global_config).unwrap_or_default();

        // Apply environment variable overrides
        Self::apply_env_overrides(&mut merged, env_overrides)?;

        // Apply CLI flag overrides (highest priority)
        Self::apply_cli_overrides(&mut merged, cli_overrides)?;

        crate::toml::validate_config(&merged)?;

        Ok(merged)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(config: &mut ApiToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "NPMAPI_REGISTRY_URL" => config.registry.url = value.clone(),
                "NPMAPI_DOWNLOADS_URL" => config.registry.downloads_url = value.clone(),
                "NPMAPI_SCORE_URL" => config.registry.score_url = value.clone(),
                "NPMAPI_TIMEOUT" => config.http.timeout_secs = parse_number(key, value)?,
                "NPMAPI_MAX_RETRIES" => config.retry.max_retries = parse_number(key, value)?,
                _ => {
                    // Unknown environment variable, ignore
                }
            }
        }

        Ok(())
    }

    /// Apply CLI flag overrides
    fn apply_cli_overrides(config: &mut ApiToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "registry" => config.registry.url = value.clone(),
                "timeout" => config.http.timeout_secs = parse_number(key, value)?,
                _ => {
                    return Err(NpmError::ConfigValidation {
                        field: key.clone(),
                        reason: "Unknown command-line override".to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

fn parse_number<T>(field: &str, value: &str) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| NpmError::ConfigValidation {
        field: field.to_string(),
        reason: format!("'{}' is not a valid number: {}", value, e),
    })
}
