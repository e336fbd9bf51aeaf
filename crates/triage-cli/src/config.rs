//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use triage_client::{ServiceConfig, DEFAULT_API_KEY, DEFAULT_BASE_URL};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name
    #[serde(default = "default_profile")]
    pub active_profile: String,

    /// Available profiles
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// File this configuration was loaded from
    #[serde(skip)]
    location: Option<PathBuf>,
}

/// Service profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Service base URL
    pub base_url: String,

    /// API key sent with every request
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Optional request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Command history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding the configuration and session history.
    pub fn dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".triage"))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Load configuration from a file, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)?;
            toml::from_str::<Config>(&contents)?
        } else {
            Self::default()
        };
        config.location = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load configuration, writing defaults first if the file does not exist.
    ///
    /// An unreadable or malformed file is an error and is left untouched.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        let exists = path.exists();
        let config = Self::load_from(path)?;
        if !exists {
            config.save()?;
        }
        Ok(config)
    }

    /// Save configuration to the file it was loaded from.
    pub fn save(&self) -> Result<()> {
        let path = match &self.location {
            Some(path) => path.clone(),
            None => Self::path()?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Get the active profile.
    pub fn get_active_profile(&self) -> Result<&Profile> {
        self.profiles
            .get(&self.active_profile)
            .ok_or_else(|| CliError::Config(format!("Profile '{}' not found", self.active_profile)))
    }

    /// Add or update a profile.
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Switch to a different profile.
    pub fn switch_profile(&mut self, name: String) -> Result<()> {
        if !self.profiles.contains_key(&name) {
            return Err(CliError::Config(format!("Profile '{}' does not exist", name)));
        }
        self.active_profile = name;
        Ok(())
    }

    /// Service configuration for the active profile with overrides applied.
    ///
    /// Overrides come from command-line flags or their environment variables
    /// and take precedence over the profile.
    pub fn service_config(
        &self,
        base_url: Option<String>,
        api_key: Option<String>,
    ) -> Result<ServiceConfig> {
        let profile = self.get_active_profile()?;
        let mut service = ServiceConfig::new(
            base_url.unwrap_or_else(|| profile.base_url.clone()),
            api_key.unwrap_or_else(|| profile.api_key.clone()),
        );
        if let Some(secs) = profile.timeout_secs {
            service = service.with_timeout_secs(secs);
        }

        service
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(service)
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert("default".to_string(), Profile::default());

        Self {
            active_profile: "default".to_string(),
            profiles,
            settings: Settings::default(),
            location: None,
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.active_profile, "default");
        assert!(config.settings.color);

        let profile = config.get_active_profile().unwrap();
        assert_eq!(profile.base_url, "http://localhost:8000");
        assert_eq!(profile.api_key, "dev-key-change");
    }

    #[test]
    fn test_profile_management() {
        let mut config = Config::default();

        let profile = Profile {
            base_url: "https://triage.example.org".to_string(),
            api_key: "prod-key".to_string(),
            timeout_secs: Some(30),
        };

        config.set_profile("prod".to_string(), profile);
        config.switch_profile("prod".to_string()).unwrap();
        assert_eq!(config.active_profile, "prod");

        let service = config.service_config(None, None).unwrap();
        assert_eq!(service.base_url, "https://triage.example.org");
        assert_eq!(service.timeout_secs, Some(30));
    }

    #[test]
    fn test_switch_to_nonexistent_profile() {
        let mut config = Config::default();
        assert!(config.switch_profile("nonexistent".to_string()).is_err());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = Config::default();
        let service = config
            .service_config(Some("http://10.0.0.5:9000".to_string()), Some("k".to_string()))
            .unwrap();
        assert_eq!(service.base_url, "http://10.0.0.5:9000");
        assert_eq!(service.api_key, "k");
    }

    #[test]
    fn test_invalid_override_rejected() {
        let config = Config::default();
        let result = config.service_config(Some("ftp://nowhere".to_string()), None);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::load_from(&path).unwrap();
        config.settings.format = OutputFormat::Json;
        config.set_profile(
            "lab".to_string(),
            Profile {
                base_url: "http://lab:8000".to_string(),
                ..Profile::default()
            },
        );
        config.save().unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.settings.format, OutputFormat::Json);
        assert_eq!(reloaded.profiles["lab"].base_url, "http://lab:8000");
        assert_eq!(reloaded.profiles["lab"].timeout_secs, None);
    }

    #[test]
    fn test_init_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_or_init(&path).unwrap();
        assert_eq!(config.active_profile, "default");
        assert!(path.exists());
    }

    #[test]
    fn test_malformed_file_is_error_and_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let contents = "active_profile = \"ward\"\n\n[profiles.ward]\nbase_url = \"http://ward:8000\"\napi_key = \"ward-secret-key\"\n[[broken\n";
        std::fs::write(&path, contents).unwrap();

        let result = Config::load_or_init(&path);

        assert!(matches!(result, Err(CliError::Toml(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "active_profile = \"local\"\n\n[profiles.local]\nbase_url = \"http://127.0.0.1:8000\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        let profile = config.get_active_profile().unwrap();
        assert_eq!(profile.api_key, "dev-key-change");
        assert_eq!(config.settings.history_size, 1000);
    }
}
