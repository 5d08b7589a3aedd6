use crate::error::{Result, ShelterError};
use crate::model::Role;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

pub const CONFIG_KEYS: [&str; 2] = ["default-role", "bootstrap-admin"];

/// Configuration for a data directory, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Role given to newly registered users
    #[serde(default)]
    pub default_role: Role,

    /// Whether the first user registered in an empty store becomes an admin
    #[serde(default = "default_bootstrap_admin")]
    pub bootstrap_admin: bool,
}

fn default_bootstrap_admin() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_role: Role::User,
            bootstrap_admin: default_bootstrap_admin(),
        }
    }
}

impl AppConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(ShelterError::Io)?;
        let config: AppConfig = serde_json::from_str(&content).map_err(|source| {
            ShelterError::Corrupt {
                path: config_path.clone(),
                source,
            }
        })?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(ShelterError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(ShelterError::Serialization)?;
        fs::write(config_path, content).map_err(ShelterError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default-role" => Some(self.default_role.to_string()),
            "bootstrap-admin" => Some(self.bootstrap_admin.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "default-role" => {
                self.default_role = value.parse()?;
                Ok(())
            }
            "bootstrap-admin" => {
                self.bootstrap_admin = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("Expected true or false, got: {}", value))?;
                Ok(())
            }
            other => Err(format!("Unknown config key: {}", other)),
        }
    }
}
