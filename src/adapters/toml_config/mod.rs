// TOML config adapter - Configuration management using TOML files

use crate::domain::errors::*;
use crate::error::LotcError;
use crate::ports::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

/// Every key the configuration understands, with its default value
pub const DEFAULTS: &[(&str, &str)] = &[
    ("downloader", "yt-dlp"),
    ("ffmpeg", "ffmpeg"),
    ("ffprobe", "ffprobe"),
    ("video_codec", "libx264"),
    ("audio_codec", "aac"),
    ("descriptor", "trimmed"),
    ("facebook_fallback", "true"),
    (
        "user_agent",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/101.0.4951.64 Safari/537.36",
    ),
];

const BOOLEAN_KEYS: &[&str] = &["facebook_fallback"];

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    config: RwLock<HashMap<String, String>>,
    config_file_path: RwLock<Option<PathBuf>>,
}

impl TomlConfigAdapter {
    /// Create new TOML config adapter holding the defaults
    pub fn new() -> Self {
        let config = DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Self {
            config: RwLock::new(config),
            config_file_path: RwLock::new(None),
        }
    }

    /// Candidate config files, most specific first
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("lotc.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("lotc").join("config.toml"));
        }
        paths
    }

    fn read_map(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, String>>, DomainError> {
        self.config
            .read()
            .map_err(|_| DomainError::ConfigError("configuration lock poisoned".to_string()))
    }

    fn write_map(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, String>>, DomainError> {
        self.config
            .write()
            .map_err(|_| DomainError::ConfigError("configuration lock poisoned".to_string()))
    }

    /// Merge the `[lotc]` table of a TOML document into the configuration.
    ///
    /// Strings, booleans and integers are accepted and stored as text.
    pub fn deserialize_config(&self, toml_content: &str) -> Result<(), DomainError> {
        let parsed: toml::Value = toml::from_str(toml_content)
            .map_err(|e| DomainError::from(LotcError::ConfigParse(e)))?;

        let Some(section) = parsed.get("lotc") else {
            return Ok(());
        };
        let table = section.as_table().ok_or_else(|| {
            DomainError::ConfigError("[lotc] must be a table".to_string())
        })?;

        let mut config = self.write_map()?;
        for (key, value) in table {
            let text = match value {
                toml::Value::String(s) => s.clone(),
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Integer(i) => i.to_string(),
                other => {
                    return Err(DomainError::ConfigError(format!(
                        "Unsupported value for {}: {}",
                        key, other
                    )))
                }
            };
            config.insert(key.clone(), text);
        }

        Ok(())
    }
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigPort for TomlConfigAdapter {
    async fn get_config(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.read_map()?.get(key).cloned())
    }

    async fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, DomainError> {
        Ok(self
            .read_map()?
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string()))
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.write_map()?.insert(key.to_string(), value.to_string());
        tracing::debug!("Set config {} = {}", key, value);
        Ok(())
    }

    async fn load_config(&self, file_path: &str) -> Result<(), DomainError> {
        let path = PathBuf::from(file_path);

        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            DomainError::ConfigError(format!("Failed to read config file {}: {}", file_path, e))
        })?;

        self.deserialize_config(&content)?;
        if let Ok(mut config_path) = self.config_file_path.write() {
            *config_path = Some(path);
        }

        Ok(())
    }

    async fn validate_config(&self) -> Result<(), DomainError> {
        let config = self.read_map()?;

        for (key, value) in config.iter() {
            if !DEFAULTS.iter().any(|(known, _)| known == key) {
                return Err(DomainError::ConfigError(format!(
                    "Unknown configuration key: {}",
                    key
                )));
            }
            if BOOLEAN_KEYS.contains(&key.as_str()) {
                value.parse::<bool>().map_err(|e| {
                    DomainError::ConfigError(format!("Invalid boolean value for {}: {}", key, e))
                })?;
            } else if value.trim().is_empty() {
                return Err(DomainError::ConfigError(format!("{} cannot be empty", key)));
            }
        }

        Ok(())
    }

    async fn get_all_config_keys(&self) -> Result<Vec<String>, DomainError> {
        let mut keys: Vec<String> = self.read_map()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    async fn get_config_file_path(&self) -> Result<Option<String>, DomainError> {
        Ok(self
            .config_file_path
            .read()
            .ok()
            .and_then(|p| p.as_ref().map(|p| p.to_string_lossy().to_string())))
    }
}
