use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod email;
pub mod employee;
pub mod photo;
pub mod poster;
pub mod runner;
pub mod startup_checks;

#[cfg(test)]
pub(crate) mod test_support;

use email::{EmailConfig, RecipientsConfig};
use employee::FieldMapping;
use poster::{AnniversaryLayout, BirthdayLayout, FontSet};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path:?}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml_edit::de::Error),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    pub data_source: DataSourceConfig,
    #[serde(default)]
    pub field_mapping: FieldMapping,
    #[serde(default)]
    pub fonts: FontSet,
    pub birthday: BirthdayLayout,
    pub anniversary: AnniversaryLayout,
    #[serde(default)]
    pub recipients: RecipientsConfig,
    #[serde(default)]
    pub email: Option<EmailConfig>,
    #[serde(default)]
    pub background_removal: Option<BackgroundRemovalConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
}

fn default_app_name() -> String {
    "Greetings Poster".to_string()
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("storage/output")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            output_directory: default_output_directory(),
        }
    }
}

/// Where employee records come from.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DataSourceConfig {
    SampleJson {
        #[serde(default)]
        sample_url: String,
    },
    #[serde(rename = "zinghr")]
    ZingHr {
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        client_id: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackgroundRemovalConfig {
    pub endpoint: String,
    #[serde(default = "default_background_removal_timeout")]
    pub timeout_seconds: u64,
}

fn default_background_removal_timeout() -> u64 {
    30
}

/// Credentials kept out of the main config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Secrets {
    #[serde(default, alias = "withoutbg_api_key")]
    pub background_removal_api_key: Option<String>,
    #[serde(default)]
    pub zinghr_client_secret: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read_file(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml_edit::de::from_str::<Config>(content)?)
    }
}

impl Secrets {
    /// Load secrets; a missing file means no secrets at all.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("Secrets file not found at {:?}, continuing without secrets", path);
            return Ok(Self::default());
        }
        let content = read_file(path)?;
        Ok(toml_edit::de::from_str::<Secrets>(&content)?)
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })
}
