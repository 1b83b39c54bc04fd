use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};
use sparklight_plugin_spark::{
    SparkOptions,
    DEFAULT_API_BASE_URL,
};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_TOKEN_ENV_VAR: &str = "SPARKLIGHT_ACCESS_TOKEN";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparklightConfig {
    pub spark: SparkConfig,
    pub credentials: CredentialsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkConfig {
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for SparkConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    #[default]
    File,
    Env,
    Memory,
}

impl fmt::Display for CredentialBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Env => write!(f, "env"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub backend: CredentialBackend,
    /// File backend location; empty means `<data dir>/credentials.toml`
    pub path: String,
    pub env_var: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            backend: CredentialBackend::File,
            path: String::new(),
            env_var: DEFAULT_TOKEN_ENV_VAR.to_string(),
        }
    }
}

impl SparklightConfig {
    pub fn default_data_dir() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("sparklight"))
            .unwrap_or_else(|| PathBuf::from(".sparklight"))
    }

    pub fn credentials_path(&self) -> PathBuf {
        if self.credentials.path.is_empty() {
            Self::default_data_dir().join("credentials.toml")
        } else {
            PathBuf::from(&self.credentials.path)
        }
    }

    pub fn spark_options(&self) -> SparkOptions {
        SparkOptions {
            api_base_url: self.spark.api_base_url.clone(),
            timeout: Duration::from_secs(self.spark.timeout_secs),
            connect_timeout: Duration::from_secs(self.spark.connect_timeout_secs),
        }
    }

    /// Returns every problem found, empty when the config is usable
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let base = self.spark.api_base_url.trim();
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            errors.push(format!(
                "spark.api_base_url must start with http:// or https:// (got '{base}')"
            ));
        }
        if self.spark.timeout_secs == 0 {
            errors.push("spark.timeout_secs must be greater than zero".to_string());
        }
        if self.spark.connect_timeout_secs == 0 {
            errors.push("spark.connect_timeout_secs must be greater than zero".to_string());
        }
        if self.credentials.backend == CredentialBackend::Env
            && self.credentials.env_var.trim().is_empty()
        {
            errors.push("credentials.env_var is required for the env backend".to_string());
        }

        errors
    }
}
