use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;
use toml_edit::{
    DocumentMut,
    Item,
};

use super::interpolation::{
    interpolate_toml,
    InterpolationError,
};
use super::schema::SparklightConfig;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Environment variable interpolation failed: {0}")]
    InterpolationError(#[from] InterpolationError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ConfigLoadResult<T> = Result<T, ConfigLoadError>;

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn discover_config_path() -> PathBuf {
        if let Ok(path) = std::env::var("SPARKLIGHT_CONFIG_PATH") {
            tracing::debug!("Using config path from SPARKLIGHT_CONFIG_PATH: {}", path);
            return PathBuf::from(path);
        }

        let path = SparklightConfig::default_data_dir().join("config.toml");
        tracing::debug!("Using default config path: {}", path.display());
        path
    }

    pub fn load_default() -> ConfigLoadResult<SparklightConfig> {
        let path = Self::discover_config_path();
        Self::load_or_default(&path)
    }

    pub fn load(path: &Path) -> ConfigLoadResult<SparklightConfig> {
        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Missing file means built-in defaults
    pub fn load_or_default(path: &Path) -> ConfigLoadResult<SparklightConfig> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(SparklightConfig::default())
        }
    }

    pub fn parse(content: &str) -> ConfigLoadResult<SparklightConfig> {
        let mut value: toml::Value = toml::from_str(content)?;

        interpolate_toml(&mut value)?;

        let config: SparklightConfig = value.try_into().map_err(|e| {
            ConfigLoadError::InvalidConfig(format!("Failed to deserialize config: {}", e))
        })?;

        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigLoadError::InvalidConfig(errors.join("; ")));
        }

        tracing::debug!(
            backend = %config.credentials.backend,
            api_base_url = %config.spark.api_base_url,
            "Loaded config"
        );

        Ok(config)
    }

    pub fn to_toml(config: &SparklightConfig) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(config)
    }

    /// Writes the config, keeping comments and unknown keys of an existing file
    pub fn save(config: &SparklightConfig, path: &Path) -> ConfigLoadResult<()> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let mut doc = content.parse::<DocumentMut>().map_err(|e| {
                ConfigLoadError::InvalidConfig(format!("Failed to parse existing config: {}", e))
            })?;

            Self::update_document(&mut doc, config)?;

            std::fs::write(path, doc.to_string())?;
        } else {
            let toml_str = Self::to_toml(config).map_err(|e| {
                ConfigLoadError::InvalidConfig(format!("Failed to serialize config: {}", e))
            })?;

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            std::fs::write(path, toml_str)?;
        }

        Ok(())
    }

    fn update_document(doc: &mut DocumentMut, config: &SparklightConfig) -> ConfigLoadResult<()> {
        let timeout_secs = toml_integer("spark.timeout_secs", config.spark.timeout_secs)?;
        let connect_timeout_secs = toml_integer(
            "spark.connect_timeout_secs",
            config.spark.connect_timeout_secs,
        )?;

        if doc.get("spark").is_none() {
            doc.insert("spark", Item::Table(toml_edit::Table::new()));
        }

        if let Some(spark) = doc.get_mut("spark").and_then(|v| v.as_table_like_mut()) {
            spark.insert(
                "api_base_url",
                Item::Value(config.spark.api_base_url.clone().into()),
            );
            spark.insert(
                "timeout_secs",
                Item::Value(timeout_secs.into()),
            );
            spark.insert(
                "connect_timeout_secs",
                Item::Value(connect_timeout_secs.into()),
            );
        }

        if doc.get("credentials").is_none() {
            doc.insert("credentials", Item::Table(toml_edit::Table::new()));
        }

        if let Some(credentials) = doc
            .get_mut("credentials")
            .and_then(|v| v.as_table_like_mut())
        {
            credentials.insert(
                "backend",
                Item::Value(config.credentials.backend.to_string().into()),
            );
            if !config.credentials.path.is_empty() {
                credentials.insert(
                    "path",
                    Item::Value(config.credentials.path.clone().into()),
                );
            }
            credentials.insert(
                "env_var",
                Item::Value(config.credentials.env_var.clone().into()),
            );
        }

        Ok(())
    }
}

/// TOML integers are signed 64-bit
fn toml_integer(key: &str, value: u64) -> ConfigLoadResult<i64> {
    i64::try_from(value).map_err(|_| {
        ConfigLoadError::InvalidConfig(format!("{} is too large: {}", key, value))
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::infrastructure::config::CredentialBackend;

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = ConfigLoader::parse("").unwrap();
        assert_eq!(config, SparklightConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let content = r#"
[spark]
api_base_url = "http://127.0.0.1:8080/v1"
timeout_secs = 3

[credentials]
backend = "env"
env_var = "MY_SPARK_TOKEN"
"#;

        let config = ConfigLoader::parse(content).unwrap();
        assert_eq!(config.spark.api_base_url, "http://127.0.0.1:8080/v1");
        assert_eq!(config.spark.timeout_secs, 3);
        assert_eq!(config.spark.connect_timeout_secs, 5);
        assert_eq!(config.credentials.backend, CredentialBackend::Env);
        assert_eq!(config.credentials.env_var, "MY_SPARK_TOKEN");
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        let content = r#"
[spark]
timeout_secs = 0
"#;
        assert!(matches!(
            ConfigLoader::parse(content),
            Err(ConfigLoadError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_backend() {
        let content = r#"
[credentials]
backend = "vault"
"#;
        assert!(ConfigLoader::parse(content).is_err());
    }

    #[test]
    fn test_env_var_interpolation() {
        std::env::set_var("SPARKLIGHT_TEST_LOADER_BASE", "http://10.0.0.5/v1");

        let content = r#"
[spark]
api_base_url = "${SPARKLIGHT_TEST_LOADER_BASE}"
"#;

        let config = ConfigLoader::parse(content).unwrap();
        assert_eq!(config.spark.api_base_url, "http://10.0.0.5/v1");

        std::env::remove_var("SPARKLIGHT_TEST_LOADER_BASE");
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        assert!(matches!(
            ConfigLoader::load(&path),
            Err(ConfigLoadError::FileNotFound(_))
        ));
        assert_eq!(
            ConfigLoader::load_or_default(&path).unwrap(),
            SparklightConfig::default()
        );
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = SparklightConfig::default();
        config.spark.timeout_secs = 7;
        ConfigLoader::save(&config, &path).unwrap();

        let reloaded = ConfigLoader::load(&path).unwrap();
        assert_eq!(reloaded.spark.timeout_secs, 7);
    }

    #[test]
    fn test_save_preserves_comments() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "# traffic light in the hallway\n[spark]\ntimeout_secs = 10\n",
        )
        .unwrap();

        let mut config = ConfigLoader::load(&path).unwrap();
        config.spark.timeout_secs = 20;
        ConfigLoader::save(&config, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("# traffic light in the hallway"));
        assert_eq!(ConfigLoader::load(&path).unwrap().spark.timeout_secs, 20);
    }

    #[test]
    fn test_save_rejects_timeout_outside_toml_range() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[spark]\ntimeout_secs = 10\n").unwrap();

        let mut config = SparklightConfig::default();
        config.spark.timeout_secs = u64::MAX;

        assert!(matches!(
            ConfigLoader::save(&config, &path),
            Err(ConfigLoadError::InvalidConfig(_))
        ));
        assert_eq!(ConfigLoader::load(&path).unwrap().spark.timeout_secs, 10);
    }

    #[test]
    fn test_discover_config_path_env_override() {
        std::env::set_var("SPARKLIGHT_CONFIG_PATH", "/custom/path/config.toml");
        let path = ConfigLoader::discover_config_path();
        assert_eq!(path, PathBuf::from("/custom/path/config.toml"));
        std::env::remove_var("SPARKLIGHT_CONFIG_PATH");
    }
}
