use std::collections::HashMap;
use std::time::Duration;

use sparklight_plugin_api::{
    DeviceId,
    PluginError,
    PluginResult,
};

pub const DEFAULT_API_BASE_URL: &str = "https://api.spark.io/v1";

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Connection settings for the cloud API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparkOptions {
    pub api_base_url: String,
    /// Bound on a whole request, so a dead endpoint cannot stall the build
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for SparkOptions {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl SparkOptions {
    /// Builds options from string settings, falling back to defaults for
    /// missing keys.
    pub fn from_map(config: &HashMap<String, String>) -> PluginResult<Self> {
        let mut options = Self::default();

        if let Some(base) = config.get("api_base_url") {
            options.api_base_url = normalize_base_url(base)?;
        }
        if let Some(secs) = config.get("timeout_secs") {
            options.timeout = parse_secs("timeout_secs", secs)?;
        }
        if let Some(secs) = config.get("connect_timeout_secs") {
            options.connect_timeout = parse_secs("connect_timeout_secs", secs)?;
        }

        Ok(options)
    }
}

fn parse_secs(key: &str, value: &str) -> PluginResult<Duration> {
    let secs: u64 = value
        .trim()
        .parse()
        .map_err(|_| PluginError::InvalidConfig(format!("{key} must be a whole number")))?;
    if secs == 0 {
        return Err(PluginError::InvalidConfig(format!(
            "{key} must be greater than zero"
        )));
    }
    Ok(Duration::from_secs(secs))
}

pub(crate) fn normalize_base_url(base: &str) -> PluginResult<String> {
    let base = base.trim().trim_end_matches('/');
    if !(base.starts_with("https://") || base.starts_with("http://")) {
        return Err(PluginError::InvalidConfig(format!(
            "API base URL must start with http:// or https://: {base}"
        )));
    }
    Ok(base.to_string())
}

pub fn parse_device_id(config: &HashMap<String, String>) -> PluginResult<DeviceId> {
    let device_id = config
        .get("device_id")
        .ok_or_else(|| PluginError::InvalidConfig("No device ID configured".to_string()))?;
    DeviceId::new(device_id.as_str())
}

/// The id is percent-encoded as one path segment rather than spliced in raw;
/// hex device ids come out unchanged.
pub(crate) fn notify_url(api_base: &str, device_id: &DeviceId) -> String {
    format!(
        "{}/devices/{}/notify",
        api_base,
        urlencoding::encode(device_id.as_str())
    )
}

pub(crate) fn devices_url(api_base: &str) -> String {
    format!("{api_base}/devices/")
}
