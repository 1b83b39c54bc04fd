use async_trait::async_trait;
use serde::{
    Deserialize,
    Serialize,
};

use crate::schema::ConfigSchema;
use crate::types::*;

/// Notifier metadata - describes the notifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// Notifier name (e.g., "Spark Traffic Light")
    pub name: String,
    /// Notifier identifier (e.g., "spark")
    pub provider_type: String,
    /// Label shown in the host's post-build action list
    pub display_name: String,
    /// Notifier version
    pub version: String,
    /// Notifier description
    pub description: String,
    /// Notifier author
    pub author: Option<String>,
    /// Configuration schema for generic UI
    pub config_schema: ConfigSchema,
}

/// Sends build outcomes to a device and validates credentials against the
/// same API.
///
/// Both operations swallow transport errors: `notify` reports them as
/// [`NotificationResult::TransportFailure`] and `test_connection` as
/// [`ValidationResult::Error`].
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Get notifier metadata
    fn metadata(&self) -> &PluginMetadata;

    /// Tell the device to display the outcome. Performs exactly one request.
    async fn notify(
        &self, outcome: &BuildOutcome, device_id: &DeviceId, token: &AccessToken,
    ) -> NotificationResult;

    /// Probe the API with a candidate token
    async fn test_connection(&self, token: &AccessToken) -> ValidationResult;

    /// Get the provider type string
    fn provider_type(&self) -> &str {
        &self.metadata().provider_type
    }
}
