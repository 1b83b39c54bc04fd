//! spark.io notifier implementation

use async_trait::async_trait;
use reqwest::StatusCode;
use sparklight_plugin_api::*;

use crate::config::SparkOptions;
use crate::{
    client,
    config,
    metadata,
};

/// Notifier driving a spark.io traffic light
pub struct SparkPlugin {
    metadata: PluginMetadata,
    client: client::SparkClient,
}

impl SparkPlugin {
    pub fn new(options: SparkOptions) -> PluginResult<Self> {
        let api_base = config::normalize_base_url(&options.api_base_url)?;
        let http_client = client::build_http_client(&options)?;

        Ok(Self {
            metadata: metadata::create_metadata(),
            client: client::SparkClient::new(http_client, api_base),
        })
    }

    pub fn api_base_url(&self) -> &str {
        self.client.api_base()
    }
}

#[async_trait]
impl Notifier for SparkPlugin {
    fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    async fn notify(
        &self, outcome: &BuildOutcome, device_id: &DeviceId, token: &AccessToken,
    ) -> NotificationResult {
        match self
            .client
            .notify(device_id, outcome.description(), token)
            .await
        {
            Ok(status) => {
                tracing::debug!(device_id = %device_id, status = status.as_u16(), "Traffic light responded");
                NotificationResult::Status(status.as_u16())
            }
            Err(e) => {
                tracing::warn!(
                    device_id = %device_id,
                    error = %client::error_chain(&e),
                    "Traffic light notification failed"
                );
                NotificationResult::TransportFailure
            }
        }
    }

    async fn test_connection(&self, token: &AccessToken) -> ValidationResult {
        match self.client.list_devices(token).await {
            Ok(StatusCode::OK) => ValidationResult::Ok,
            Ok(status) => ValidationResult::Warning(format!(
                "Return code: {} (Token: {})",
                status.as_u16(),
                token.expose()
            )),
            Err(e) => {
                let message = client::error_chain(&e);
                tracing::warn!(error = %message, "spark.io connection test failed");
                ValidationResult::Error(format!(
                    "Error occurred: {} (Token: {})",
                    message,
                    token.expose()
                ))
            }
        }
    }
}
