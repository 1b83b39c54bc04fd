//! spark.io cloud API client

use reqwest::header::{
    ACCEPT,
    AUTHORIZATION,
    CONTENT_TYPE,
};
use reqwest::{
    Client,
    RequestBuilder,
    StatusCode,
};
use sparklight_plugin_api::{
    AccessToken,
    DeviceId,
    PluginError,
    PluginResult,
};

use crate::config::{
    self,
    SparkOptions,
    FORM_CONTENT_TYPE,
};

/// Thin wrapper issuing single, non-retried requests
pub(crate) struct SparkClient {
    client: Client,
    api_base: String,
}

impl SparkClient {
    pub fn new(client: Client, api_base: String) -> Self {
        Self { client, api_base }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// POST `/devices/{id}/notify` with `args=<description>`
    pub async fn notify(
        &self, device_id: &DeviceId, description: &str, token: &AccessToken,
    ) -> Result<StatusCode, reqwest::Error> {
        let url = config::notify_url(&self.api_base, device_id);

        tracing::debug!(device_id = %device_id, args = description, "Sending traffic light notification");

        let response = with_api_headers(self.client.post(&url), token)
            .form(&[("args", description)])
            .send()
            .await?;

        Ok(response.status())
    }

    /// GET `/devices/`; only the status code matters
    pub async fn list_devices(&self, token: &AccessToken) -> Result<StatusCode, reqwest::Error> {
        let url = config::devices_url(&self.api_base);

        tracing::debug!(url = %url, "Testing spark.io connection");

        // The API ignores Content-Type on a bodyless GET; it is sent anyway
        // so both calls carry identical headers.
        let response = with_api_headers(self.client.get(&url), token)
            .send()
            .await?;

        Ok(response.status())
    }
}

fn with_api_headers(request: RequestBuilder, token: &AccessToken) -> RequestBuilder {
    request
        .header(AUTHORIZATION, token.bearer())
        .header(ACCEPT, "*/*")
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
}

/// Builds the HTTP client used for every call, with bounded timeouts
pub(crate) fn build_http_client(options: &SparkOptions) -> PluginResult<Client> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::trace!("rustls crypto provider already installed");
    }

    Client::builder()
        .use_rustls_tls()
        .timeout(options.timeout)
        .connect_timeout(options.connect_timeout)
        .build()
        .map_err(|e| PluginError::Internal(format!("Failed to build HTTP client: {e}")))
}

/// Flattens an error and its sources into one line
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
