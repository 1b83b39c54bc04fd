use std::collections::HashMap;
use std::sync::{
    Arc,
    PoisonError,
    RwLock,
};

use sparklight_plugin_api::{
    AccessToken,
    Notifier,
    ValidationResult,
};
use sparklight_plugin_spark::SparkPlugin;
use tokio::sync::Mutex;

use crate::domain::{
    DomainError,
    DomainResult,
};
use crate::infrastructure::{
    build_credential_store,
    CredentialStore,
    SparklightConfig,
};

/// Process-wide settings of the traffic light notifier: the stored access
/// token and the connection test offered by the settings form.
///
/// Share it between build steps with an `Arc`; the token is only replaced
/// through [`configure`](Self::configure).
pub struct TrafficLightDescriptor {
    store: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
    access_token: RwLock<AccessToken>,
    // Serializes save + swap so memory always matches the last saved token
    configure_lock: Mutex<()>,
}

impl TrafficLightDescriptor {
    /// Reads the persisted token; a store with nothing saved yields an empty
    /// token.
    pub async fn load(
        store: Arc<dyn CredentialStore>, notifier: Arc<dyn Notifier>,
    ) -> DomainResult<Self> {
        let access_token = store.load().await?.unwrap_or_default();

        tracing::debug!(
            backend = %store.backend(),
            token_present = !access_token.is_empty(),
            "Loaded traffic light settings"
        );

        Ok(Self {
            store,
            notifier,
            access_token: RwLock::new(access_token),
            configure_lock: Mutex::new(()),
        })
    }

    /// Wires the spark.io notifier and the configured credential store
    pub async fn from_config(config: &SparklightConfig) -> DomainResult<Self> {
        let notifier = SparkPlugin::new(config.spark_options())?;
        Self::load(build_credential_store(config), Arc::new(notifier)).await
    }

    pub fn access_token(&self) -> AccessToken {
        self.access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Persists a new token; the in-memory value only changes once the store
    /// accepted it. Overlapping calls are applied one at a time.
    pub async fn configure(&self, token: AccessToken) -> DomainResult<()> {
        let _guard = self.configure_lock.lock().await;

        self.store.save(&token).await?;

        *self
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token;

        tracing::info!(backend = %self.store.backend(), "Saved spark.io access token");
        Ok(())
    }

    /// Same as [`configure`](Self::configure) with the submitted settings form
    pub async fn configure_from_form(&self, form: &HashMap<String, String>) -> DomainResult<()> {
        let token = form.get("access_token").ok_or_else(|| {
            DomainError::InvalidConfig("Missing access_token in settings form".to_string())
        })?;
        self.configure(AccessToken::new(token.as_str())).await
    }

    /// Checks a candidate token without touching the stored one
    pub async fn test_connection(&self, candidate: &AccessToken) -> ValidationResult {
        self.notifier.test_connection(candidate).await
    }

    pub fn display_name(&self) -> &str {
        &self.notifier.metadata().display_name
    }

    /// Any kind of job may use the notifier
    pub fn is_applicable(&self, _job_type: &str) -> bool {
        true
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }
}
