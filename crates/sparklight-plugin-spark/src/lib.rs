//! spark.io traffic light notifier for Sparklight
//!
//! Sends the color of a finished build to a spark.io (Particle) device and
//! validates access tokens against the same cloud API.
//!
//! # Architecture
//!
//! - `plugin` - [`SparkPlugin`], the [`Notifier`] implementation
//! - `client` - HTTP calls against the cloud API
//! - `config` - URL construction and option parsing
//! - `metadata` - Notifier metadata and configuration schema
//!
//! # Example Usage
//!
//! ```no_run
//! use sparklight_plugin_api::{AccessToken, BuildOutcome, BuildResult, DeviceId, Notifier};
//! use sparklight_plugin_spark::{SparkOptions, SparkPlugin};
//!
//! # async fn run() -> sparklight_plugin_api::PluginResult<()> {
//! let plugin = SparkPlugin::new(SparkOptions::default())?;
//! let result = plugin
//!     .notify(
//!         &BuildOutcome::from(BuildResult::Success),
//!         &DeviceId::new("53ff6f065067544853360587")?,
//!         &AccessToken::new("my-token"),
//!     )
//!     .await;
//! println!("Spark traffic light return code: {result}");
//! # Ok(())
//! # }
//! ```
//!
//! [`Notifier`]: sparklight_plugin_api::Notifier

mod client;
mod config;
mod metadata;
mod plugin;

pub use config::{
    parse_device_id,
    SparkOptions,
    DEFAULT_API_BASE_URL,
};
pub use plugin::SparkPlugin;
