//! Notifier API for Sparklight
//!
//! Shared types for turning a finished build into a traffic light command:
//! build results and their colors, device identifiers, access tokens and the
//! [`Notifier`] trait that concrete providers implement.

pub mod error;
pub mod plugin;
pub mod schema;
pub mod types;

pub use error::{
    PluginError,
    PluginResult,
};
pub use plugin::{
    Notifier,
    PluginMetadata,
};
pub use schema::{
    ConfigField,
    ConfigFieldType,
    ConfigSchema,
    ConfigScope,
};
pub use types::{
    AccessToken,
    BallColor,
    BuildOutcome,
    BuildResult,
    DeviceId,
    NotificationResult,
    ValidationResult,
    TRANSPORT_FAILURE_CODE,
};
