//! Host-facing core for Sparklight
//!
//! Wires the spark.io notifier to the pieces a CI host provides: a persisted
//! access token ([`TrafficLightDescriptor`]), a per-job post-build step
//! ([`TrafficLightPublisher`]) and a build log to report into.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use application::{
    TrafficLightDescriptor,
    TrafficLightPublisher,
};
pub use domain::{
    DomainError,
    DomainResult,
};
pub use infrastructure::{
    ConfigLoader,
    CredentialStore,
    SparklightConfig,
};
