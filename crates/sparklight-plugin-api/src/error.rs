use thiserror::Error;

/// Notifier error types
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type PluginResult<T> = Result<T, PluginError>;
