use sparklight_plugin_api::PluginError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Plugin(#[from] PluginError),
}

pub type DomainResult<T> = Result<T, DomainError>;
