pub mod config;
pub mod credential_store;

pub use config::{
    ConfigLoadError,
    ConfigLoader,
    CredentialBackend,
    SparklightConfig,
};
pub use credential_store::{
    build_credential_store,
    CredentialStore,
    EnvCredentialStore,
    FileCredentialStore,
    MemoryCredentialStore,
};
