pub mod interpolation;
pub mod loader;
pub mod schema;

pub use interpolation::{
    interpolate,
    InterpolationError,
};
pub use loader::{
    ConfigLoadError,
    ConfigLoadResult,
    ConfigLoader,
};
pub use schema::{
    CredentialBackend,
    CredentialsConfig,
    SparkConfig,
    SparklightConfig,
};
