pub mod error;

pub use error::{
    DomainError,
    DomainResult,
};
