//! Error handling for nested resource loading and authorization.

pub mod response;
pub mod types;

pub use types::{ParentError, ParentResult, StoreError};
