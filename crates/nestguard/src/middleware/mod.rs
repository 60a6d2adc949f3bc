//! Pre-handler middleware hooks.

pub mod authorizer;
pub mod extractor;
pub mod loader;

pub use authorizer::{ParentAuthorizerLayer, ParentAuthorizerMiddleware};
pub use extractor::{MaybeParent, Parents};
pub use loader::{ParentLoaderLayer, ParentLoaderMiddleware};
