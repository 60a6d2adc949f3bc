//! Nestguard
//!
//! Nested parent resource loading and authorization middleware for axum.
//!
//! # Architecture
//!
//! A handler that serves nested routes (`/groups/:group_id/notes`) declares
//! its parents once, at startup, through an immutable configuration:
//!
//! - **Config**: the `load_parent` / `authorize_parent` /
//!   `load_and_authorize_parent` directives, builder-style
//! - **Loader**: resolves `<name>_id` identifiers, fetches entities from
//!   registered backing stores, fills request-scoped slots
//! - **Authorizer**: checks the current user's `can_read` capability against
//!   the current parent, denying before the handler runs
//! - **Accessors**: configuration-time closures exposing the parent's child
//!   collection (or the child type's own collection when nothing loaded)
//!
//! Both hooks are plain tower layers; the loader always runs before the
//! authorizer when installed through the combined directive.
//!
//! # Example
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use nestguard::{NestedConfigBuilder, ParentOptions, ResourceRegistry};
//!
//! # fn registry() -> ResourceRegistry { ResourceRegistry::new() }
//! let registry = registry();
//! let config = NestedConfigBuilder::for_resource("note")
//!     .load_and_authorize_parent(["group"], ParentOptions::new())
//!     .build();
//!
//! let app: Router = config.apply(
//!     Router::new().route("/notes", get(|| async { "ok" })),
//!     &registry,
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accessor;
pub mod config;
pub mod error;
mod inflect;
pub mod middleware;
pub mod params;
pub mod resource;
pub mod state;

pub use accessor::ChildAccessors;
pub use config::{
    DirectiveKind, DirectiveOptions, DirectiveRecord, Hook, NestedConfig, NestedConfigBuilder,
    NestedResourceOptions, ParentDescriptor, ParentOptions,
};
pub use error::{ParentError, ParentResult, StoreError};
pub use middleware::{
    MaybeParent, ParentAuthorizerLayer, ParentAuthorizerMiddleware, ParentLoaderLayer,
    ParentLoaderMiddleware, Parents,
};
pub use params::RequestParams;
pub use resource::{Collection, Resource, ResourceRegistry, ResourceStore, ScopedQuery};
pub use state::{AccessUser, CurrentParent, CurrentUser, LoadedParents};
