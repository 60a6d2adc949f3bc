//! Declarative configuration for the pre-handler hooks.
//!
//! The three directives (`load_parent`, `authorize_parent`,
//! `load_and_authorize_parent`) are builder methods producing a single
//! immutable [`NestedConfig`] value, constructed once at startup and applied
//! to a router. Nothing executes at configuration time; all failures are
//! deferred to request time.

use crate::inflect;
use crate::middleware::{ParentAuthorizerLayer, ParentLoaderLayer};
use crate::resource::ResourceRegistry;
use axum::Router;
use std::collections::HashMap;

/// Options accepted by the loader/authorizer directives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParentOptions {
    /// When `Some(true)`, a missing identifier is tolerated and loading is
    /// skipped for that name instead of erroring.
    pub shallow: Option<bool>,
    /// Overrides the default child-accessor name.
    pub children: Option<String>,
}

impl ParentOptions {
    /// Empty options (shallow unset, default children).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shallow flag.
    pub fn shallow(mut self, shallow: bool) -> Self {
        self.shallow = Some(shallow);
        self
    }

    /// Override the child-accessor name.
    pub fn children(mut self, children: impl Into<String>) -> Self {
        self.children = Some(children.into());
        self
    }
}

/// Pre-handler hooks, in installation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hook {
    /// The parent loader.
    LoadParent,
    /// The parent authorizer.
    AuthorizeParent,
}

/// Keys of the introspection registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    /// The loading half of the combined directive.
    Load,
    /// The authorizing half of the combined directive.
    Auth,
}

/// Option set captured in the introspection registry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectiveOptions {
    /// The `shallow` value the directive was called with (`None` when unset).
    pub shallow: Option<bool>,
}

/// One entry of the introspection registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectiveRecord {
    /// Resource names the directive was called with.
    pub resources: Vec<String>,
    /// Options the directive was called with.
    pub options: DirectiveOptions,
}

/// Read-only record of what the combined directive registered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NestedResourceOptions {
    entries: HashMap<DirectiveKind, DirectiveRecord>,
}

impl NestedResourceOptions {
    /// Record for the given directive half, if the combined directive ran.
    pub fn get(&self, kind: DirectiveKind) -> Option<&DirectiveRecord> {
        self.entries.get(&kind)
    }

    /// Whether the combined directive was never used.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-name loading plan derived from a `load_parent` directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParentDescriptor {
    name: String,
    id_param: String,
    children: String,
}

impl ParentDescriptor {
    fn new(name: &str, children: String) -> Self {
        Self {
            id_param: format!("{name}_id"),
            name: name.to_string(),
            children,
        }
    }

    /// Resource name (e.g. `group`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier parameter name (`<name>_id`).
    pub fn id_param(&self) -> &str {
        &self.id_param
    }

    /// Child-accessor name this descriptor defines.
    pub fn children(&self) -> &str {
        &self.children
    }
}

/// Builder for [`NestedConfig`]; one per handler resource.
#[derive(Clone, Debug, Default)]
pub struct NestedConfigBuilder {
    resource: String,
    load: Option<(Vec<String>, ParentOptions)>,
    authorize: Option<ParentOptions>,
    hooks: Vec<Hook>,
    records: NestedResourceOptions,
}

impl NestedConfigBuilder {
    /// Start a configuration for the handler managing the given resource
    /// type (e.g. `note` for a notes handler). The default child-accessor
    /// name is its pluralization.
    pub fn for_resource(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            ..Self::default()
        }
    }

    /// Register the parent loader hook for the given resource names.
    ///
    /// # Panics
    ///
    /// Panics when `names` is empty; a loader with nothing to load is a
    /// programmer error caught at configuration time.
    pub fn load_parent<I, N>(mut self, names: I, options: ParentOptions) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        assert!(!names.is_empty(), "load_parent requires at least one resource name");

        self.hooks.push(Hook::LoadParent);
        self.load = Some((names, options));
        self
    }

    /// Register the parent authorizer hook.
    ///
    /// Loads nothing itself; some prior step (the loader, or custom
    /// application logic) must populate the current-parent slot.
    pub fn authorize_parent(mut self, options: ParentOptions) -> Self {
        self.hooks.push(Hook::AuthorizeParent);
        self.authorize = Some(options);
        self
    }

    /// Register both hooks, loader first, and record the call in the
    /// introspection registry under both the load and auth keys.
    pub fn load_and_authorize_parent<I, N>(mut self, names: I, options: ParentOptions) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let recorded = DirectiveOptions { shallow: options.shallow };

        self.records.entries.insert(
            DirectiveKind::Load,
            DirectiveRecord { resources: names.clone(), options: recorded.clone() },
        );
        self.records.entries.insert(
            DirectiveKind::Auth,
            DirectiveRecord { resources: names.clone(), options: recorded },
        );

        let authorize = ParentOptions { shallow: options.shallow, children: None };
        self.load_parent(names, options).authorize_parent(authorize)
    }

    /// Finalize into an immutable configuration.
    pub fn build(self) -> NestedConfig {
        let descriptors = match &self.load {
            Some((names, options)) => {
                let children = options
                    .children
                    .clone()
                    .unwrap_or_else(|| inflect::pluralize(&self.resource));
                names
                    .iter()
                    .map(|name| ParentDescriptor::new(name, children.clone()))
                    .collect()
            }
            None => Vec::new(),
        };

        NestedConfig {
            resource: self.resource,
            descriptors,
            load_shallow: self
                .load
                .as_ref()
                .is_some_and(|(_, options)| options.shallow == Some(true)),
            has_loader: self.load.is_some(),
            authorize_shallow: self
                .authorize
                .as_ref()
                .is_some_and(|options| options.shallow == Some(true)),
            has_authorizer: self.authorize.is_some(),
            hooks: self.hooks,
            records: self.records,
        }
    }
}

/// Immutable hook configuration for one handler resource.
///
/// Set once at definition time; read at request time by the installed
/// middlewares.
#[derive(Clone, Debug)]
pub struct NestedConfig {
    resource: String,
    descriptors: Vec<ParentDescriptor>,
    load_shallow: bool,
    has_loader: bool,
    authorize_shallow: bool,
    has_authorizer: bool,
    hooks: Vec<Hook>,
    records: NestedResourceOptions,
}

impl NestedConfig {
    /// The handler's own resource name.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Loading plans, in declaration order.
    pub fn descriptors(&self) -> &[ParentDescriptor] {
        &self.descriptors
    }

    /// Whether missing identifiers are tolerated by the loader.
    pub fn shallow(&self) -> bool {
        self.load_shallow
    }

    /// Installed hooks, in execution order.
    pub fn hooks(&self) -> &[Hook] {
        &self.hooks
    }

    /// Introspection registry populated by the combined directive.
    pub fn nested_resource_options(&self) -> &NestedResourceOptions {
        &self.records
    }

    /// The loader middleware layer, when a load directive was used.
    pub fn loader_layer(&self, registry: &ResourceRegistry) -> Option<ParentLoaderLayer> {
        self.has_loader.then(|| {
            ParentLoaderLayer::new(
                self.descriptors.clone(),
                self.load_shallow,
                registry.clone(),
            )
        })
    }

    /// The authorizer middleware layer, when an authorize directive was used.
    pub fn authorizer_layer(&self) -> Option<ParentAuthorizerLayer> {
        self.has_authorizer
            .then(|| ParentAuthorizerLayer::new(self.authorize_shallow))
    }

    /// Install the configured hooks on a router, loader before authorizer.
    pub fn apply<S>(&self, router: Router<S>, registry: &ResourceRegistry) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        // Router::layer wraps existing layers, so the authorizer goes on
        // first to leave the loader outermost.
        let mut router = router;
        if let Some(authorizer) = self.authorizer_layer() {
            router = router.layer(authorizer);
        }
        if let Some(loader) = self.loader_layer(registry) {
            router = router.layer(loader);
        }
        router
    }
}
