//! Child-collection accessors generated at configuration time.
//!
//! Replaces per-request method definition: each load directive produces a
//! named closure over its descriptor, stored in a lookup table keyed by
//! accessor name. Handlers call the table entry; resolution against the
//! current parent happens lazily at call time.

use crate::config::ParentDescriptor;
use crate::error::ParentError;
use crate::resource::{Resource, ResourceRegistry, ScopedQuery};
use std::collections::HashMap;
use std::sync::Arc;

type AccessorFn =
    Arc<dyn Fn(Option<&Arc<dyn Resource>>) -> Result<ScopedQuery, ParentError> + Send + Sync>;

/// Lookup table of child-collection accessors, keyed by accessor name.
///
/// Inserted into request extensions by the loader so handlers can reach it.
#[derive(Clone, Default)]
pub struct ChildAccessors {
    map: HashMap<String, AccessorFn>,
}

impl ChildAccessors {
    pub(crate) fn build(descriptors: &[ParentDescriptor], registry: &ResourceRegistry) -> Self {
        let mut map = HashMap::new();

        for descriptor in descriptors {
            let children = descriptor.children().to_string();
            let fallback = registry.store_for_collection(&children);

            let key = children.clone();
            let accessor: AccessorFn = Arc::new(move |current: Option<&Arc<dyn Resource>>| match current {
                // Parent present: its association, in scoped form.
                Some(parent) => parent
                    .association(&children)
                    .map(ScopedQuery::of)
                    .ok_or_else(|| ParentError::MissingAssociation {
                        parent: parent.resource_name().to_string(),
                        children: children.clone(),
                    }),
                // No parent ever loaded: the child type's own collection.
                None => fallback
                    .clone()
                    .map(|store| ScopedQuery::of(store.collection()))
                    .ok_or_else(|| ParentError::UnknownResource(children.clone())),
            });

            map.insert(key, accessor);
        }

        Self { map }
    }

    /// Invoke the accessor registered under `name` against the current
    /// parent slot as of this call.
    pub fn invoke(
        &self,
        name: &str,
        current: Option<&Arc<dyn Resource>>,
    ) -> Result<ScopedQuery, ParentError> {
        let accessor = self
            .map
            .get(name)
            .ok_or_else(|| ParentError::UnknownAccessor(name.to_string()))?;
        accessor(current)
    }

    /// Registered accessor names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for ChildAccessors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChildAccessors")
            .field("names", &self.map.keys().collect::<Vec<_>>())
            .finish()
    }
}
