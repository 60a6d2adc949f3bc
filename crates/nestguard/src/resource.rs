//! Backing-store seams for parent resources.
//!
//! The loader never talks to a concrete ORM. Entities, collections, and
//! lookups are trait objects registered per resource type in a
//! [`ResourceRegistry`] built once at startup.

use crate::error::StoreError;
use crate::inflect;
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// A loaded parent entity.
pub trait Resource: Send + Sync {
    /// Stable identifier, as it appears in route parameters.
    fn id(&self) -> &str;

    /// Resource type name (e.g. `group`).
    fn resource_name(&self) -> &str;

    /// Named association accessor (e.g. `notes`), if the entity exposes it.
    fn association(&self, name: &str) -> Option<Arc<dyn Collection>>;

    /// Downcast support for handlers and tests.
    fn as_any(&self) -> &dyn Any;
}

impl std::fmt::Debug for dyn Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("resource_name", &self.resource_name())
            .field("id", &self.id())
            .finish()
    }
}

/// A lazily evaluated set of resources.
pub trait Collection: Send + Sync {
    /// Materialize the collection.
    fn fetch(&self) -> Vec<Arc<dyn Resource>>;
}

/// Queryable form of a collection, before filters or pagination apply.
///
/// Used uniformly whether the base is a parent's association or a resource
/// type's entire collection; wrapping is a no-op over the underlying set.
#[derive(Clone)]
pub struct ScopedQuery {
    base: Arc<dyn Collection>,
}

impl ScopedQuery {
    /// Wrap a collection into its queryable form.
    pub fn of(base: Arc<dyn Collection>) -> Self {
        Self { base }
    }

    /// Materialize the query.
    pub fn fetch(&self) -> Vec<Arc<dyn Resource>> {
        self.base.fetch()
    }
}

impl std::fmt::Debug for ScopedQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedQuery").finish_non_exhaustive()
    }
}

/// Backing store for one resource type.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Look up an entity by identifier.
    async fn find(&self, id: &str) -> Result<Arc<dyn Resource>, StoreError>;

    /// The entire collection of this resource type.
    fn collection(&self) -> Arc<dyn Collection>;
}

/// Immutable name-to-store map built at startup.
#[derive(Clone, Default)]
pub struct ResourceRegistry {
    stores: HashMap<String, Arc<dyn ResourceStore>>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a store under a singular resource name (e.g. `group`).
    pub fn register(mut self, name: impl Into<String>, store: Arc<dyn ResourceStore>) -> Self {
        self.stores.insert(name.into(), store);
        self
    }

    /// Store for a singular resource name.
    pub fn store(&self, name: &str) -> Option<Arc<dyn ResourceStore>> {
        self.stores.get(name).cloned()
    }

    /// Store backing a child-collection name (e.g. `notes` -> the `note`
    /// store), used for the top-level fallback of child accessors.
    pub fn store_for_collection(&self, collection: &str) -> Option<Arc<dyn ResourceStore>> {
        self.store(&inflect::singularize(collection))
    }

    /// Registered resource names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stores.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("resources", &self.stores.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyCollection;

    impl Collection for EmptyCollection {
        fn fetch(&self) -> Vec<Arc<dyn Resource>> {
            Vec::new()
        }
    }

    struct NeverStore;

    #[async_trait]
    impl ResourceStore for NeverStore {
        async fn find(&self, id: &str) -> Result<Arc<dyn Resource>, StoreError> {
            Err(StoreError::not_found("never", id))
        }

        fn collection(&self) -> Arc<dyn Collection> {
            Arc::new(EmptyCollection)
        }
    }

    #[test]
    fn test_registry_lookup_by_name() {
        let registry = ResourceRegistry::new().register("group", Arc::new(NeverStore));
        assert!(registry.store("group").is_some());
        assert!(registry.store("person").is_none());
    }

    #[test]
    fn test_registry_lookup_by_collection_name() {
        let registry = ResourceRegistry::new()
            .register("note", Arc::new(NeverStore))
            .register("person", Arc::new(NeverStore));
        assert!(registry.store_for_collection("notes").is_some());
        assert!(registry.store_for_collection("people").is_some());
        assert!(registry.store_for_collection("groups").is_none());
    }

    #[test]
    fn test_scoped_query_is_a_noop_over_the_base() {
        let query = ScopedQuery::of(Arc::new(EmptyCollection));
        assert!(query.fetch().is_empty());
    }
}
