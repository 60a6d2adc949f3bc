//! Request-scoped state populated by the loader hook.

use crate::resource::Resource;
use std::collections::HashMap;
use std::sync::Arc;

/// Name-keyed slots for loaded parent entities.
///
/// One slot per configured resource name; a name the request carried no
/// identifier for (shallow mode) has no entry. Created empty at request
/// start, populated by the loader, discarded with the request.
#[derive(Clone, Default)]
pub struct LoadedParents {
    slots: HashMap<String, Arc<dyn Resource>>,
}

impl LoadedParents {
    /// Entity loaded under the given resource name, if any.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Resource>> {
        self.slots.get(name).cloned()
    }

    /// Whether no parent was loaded at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, entity: Arc<dyn Resource>) {
        self.slots.insert(name.into(), entity);
    }
}

impl std::fmt::Debug for LoadedParents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedParents")
            .field("names", &self.slots.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The most recently loaded parent entity ("last resolved wins").
///
/// Read by the authorizer and by child accessors. Populated by the loader,
/// or by custom application logic ahead of an authorizer-only configuration.
#[derive(Clone)]
pub struct CurrentParent(
    /// The entity in the slot.
    pub Arc<dyn Resource>,
);

/// Authenticated user attached by the hosting application's auth layer.
#[derive(Clone)]
pub struct CurrentUser(
    /// The user's capability interface.
    pub Arc<dyn AccessUser>,
);

/// Capability check the authorizer evaluates against the current parent.
pub trait AccessUser: Send + Sync {
    /// Whether this user may read the given resource.
    fn can_read(&self, resource: &dyn Resource) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    struct Marker(&'static str);

    impl Resource for Marker {
        fn id(&self) -> &str {
            "1"
        }

        fn resource_name(&self) -> &str {
            self.0
        }

        fn association(&self, _name: &str) -> Option<Arc<dyn crate::resource::Collection>> {
            None
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_slots_are_name_keyed() {
        let mut parents = LoadedParents::default();
        parents.insert("group", Arc::new(Marker("group")));

        assert!(parents.get("group").is_some());
        assert!(parents.get("person").is_none());
        assert!(!parents.is_empty());
    }

    #[test]
    fn test_empty_slots() {
        let parents = LoadedParents::default();
        assert!(parents.is_empty());
        assert!(parents.get("group").is_none());
    }
}
