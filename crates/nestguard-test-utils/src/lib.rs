//! Test doubles for nestguard.
//!
//! Recording stubs for the backing-store and user seams, plus a canonical
//! group/person/note fixture set used by the integration tests.

use async_trait::async_trait;
use nestguard::{
    AccessUser, Collection, Resource, ResourceRegistry, ResourceStore, StoreError,
};
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Collection double that counts materializations.
pub struct StubCollection {
    label: String,
    fetches: AtomicUsize,
}

impl StubCollection {
    /// Create a labeled collection.
    pub fn new(label: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            label: label.into(),
            fetches: AtomicUsize::new(0),
        })
    }

    /// The label given at construction.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// How many times the collection was fetched.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Collection for StubCollection {
    fn fetch(&self) -> Vec<Arc<dyn Resource>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Vec::new()
    }
}

/// Resource double that records association lookups.
pub struct StubResource {
    resource: String,
    id: String,
    associations: HashMap<String, Arc<StubCollection>>,
    association_calls: Mutex<Vec<String>>,
}

impl StubResource {
    /// Create an entity of the given type and identifier.
    pub fn new(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            id: id.into(),
            associations: HashMap::new(),
            association_calls: Mutex::new(Vec::new()),
        }
    }

    /// Expose an association under the given name.
    pub fn with_association(
        mut self,
        name: impl Into<String>,
        collection: Arc<StubCollection>,
    ) -> Self {
        self.associations.insert(name.into(), collection);
        self
    }

    /// Association names looked up so far, in call order.
    pub fn association_calls(&self) -> Vec<String> {
        self.association_calls.lock().unwrap().clone()
    }
}

impl Resource for StubResource {
    fn id(&self) -> &str {
        &self.id
    }

    fn resource_name(&self) -> &str {
        &self.resource
    }

    fn association(&self, name: &str) -> Option<Arc<dyn Collection>> {
        self.association_calls.lock().unwrap().push(name.to_string());
        self.associations
            .get(name)
            .map(|collection| collection.clone() as Arc<dyn Collection>)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// In-memory backing store for one resource type.
pub struct StubStore {
    resource: String,
    entities: HashMap<String, Arc<StubResource>>,
    top_level: Arc<StubCollection>,
}

impl StubStore {
    /// Create an empty store for the given resource type.
    pub fn new(resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self {
            top_level: StubCollection::new(format!("all {resource}s")),
            resource,
            entities: HashMap::new(),
        }
    }

    /// Add an entity, keyed by its identifier.
    pub fn with_entity(mut self, entity: Arc<StubResource>) -> Self {
        self.entities.insert(entity.id().to_string(), entity);
        self
    }

    /// The store's top-level collection double.
    pub fn top_level(&self) -> Arc<StubCollection> {
        self.top_level.clone()
    }
}

#[async_trait]
impl ResourceStore for StubStore {
    async fn find(&self, id: &str) -> Result<Arc<dyn Resource>, StoreError> {
        self.entities
            .get(id)
            .cloned()
            .map(|entity| entity as Arc<dyn Resource>)
            .ok_or_else(|| StoreError::not_found(self.resource.clone(), id))
    }

    fn collection(&self) -> Arc<dyn Collection> {
        self.top_level.clone()
    }
}

/// Store double whose lookups always fail with a backend error.
pub struct FailingStore {
    resource: String,
}

impl FailingStore {
    /// Create a failing store for the given resource type.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
        }
    }
}

#[async_trait]
impl ResourceStore for FailingStore {
    async fn find(&self, _id: &str) -> Result<Arc<dyn Resource>, StoreError> {
        Err(StoreError::Backend(anyhow::anyhow!(
            "{} store unavailable",
            self.resource
        )))
    }

    fn collection(&self) -> Arc<dyn Collection> {
        StubCollection::new(format!("all {}s", self.resource))
    }
}

/// User double with a fixed `can_read` answer, recording what it was asked
/// about.
pub struct StubUser {
    can_read: bool,
    reads: Mutex<Vec<String>>,
}

impl StubUser {
    /// A user whose capability check always passes.
    pub fn allowing() -> Arc<Self> {
        Arc::new(Self {
            can_read: true,
            reads: Mutex::new(Vec::new()),
        })
    }

    /// A user whose capability check always fails.
    pub fn denying() -> Arc<Self> {
        Arc::new(Self {
            can_read: false,
            reads: Mutex::new(Vec::new()),
        })
    }

    /// Resource names the predicate was evaluated against, in call order.
    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }
}

impl AccessUser for StubUser {
    fn can_read(&self, resource: &dyn Resource) -> bool {
        self.reads
            .lock()
            .unwrap()
            .push(resource.resource_name().to_string());
        self.can_read
    }
}

/// Canonical fixture set: a group with notes and people, a person with
/// notes, and a note store with a top-level collection.
pub struct Fixtures {
    /// Registry with `group`, `person`, and `note` stores.
    pub registry: ResourceRegistry,
    /// Group entity, id `1`.
    pub group: Arc<StubResource>,
    /// Person entity, id `2`.
    pub person: Arc<StubResource>,
    /// The group's `notes` association.
    pub group_notes: Arc<StubCollection>,
    /// The group's `people` association.
    pub group_people: Arc<StubCollection>,
    /// The person's `notes` association.
    pub person_notes: Arc<StubCollection>,
    /// The note store's top-level collection.
    pub all_notes: Arc<StubCollection>,
}

/// Build the canonical fixture set.
pub fn fixtures() -> Fixtures {
    let group_notes = StubCollection::new("group notes");
    let group_people = StubCollection::new("group people");
    let person_notes = StubCollection::new("person notes");

    let group = Arc::new(
        StubResource::new("group", "1")
            .with_association("notes", group_notes.clone())
            .with_association("people", group_people.clone()),
    );
    let person = Arc::new(
        StubResource::new("person", "2").with_association("notes", person_notes.clone()),
    );

    let note_store = StubStore::new("note");
    let all_notes = note_store.top_level();

    let registry = ResourceRegistry::new()
        .register("group", Arc::new(StubStore::new("group").with_entity(group.clone())))
        .register("person", Arc::new(StubStore::new("person").with_entity(person.clone())))
        .register("note", Arc::new(note_store));

    Fixtures {
        registry,
        group,
        person,
        group_notes,
        group_people,
        person_notes,
        all_notes,
    }
}
