//! Handler extractors for loaded parents.

use crate::accessor::ChildAccessors;
use crate::error::ParentError;
use crate::resource::{Resource, ScopedQuery};
use crate::state::{CurrentParent, LoadedParents};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// Extractor for the request's loaded parents (requires the loader to have
/// run).
pub struct Parents {
    loaded: LoadedParents,
    current: Option<Arc<dyn Resource>>,
    accessors: ChildAccessors,
}

impl Parents {
    /// Entity loaded under the given resource name, if any.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Resource>> {
        self.loaded.get(name)
    }

    /// The current parent, if any was loaded.
    pub fn current(&self) -> Option<&Arc<dyn Resource>> {
        self.current.as_ref()
    }

    /// Invoke a configured child accessor against the current parent.
    pub fn children(&self, name: &str) -> Result<ScopedQuery, ParentError> {
        self.accessors.invoke(name, self.current.as_ref())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Parents
where
    S: Send + Sync,
{
    type Rejection = ParentError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let loaded = parts
            .extensions
            .get::<LoadedParents>()
            .cloned()
            .ok_or_else(|| ParentError::MissingParameter("parent".into()))?;

        Ok(Parents {
            loaded,
            current: parts
                .extensions
                .get::<CurrentParent>()
                .map(|current| current.0.clone()),
            accessors: parts
                .extensions
                .get::<ChildAccessors>()
                .cloned()
                .unwrap_or_default(),
        })
    }
}

/// Extractor for the optional current parent.
pub struct MaybeParent(
    /// The current parent, when one was loaded.
    pub Option<Arc<dyn Resource>>,
);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeParent
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeParent(
            parts
                .extensions
                .get::<CurrentParent>()
                .map(|current| current.0.clone()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use std::any::Any;

    struct Marker;

    impl Resource for Marker {
        fn id(&self) -> &str {
            "1"
        }

        fn resource_name(&self) -> &str {
            "group"
        }

        fn association(&self, _name: &str) -> Option<Arc<dyn crate::resource::Collection>> {
            None
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[tokio::test]
    async fn test_parents_extractor_requires_loader() {
        let req = Request::new(());
        let (mut parts, _) = req.into_parts();

        let result = Parents::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ParentError::MissingParameter(_))));
    }

    #[tokio::test]
    async fn test_parents_extractor_exposes_slots_and_current() {
        let req = Request::new(());
        let (mut parts, _) = req.into_parts();

        let entity: Arc<dyn Resource> = Arc::new(Marker);
        let mut loaded = LoadedParents::default();
        loaded.insert("group", entity.clone());
        parts.extensions.insert(loaded);
        parts.extensions.insert(CurrentParent(entity));
        parts.extensions.insert(ChildAccessors::default());

        let parents = Parents::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(parents.get("group").is_some());
        assert_eq!(parents.current().unwrap().resource_name(), "group");
    }

    #[tokio::test]
    async fn test_maybe_parent_extractor_none() {
        let req = Request::new(());
        let (mut parts, _) = req.into_parts();

        let MaybeParent(current) = MaybeParent::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(current.is_none());
    }
}
