//! Parent loader middleware layer.

use crate::accessor::ChildAccessors;
use crate::config::ParentDescriptor;
use crate::error::ParentError;
use crate::params::RequestParams;
use crate::resource::{Resource, ResourceRegistry};
use crate::state::{CurrentParent, LoadedParents};
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::debug;

/// Parent loader layer configuration.
#[derive(Clone)]
pub struct ParentLoaderLayer {
    plan: Arc<LoadPlan>,
}

struct LoadPlan {
    descriptors: Vec<ParentDescriptor>,
    shallow: bool,
    registry: ResourceRegistry,
    accessors: ChildAccessors,
}

impl ParentLoaderLayer {
    pub(crate) fn new(
        descriptors: Vec<ParentDescriptor>,
        shallow: bool,
        registry: ResourceRegistry,
    ) -> Self {
        let accessors = ChildAccessors::build(&descriptors, &registry);
        Self {
            plan: Arc::new(LoadPlan {
                descriptors,
                shallow,
                registry,
                accessors,
            }),
        }
    }
}

impl<S> Layer<S> for ParentLoaderLayer {
    type Service = ParentLoaderMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ParentLoaderMiddleware {
            inner,
            plan: self.plan.clone(),
        }
    }
}

/// Parent loader middleware service.
#[derive(Clone)]
pub struct ParentLoaderMiddleware<S> {
    inner: S,
    plan: Arc<LoadPlan>,
}

impl<S> Service<Request<Body>> for ParentLoaderMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let plan = self.plan.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let params = RequestParams::for_request(&req);

            match load_parents(&plan, &params).await {
                Ok((parents, current)) => {
                    // Make the slots visible to the authorizer and handler
                    req.extensions_mut().insert(parents);
                    if let Some(entity) = current {
                        req.extensions_mut().insert(CurrentParent(entity));
                    }
                    req.extensions_mut().insert(plan.accessors.clone());

                    inner.call(req).await
                }
                Err(err) => Ok(err.into_response()),
            }
        })
    }
}

/// Ordered fold over the configured names. Names without an identifier are
/// skipped; the last name whose identifier was present determines the
/// current parent. Ending up with no parent at all is an error unless the
/// configuration is shallow.
async fn load_parents(
    plan: &LoadPlan,
    params: &RequestParams,
) -> Result<(LoadedParents, Option<Arc<dyn Resource>>), ParentError> {
    let mut parents = LoadedParents::default();
    let mut current = None;

    for descriptor in &plan.descriptors {
        let Some(id) = params.get(descriptor.id_param()) else {
            debug!(
                resource = descriptor.name(),
                param = descriptor.id_param(),
                "identifier absent, skipping"
            );
            continue;
        };

        let store = plan
            .registry
            .store(descriptor.name())
            .ok_or_else(|| ParentError::UnknownResource(descriptor.name().to_string()))?;

        // Store failures, not-found included, surface as-is
        let entity = store.find(id).await?;

        debug!(resource = descriptor.name(), id, "loaded parent");
        parents.insert(descriptor.name(), entity.clone());
        current = Some(entity);
    }

    if current.is_none() && !plan.shallow {
        return Err(ParentError::MissingParameter(expected_params(&plan.descriptors)));
    }

    Ok((parents, current))
}

fn expected_params(descriptors: &[ParentDescriptor]) -> String {
    descriptors
        .iter()
        .map(ParentDescriptor::id_param)
        .collect::<Vec<_>>()
        .join(", ")
}
