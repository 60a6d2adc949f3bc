//! Parent authorizer middleware layer.

use crate::error::ParentError;
use crate::state::{CurrentParent, CurrentUser};
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::warn;

/// Parent authorizer layer configuration.
#[derive(Clone)]
pub struct ParentAuthorizerLayer {
    shallow: bool,
}

impl ParentAuthorizerLayer {
    pub(crate) fn new(shallow: bool) -> Self {
        Self { shallow }
    }
}

impl<S> Layer<S> for ParentAuthorizerLayer {
    type Service = ParentAuthorizerMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ParentAuthorizerMiddleware {
            inner,
            shallow: self.shallow,
        }
    }
}

/// Parent authorizer middleware service.
///
/// Single evaluation per request: the current parent is either readable by
/// the current user and the request proceeds, or the request is aborted
/// before the handler.
#[derive(Clone)]
pub struct ParentAuthorizerMiddleware<S> {
    inner: S,
    shallow: bool,
}

impl<S> Service<Request<Body>> for ParentAuthorizerMiddleware<S>
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

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let shallow = self.shallow;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            // The loader, or custom application logic, must have populated
            // the current-parent slot
            let Some(CurrentParent(parent)) = req.extensions().get::<CurrentParent>().cloned()
            else {
                if shallow {
                    return inner.call(req).await;
                }
                warn!("Authorization attempted with no loaded parent");
                return Ok(ParentError::MissingParameter("parent".into()).into_response());
            };

            let Some(CurrentUser(user)) = req.extensions().get::<CurrentUser>().cloned() else {
                warn!("Authorization check without an authenticated user");
                return Ok(ParentError::Unauthorized.into_response());
            };

            if !user.can_read(parent.as_ref()) {
                warn!(
                    resource = parent.resource_name(),
                    id = parent.id(),
                    "Access denied"
                );
                return Ok(ParentError::AccessDenied {
                    resource: parent.resource_name().to_string(),
                }
                .into_response());
            }

            inner.call(req).await
        })
    }
}
