//! Authorizer hook scenarios, end-to-end through an axum router.
//!
//! The authorizer loads nothing itself: these tests populate (or omit) the
//! current-parent slot directly, standing in for custom application logic.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Extension, Router,
};
use nestguard::{
    CurrentParent, CurrentUser, NestedConfig, NestedConfigBuilder, ParentOptions, Resource,
    ResourceRegistry,
};
use nestguard_test_utils::{StubResource, StubUser};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

async fn send(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

fn authorize_config(options: ParentOptions) -> NestedConfig {
    NestedConfigBuilder::for_resource("note")
        .authorize_parent(options)
        .build()
}

fn group() -> Arc<dyn Resource> {
    Arc::new(StubResource::new("group", "1"))
}

#[tokio::test]
async fn test_no_loaded_parent_is_a_missing_parameter() {
    let config = authorize_config(ParentOptions::new());
    let user = StubUser::allowing();

    let called = Arc::new(AtomicBool::new(false));
    let handler = {
        let called = called.clone();
        move || async move {
            called.store(true, Ordering::SeqCst);
            StatusCode::OK
        }
    };

    // Custom logic never set a current parent
    let app = config
        .apply(
            Router::new().route("/notes", get(handler)),
            &ResourceRegistry::new(),
        )
        .layer(Extension(CurrentUser(user)));
    let (status, body) = send(app, "/notes").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "missing_parameter");
    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_denied_user_gets_forbidden() {
    let config = authorize_config(ParentOptions::new());
    let user = StubUser::denying();

    let called = Arc::new(AtomicBool::new(false));
    let handler = {
        let called = called.clone();
        move || async move {
            called.store(true, Ordering::SeqCst);
            StatusCode::OK
        }
    };

    let app = config
        .apply(
            Router::new().route("/notes", get(handler)),
            &ResourceRegistry::new(),
        )
        .layer(Extension(CurrentParent(group())))
        .layer(Extension(CurrentUser(user.clone())));
    let (status, body) = send(app, "/notes").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "access_denied");
    assert!(!called.load(Ordering::SeqCst));
    // The predicate was evaluated against the loaded parent
    assert_eq!(user.reads(), ["group"]);
}

#[tokio::test]
async fn test_authorized_user_reaches_handler() {
    let config = authorize_config(ParentOptions::new());
    let user = StubUser::allowing();

    let app = config
        .apply(
            Router::new().route("/notes", get(|| async { StatusCode::OK })),
            &ResourceRegistry::new(),
        )
        .layer(Extension(CurrentParent(group())))
        .layer(Extension(CurrentUser(user.clone())));
    let (status, _) = send(app, "/notes").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(user.reads(), ["group"]);
}

#[tokio::test]
async fn test_missing_user_is_unauthorized() {
    let config = authorize_config(ParentOptions::new());

    let app = config
        .apply(
            Router::new().route("/notes", get(|| async { StatusCode::OK })),
            &ResourceRegistry::new(),
        )
        .layer(Extension(CurrentParent(group())));
    let (status, body) = send(app, "/notes").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_shallow_authorizer_tolerates_missing_parent() {
    let config = authorize_config(ParentOptions::new().shallow(true));
    let user = StubUser::denying();

    let app = config
        .apply(
            Router::new().route("/notes", get(|| async { StatusCode::OK })),
            &ResourceRegistry::new(),
        )
        .layer(Extension(CurrentUser(user.clone())));
    let (status, _) = send(app, "/notes").await;

    // No parent, nothing to authorize
    assert_eq!(status, StatusCode::OK);
    assert!(user.reads().is_empty());
}
