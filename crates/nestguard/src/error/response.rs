//! Error response implementation.

use super::types::{ParentError, StoreError};
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ParentError {
    fn into_response(self) -> Response {
        // Log based on error type
        if self.is_server_error() {
            error!(
                error = %self,
                code = self.error_code(),
                "Pre-handler hook failed"
            );
        } else {
            warn!(
                error = %self,
                code = self.error_code(),
                "Request aborted before handler"
            );
        }

        let status = self.status_code();
        let code = self.error_code();

        let details = match &self {
            ParentError::MissingParameter(param) => Some(serde_json::json!({ "param": param })),
            ParentError::MissingAssociation { parent, children } => Some(serde_json::json!({
                "parent": parent,
                "children": children,
            })),
            ParentError::Store(StoreError::NotFound { resource, id }) => Some(serde_json::json!({
                "resource": resource,
                "id": id,
            })),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            error: ErrorBody {
                code,
                message: self.to_string(),
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        ParentError::Store(self).into_response()
    }
}
