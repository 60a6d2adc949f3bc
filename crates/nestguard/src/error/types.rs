//! Error types for the loader and authorizer hooks.

use axum::http::StatusCode;
use thiserror::Error;

/// Result type for loader/authorizer operations.
pub type ParentResult<T> = Result<T, ParentError>;

/// Errors raised by the backing store for a resource type.
///
/// These pass through the loader unmodified: a not-found from the store
/// surfaces as the store's own error, not a loader-specific wrapper.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No entity of the given type exists under the given identifier.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource type name.
        resource: String,
        /// Identifier that was looked up.
        id: String,
    },

    /// The store itself failed (connection, query, ...).
    #[error("store error")]
    Backend(#[source] anyhow::Error),
}

impl StoreError {
    /// Not-found constructor.
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for client handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Backend(_) => "store_backend",
        }
    }
}

/// Errors raised by the parent loader and authorizer hooks.
#[derive(Debug, Error)]
pub enum ParentError {
    // 400 Bad Request
    /// A required identifier parameter was absent, or authorization ran with
    /// no loaded parent.
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    // 401 Unauthorized
    /// The authorizer ran with no authenticated user attached to the request.
    #[error("Authentication required")]
    Unauthorized,

    // 403 Forbidden
    /// The authorization predicate returned false for the current parent.
    #[error("Access denied: {resource}")]
    AccessDenied {
        /// Resource type name of the denied parent.
        resource: String,
    },

    // 500 Internal Server Error
    /// A configured resource name has no registered backing store.
    #[error("No backing store registered for resource: {0}")]
    UnknownResource(String),

    /// A child accessor was invoked under a name no directive configured.
    #[error("No child accessor configured under name: {0}")]
    UnknownAccessor(String),

    /// The current parent does not expose the configured child association.
    #[error("{parent} has no association named {children}")]
    MissingAssociation {
        /// Resource type name of the parent.
        parent: String,
        /// Association name that was requested.
        children: String,
    },

    /// Backing-store failure, surfaced as-is.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ParentError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::AccessDenied { .. } => StatusCode::FORBIDDEN,
            Self::UnknownResource(_)
            | Self::UnknownAccessor(_)
            | Self::MissingAssociation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(err) => err.status_code(),
        }
    }

    /// Get error code for client handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingParameter(_) => "missing_parameter",
            Self::Unauthorized => "unauthorized",
            Self::AccessDenied { .. } => "access_denied",
            Self::UnknownResource(_) => "unknown_resource",
            Self::UnknownAccessor(_) => "unknown_accessor",
            Self::MissingAssociation { .. } => "missing_association",
            Self::Store(err) => err.error_code(),
        }
    }

    /// Check if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Check if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ParentError::MissingParameter("group_id".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ParentError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ParentError::AccessDenied { resource: "group".into() }.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ParentError::UnknownResource("group".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_errors_surface_unwrapped() {
        let err: ParentError = StoreError::not_found("group", "42").into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "not_found");
        assert_eq!(err.to_string(), "group not found: 42");
    }

    #[test]
    fn test_client_server_split() {
        assert!(ParentError::MissingParameter("id".into()).is_client_error());
        assert!(ParentError::UnknownAccessor("notes".into()).is_server_error());
        assert!(ParentError::Store(StoreError::Backend(anyhow::anyhow!("down"))).is_server_error());
    }
}
