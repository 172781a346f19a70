//! Dispatch errors

use seill_acl::AclError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Error codes of the dispatch core
pub mod codes {
    pub const SUCCESS: &str = "00";
    pub const NOT_AUTHORIZED: &str = "403";
    pub const ROUTE_NOT_FOUND: &str = "404";
    pub const AUTHORIZER_UNAVAILABLE: &str = "401";
    pub const UPSTREAM_LOOKUP_FAILED: &str = "502";
    pub const HANDLER_MISCONFIGURED: &str = "500";
    pub const CONFIGURATION: &str = "599";
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Route not found: {method} {resource}")]
    RouteNotFound { method: String, resource: String },

    #[error("No authorizer available: {0}")]
    AuthorizerUnavailable(String),

    #[error("Identity store lookup failed: {0}")]
    UpstreamLookupFailed(String),

    #[error("No handler registered for {method} {resource}")]
    HandlerMisconfigured { method: String, resource: String },

    /// Failure reported by a route handler under its own error code
    #[error("{message}")]
    Handler { code: String, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Shorthand for handlers reporting a service-specific error code
    pub fn handler(code: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Handler {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Coarse error code, looked up in the [`ErrorCodeTable`](crate::ErrorCodeTable)
    pub fn code(&self) -> &str {
        match self {
            ApiError::NotAuthorized(_) => codes::NOT_AUTHORIZED,
            ApiError::RouteNotFound { .. } => codes::ROUTE_NOT_FOUND,
            ApiError::AuthorizerUnavailable(_) => codes::AUTHORIZER_UNAVAILABLE,
            ApiError::UpstreamLookupFailed(_) => codes::UPSTREAM_LOOKUP_FAILED,
            ApiError::HandlerMisconfigured { .. } => codes::HANDLER_MISCONFIGURED,
            ApiError::Handler { code, .. } => code,
            ApiError::Configuration(_) => codes::CONFIGURATION,
        }
    }
}

impl From<AclError> for ApiError {
    fn from(err: AclError) -> Self {
        match err {
            AclError::NotAuthorized { .. } => ApiError::NotAuthorized(err.to_string()),
            AclError::UpstreamLookupFailed(msg) => ApiError::UpstreamLookupFailed(msg),
            other => ApiError::Configuration(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seill_acl::Operation;

    #[test]
    fn test_acl_error_mapping() {
        let err = ApiError::from(AclError::NotAuthorized {
            resource: "doc".to_string(),
            operation: Operation::View,
        });
        assert_eq!(err.code(), codes::NOT_AUTHORIZED);
        assert!(err.to_string().contains("doc"));

        let err = ApiError::from(AclError::UpstreamLookupFailed("timeout".to_string()));
        assert_eq!(err, ApiError::UpstreamLookupFailed("timeout".to_string()));

        let err = ApiError::from(AclError::CircularParent("a -> a".to_string()));
        assert_eq!(err.code(), codes::CONFIGURATION);
    }

    #[test]
    fn test_handler_code() {
        assert_eq!(ApiError::handler("E42", "out of stock").code(), "E42");
    }
}
