//! Route registrations

use async_trait::async_trait;
use axum::http::Method;
use seill_acl::{Authorization, Operation};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::error::Result;
use crate::request::Request;
use crate::response::Response;

/// Target of a route
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<F, Fut> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response>> + Send + 'static,
{
    async fn call(&self, request: Request) -> Result<Response> {
        (self)(request).await
    }
}

/// Binding of a literal `(method, resource)` pair to a handler and its guard
#[derive(Clone)]
pub struct Route {
    pub method: Method,
    pub resource: String,

    /// `None` leaves the route unguarded
    pub authorization: Option<Authorization>,

    /// `None` is a misconfiguration reported at dispatch time
    pub handler: Option<Arc<dyn Handler>>,
}

impl Route {
    pub fn new(method: Method, resource: impl Into<String>) -> Self {
        Self {
            method,
            resource: resource.into(),
            authorization: None,
            handler: None,
        }
    }

    pub fn get(resource: impl Into<String>) -> Self {
        Self::new(Method::GET, resource)
    }

    pub fn post(resource: impl Into<String>) -> Self {
        Self::new(Method::POST, resource)
    }

    pub fn put(resource: impl Into<String>) -> Self {
        Self::new(Method::PUT, resource)
    }

    pub fn delete(resource: impl Into<String>) -> Self {
        Self::new(Method::DELETE, resource)
    }

    /// Require `operation` on `resource` before the handler runs
    pub fn authorize(mut self, resource: impl Into<String>, operation: Operation) -> Self {
        self.authorization = Some(Authorization::new(resource, operation));
        self
    }

    pub fn handler(mut self, handler: impl Handler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn is_guarded(&self) -> bool {
        self.authorization.is_some()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("resource", &self.resource)
            .field("authorization", &self.authorization)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}
