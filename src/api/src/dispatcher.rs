//! Request dispatcher
//!
//! Per request:
//!
//! 1. **Lookup**: exact `(method, resource)` match, else `RouteNotFound`
//! 2. **Guard**: for guarded routes, select an authorizer from the request's
//!    identity and authorize the route's requirement; the grant is attached
//!    to the request
//! 3. **Invoke**: run the handler and return its result
//!
//! The route table is built once and never changes afterwards, so the
//! dispatcher can be shared across concurrent requests without locking.

use axum::http::Method;
use seill_acl::AuthorizerFactory;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{ApiError, Result};
use crate::request::Request;
use crate::response::Response;
use crate::route::Route;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RouteKey {
    method: Method,
    resource: String,
}

impl RouteKey {
    fn new(method: &Method, resource: &str) -> Self {
        Self {
            method: method.clone(),
            resource: resource.to_string(),
        }
    }
}

pub struct Dispatcher {
    routes: HashMap<RouteKey, Route>,
    authorizers: AuthorizerFactory,
}

impl Dispatcher {
    pub fn builder(authorizers: AuthorizerFactory) -> DispatcherBuilder {
        DispatcherBuilder {
            routes: Vec::new(),
            authorizers,
        }
    }

    pub fn route(&self, method: &Method, resource: &str) -> Option<&Route> {
        self.routes.get(&RouteKey::new(method, resource))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Route, authorize and invoke one request
    pub async fn dispatch(
        &self,
        method: &Method,
        resource: &str,
        request: Request,
    ) -> Result<Response> {
        let start = Instant::now();

        let route = self.route(method, resource).ok_or_else(|| {
            debug!("No route for {} {}", method, resource);
            ApiError::RouteNotFound {
                method: method.to_string(),
                resource: resource.to_string(),
            }
        })?;

        let request = match &route.authorization {
            None => request,
            Some(required) => {
                let identity = request.identity.as_ref().ok_or_else(|| {
                    ApiError::AuthorizerUnavailable("request carries no identity".to_string())
                })?;
                let authorizer = self.authorizers.select(identity).ok_or_else(|| {
                    ApiError::AuthorizerUnavailable(format!(
                        "unsupported identity kind {:?}",
                        identity.kind
                    ))
                })?;

                let granted = authorizer.authorize(Some(required)).await.map_err(|err| {
                    warn!(
                        request_id = %request.request_id,
                        "Rejected {} {}: {}", method, resource, err
                    );
                    ApiError::from(err)
                })?;

                request.with_grant(granted)
            }
        };

        let handler = route
            .handler
            .as_ref()
            .ok_or_else(|| ApiError::HandlerMisconfigured {
                method: method.to_string(),
                resource: resource.to_string(),
            })?;

        let result = handler.call(request).await;

        debug!(
            "Dispatched {} {} in {:?} (ok={})",
            method,
            resource,
            start.elapsed(),
            result.is_ok()
        );

        result
    }
}

/// Collects routes during startup
pub struct DispatcherBuilder {
    routes: Vec<Route>,
    authorizers: AuthorizerFactory,
}

impl DispatcherBuilder {
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn routes<I>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = Route>,
    {
        self.routes.extend(routes);
        self
    }

    /// Freeze the route table
    ///
    /// # Errors
    ///
    /// [`ApiError::Configuration`] when two routes share a `(method, resource)` pair.
    pub fn build(self) -> Result<Dispatcher> {
        let mut routes = HashMap::with_capacity(self.routes.len());

        for route in self.routes {
            let key = RouteKey::new(&route.method, &route.resource);
            if routes.contains_key(&key) {
                return Err(ApiError::Configuration(format!(
                    "duplicate route {} {}",
                    route.method, route.resource
                )));
            }
            routes.insert(key, route);
        }

        let guarded = routes.values().filter(|route| route.is_guarded()).count();
        info!("Dispatcher built with {} routes ({} guarded)", routes.len(), guarded);

        Ok(Dispatcher {
            routes,
            authorizers: self.authorizers,
        })
    }
}
