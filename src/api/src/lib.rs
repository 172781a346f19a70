//! # Seill API
//!
//! Request dispatch for multi-tenant API services built on [`seill_acl`].
//!
//! A [`Service`] declares its routes, ACL entries, error codes and menu once;
//! [`App::from_service`] freezes them into immutable tables. Each request is
//! then routed by `(method, resource)`, authorized when the route demands it,
//! and handed to the route's handler together with the principal's roles and
//! effective action.
//!
//! ```text
//! Request → Dispatcher ─ lookup ─→ Route
//!                 │                  │ authorization?
//!                 └→ AuthorizerFactory → Authorizer → AclRegistry
//!                                    │
//!                                 Handler → Response → HttpReply
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod error_codes;
pub mod manifest;
pub mod menu;
pub mod payload;
pub mod request;
pub mod response;
pub mod route;
pub mod server;
pub mod service;

pub use config::ServerConfig;
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use error::{ApiError, Result};
pub use error_codes::{ErrorCode, ErrorCodeTable};
pub use manifest::{Manifest, ManifestService};
pub use menu::{Menu, MenuItem};
pub use request::Request;
pub use response::{render, HttpReply, Response};
pub use route::{Handler, Route};
pub use server::{create_router, AppState};
pub use service::{App, Service};
