//! Service registration

use axum::http::Method;
use seill_acl::{AclEntry, AclRegistry, AuthorizerFactory, IdentityStore, LookupPolicy, Role};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::error_codes::{ErrorCode, ErrorCodeTable};
use crate::menu::{Menu, MenuItem};
use crate::request::Request;
use crate::response::{render, HttpReply};
use crate::route::Route;

/// Everything a service registers at startup
pub trait Service {
    /// Routes; handlers may capture the finished menu
    fn routes(&self, menu: &Arc<Menu>) -> Vec<Route>;

    fn acls(&self) -> Vec<(Role, AclEntry)>;

    fn error_codes(&self) -> HashMap<String, ErrorCode> {
        HashMap::new()
    }

    fn menu_items(&self) -> Vec<MenuItem> {
        Vec::new()
    }
}

/// A service's frozen tables
pub struct App {
    dispatcher: Dispatcher,
    error_codes: ErrorCodeTable,
    menu: Arc<Menu>,
}

impl App {
    pub fn from_service(
        service: &dyn Service,
        store: Arc<dyn IdentityStore>,
        lookup_policy: LookupPolicy,
    ) -> Result<Self> {
        let acl = AclRegistry::builder().extend(service.acls()).build()?;
        let authorizers =
            AuthorizerFactory::new(Arc::new(acl), store).with_lookup_policy(lookup_policy);

        let menu = Arc::new(Menu::new(service.menu_items()));
        let dispatcher = Dispatcher::builder(authorizers)
            .routes(service.routes(&menu))
            .build()?;
        let error_codes = ErrorCodeTable::with_service_codes(service.error_codes());

        info!(
            "App ready: {} routes, {} error codes, {} menu items",
            dispatcher.len(),
            error_codes.len(),
            menu.items().len()
        );

        Ok(Self {
            dispatcher,
            error_codes,
            menu,
        })
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn error_codes(&self) -> &ErrorCodeTable {
        &self.error_codes
    }

    pub fn menu(&self) -> &Arc<Menu> {
        &self.menu
    }

    /// Dispatch and render in one step
    pub async fn execute(&self, method: &Method, resource: &str, request: Request) -> HttpReply {
        let result = self.dispatcher.dispatch(method, resource, request).await;
        render(result, &self.error_codes)
    }
}
