//! JSON service manifest and the built-in service it drives

use seill_acl::{AclEntry, InMemoryIdentityStore, Operation, Role, UserRecord, ROLES_ATTRIBUTE};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use crate::error::{ApiError, Result};
use crate::error_codes::ErrorCode;
use crate::menu::{Menu, MenuItem};
use crate::request::Request;
use crate::response::Response;
use crate::route::Route;
use crate::service::Service;

/// User seeded into the in-memory identity store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestUser {
    pub pool: String,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub acls: BTreeMap<Role, AclEntry>,

    #[serde(default)]
    pub menu: Vec<MenuItem>,

    #[serde(default)]
    pub error_codes: HashMap<String, ErrorCode>,

    #[serde(default)]
    pub users: Vec<ManifestUser>,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ApiError::Configuration(format!("invalid manifest: {}", e)))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ApiError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Identity store holding the manifest's users
    pub async fn identity_store(&self) -> InMemoryIdentityStore {
        let store = InMemoryIdentityStore::new();
        for user in &self.users {
            let mut record = UserRecord::new(&user.username);
            if !user.roles.is_empty() {
                record = record.with_attribute(ROLES_ATTRIBUTE, user.roles.join(" "));
            }
            store.insert(user.pool.clone(), record).await;
        }
        store
    }
}

/// Service exposing `/ping`, `/me` and `/menu` over a manifest
#[derive(Debug, Clone)]
pub struct ManifestService {
    manifest: Manifest,
}

impl ManifestService {
    pub fn new(manifest: Manifest) -> Self {
        Self { manifest }
    }
}

async fn ping(_request: Request) -> Result<Response> {
    Ok(Response::data(json!({ "pong": true })))
}

async fn me(request: Request) -> Result<Response> {
    Ok(Response::data(json!({
        "memberId": request.identity.as_ref().and_then(|i| i.member_id.clone()),
        "roles": request.roles,
        "action": request.action,
    })))
}

impl Service for ManifestService {
    fn routes(&self, menu: &Arc<Menu>) -> Vec<Route> {
        let menu = menu.clone();
        let visible_menu = move |request: Request| {
            let menu = menu.clone();
            async move {
                let items = menu.visible(&request.granted_resources());
                let count = items.len() as u64;
                Ok::<_, ApiError>(Response::data(json!(items)).with_page(0, count, count))
            }
        };

        vec![
            Route::get("/ping").handler(ping),
            Route::get("/me").authorize("me", Operation::View).handler(me),
            Route::get("/menu")
                .authorize("menu", Operation::View)
                .handler(visible_menu),
        ]
    }

    fn acls(&self) -> Vec<(Role, AclEntry)> {
        self.manifest
            .acls
            .iter()
            .map(|(role, entry)| (role.clone(), entry.clone()))
            .collect()
    }

    fn error_codes(&self) -> HashMap<String, ErrorCode> {
        self.manifest.error_codes.clone()
    }

    fn menu_items(&self) -> Vec<MenuItem> {
        self.manifest.menu.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seill_acl::IdentityStore;

    const MANIFEST: &str = r#"{
        "acls": {
            "guest": {"view": ["me"]},
            "staff": {"view": ["menu", "reports"], "parent": "guest"}
        },
        "menu": [{"title": "Reports", "resource": "reports"}],
        "errorCodes": {"E1": {"message": "Custom", "statusCode": 418}},
        "users": [{"pool": "p1", "username": "sam", "roles": ["staff", "auditor"]}]
    }"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::from_json(MANIFEST).unwrap();
        assert_eq!(manifest.acls.len(), 2);
        assert_eq!(manifest.acls["staff"].parent.as_deref(), Some("guest"));
        assert_eq!(manifest.error_codes["E1"].status_code, 418);
        assert_eq!(manifest.menu[0].resource.as_deref(), Some("reports"));
    }

    #[test]
    fn test_invalid_manifest() {
        assert!(matches!(
            Manifest::from_json("{\"acls\": 3}"),
            Err(ApiError::Configuration(_))
        ));
        assert!(matches!(
            Manifest::load("/definitely/not/here.json"),
            Err(ApiError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_users_seed_store() {
        let store = Manifest::from_json(MANIFEST).unwrap().identity_store().await;
        let user = store.fetch_user("p1", "sam").await.unwrap();
        assert_eq!(user.attribute(ROLES_ATTRIBUTE), Some("staff auditor"));
    }
}
