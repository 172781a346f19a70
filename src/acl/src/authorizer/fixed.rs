//! Authorizer for identities that carry their own roles

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::{authorize_roles, Authorized, Authorizer};
use crate::error::Result;
use crate::identity::StaticIdentity;
use crate::registry::AclRegistry;
use crate::types::{Authorization, Role};

/// Uses the identity's role list verbatim; never calls out
#[derive(Debug, Clone)]
pub struct StaticAuthorizer {
    acl: Arc<AclRegistry>,
    roles: Vec<Role>,
    username: String,
}

impl StaticAuthorizer {
    pub fn new(identity: StaticIdentity, acl: Arc<AclRegistry>) -> Self {
        Self {
            acl,
            roles: identity.roles,
            username: identity.username,
        }
    }
}

#[async_trait]
impl Authorizer for StaticAuthorizer {
    async fn roles(&self) -> Vec<Role> {
        self.roles.clone()
    }

    async fn authorize(&self, request: Option<&Authorization>) -> Result<Authorized> {
        debug!("Static identity '{}' with roles {:?}", self.username, self.roles);
        authorize_roles(&self.acl, self.roles.clone(), request)
    }
}
