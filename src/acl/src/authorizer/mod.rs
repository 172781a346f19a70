//! Identity authorizers
//!
//! An [`Authorizer`] turns one principal into a role list and checks those
//! roles against the [`AclRegistry`]. Two strategies exist:
//!
//! - [`StaticAuthorizer`]: roles travel with the identity
//! - [`ExternalAuthorizer`]: roles are read once from an [`IdentityStore`]
//!
//! Both share [`authorize_roles`] for the aggregation and the verdict.
//! [`AuthorizerFactory`] selects the strategy from an [`Identity`]'s kind.

mod external;
mod fixed;

pub use external::ExternalAuthorizer;
pub use fixed::StaticAuthorizer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::identity::{Identity, IdentityKind};
use crate::registry::AclRegistry;
use crate::store::IdentityStore;
use crate::types::{Action, Authorization, Role};

/// Outcome of a successful authorization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Authorized {
    /// Roles of the principal, before parent resolution
    pub roles: Vec<Role>,

    /// Effective action of those roles and all their ancestors
    pub action: Action,
}

/// Role resolution and permission check for one principal
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// The principal's roles
    async fn roles(&self) -> Vec<Role>;

    /// Resolve the effective action and, when `request` is present, check it
    ///
    /// `None` is a discovery call: it only reports roles and action.
    async fn authorize(&self, request: Option<&Authorization>) -> Result<Authorized>;
}

/// Shared authorization step used by every authorizer
pub fn authorize_roles(
    acl: &AclRegistry,
    roles: Vec<Role>,
    request: Option<&Authorization>,
) -> Result<Authorized> {
    let action = acl.authorize(&roles, request)?;
    Ok(Authorized { roles, action })
}

/// What an external authorizer does when the identity store lookup fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupPolicy {
    /// `authorize` fails with `UpstreamLookupFailed`
    #[default]
    Strict,
    /// `authorize` continues with the guest role, like `roles`
    Lenient,
}

/// Builds per-request authorizers from shared, read-only state
#[derive(Clone)]
pub struct AuthorizerFactory {
    acl: Arc<AclRegistry>,
    store: Arc<dyn IdentityStore>,
    lookup_policy: LookupPolicy,
}

impl AuthorizerFactory {
    pub fn new(acl: Arc<AclRegistry>, store: Arc<dyn IdentityStore>) -> Self {
        Self {
            acl,
            store,
            lookup_policy: LookupPolicy::default(),
        }
    }

    pub fn with_lookup_policy(mut self, lookup_policy: LookupPolicy) -> Self {
        self.lookup_policy = lookup_policy;
        self
    }

    pub fn acl(&self) -> &Arc<AclRegistry> {
        &self.acl
    }

    /// Pick the authorizer for `identity` by its kind
    ///
    /// Returns `None` for an unknown kind or when the payload for the kind is missing.
    pub fn select(&self, identity: &Identity) -> Option<Box<dyn Authorizer>> {
        let authorizer: Option<Box<dyn Authorizer>> = match identity.kind {
            IdentityKind::Static => identity.static_identity.clone().map(|payload| {
                Box::new(StaticAuthorizer::new(payload, self.acl.clone())) as Box<dyn Authorizer>
            }),
            IdentityKind::External => identity.external_identity.clone().map(|payload| {
                Box::new(
                    ExternalAuthorizer::new(payload, self.acl.clone(), self.store.clone())
                        .with_lookup_policy(self.lookup_policy),
                ) as Box<dyn Authorizer>
            }),
            IdentityKind::Unknown => None,
        };

        if authorizer.is_none() {
            debug!("No authorizer for identity kind {:?}", identity.kind);
        }

        authorizer
    }
}
