//! Authorizer backed by an external identity store

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::{authorize_roles, Authorized, Authorizer, LookupPolicy};
use crate::error::{AclError, Result, StoreError};
use crate::identity::ExternalIdentity;
use crate::registry::AclRegistry;
use crate::store::{IdentityStore, UserRecord};
use crate::types::{Authorization, Role};
use crate::{GUEST_ROLE, ROLES_ATTRIBUTE};

/// Reads roles from the `custom:roles` attribute of the principal's store record
///
/// The store is queried at most once per authorizer; the outcome, success or
/// failure, is kept for the authorizer's lifetime. An authorizer is meant to
/// live for a single request.
pub struct ExternalAuthorizer {
    acl: Arc<AclRegistry>,
    store: Arc<dyn IdentityStore>,
    identity: ExternalIdentity,
    lookup_policy: LookupPolicy,
    user: OnceCell<std::result::Result<UserRecord, StoreError>>,
}

impl ExternalAuthorizer {
    pub fn new(
        identity: ExternalIdentity,
        acl: Arc<AclRegistry>,
        store: Arc<dyn IdentityStore>,
    ) -> Self {
        Self {
            acl,
            store,
            identity,
            lookup_policy: LookupPolicy::Strict,
            user: OnceCell::new(),
        }
    }

    pub fn with_lookup_policy(mut self, lookup_policy: LookupPolicy) -> Self {
        self.lookup_policy = lookup_policy;
        self
    }

    async fn user(&self) -> &std::result::Result<UserRecord, StoreError> {
        let store = &self.store;
        let identity = &self.identity;
        self.user
            .get_or_init(|| async move {
                debug!("Fetching user {}/{}", identity.user_pool_id, identity.username);
                store
                    .fetch_user(&identity.user_pool_id, &identity.username)
                    .await
            })
            .await
    }

    fn guest() -> Vec<Role> {
        vec![GUEST_ROLE.to_string()]
    }
}

#[async_trait]
impl Authorizer for ExternalAuthorizer {
    /// Roles from the store record, or `guest` when the lookup failed or the
    /// record has no roles attribute
    async fn roles(&self) -> Vec<Role> {
        match self.user().await {
            Ok(user) => match user.attribute(ROLES_ATTRIBUTE) {
                Some(value) => value.split(' ').map(str::to_string).collect(),
                None => Self::guest(),
            },
            Err(err) => {
                warn!(
                    "Identity lookup for {} failed, continuing as guest: {}",
                    self.identity.username, err
                );
                Self::guest()
            }
        }
    }

    /// Fetches eagerly; under [`LookupPolicy::Strict`] a failed lookup is an
    /// error here rather than a guest fallback
    async fn authorize(&self, request: Option<&Authorization>) -> Result<Authorized> {
        if let Err(err) = self.user().await {
            if self.lookup_policy == LookupPolicy::Strict {
                return Err(AclError::from(err.clone()));
            }
        }

        let roles = self.roles().await;
        authorize_roles(&self.acl, roles, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryIdentityStore;
    use crate::types::{AclEntry, Grants, Operation};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts lookups and optionally fails them
    struct CountingStore {
        inner: InMemoryIdentityStore,
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl IdentityStore for CountingStore {
        async fn fetch_user(
            &self,
            pool: &str,
            username: &str,
        ) -> std::result::Result<UserRecord, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::Unavailable("connection refused".to_string()));
            }
            self.inner.fetch_user(pool, username).await
        }
    }

    async fn store(fail: bool) -> Arc<CountingStore> {
        let inner = InMemoryIdentityStore::new();
        inner
            .insert(
                "pool",
                UserRecord::new("alice").with_attribute(ROLES_ATTRIBUTE, "editor reviewer"),
            )
            .await;
        inner.insert("pool", UserRecord::new("bob")).await;
        Arc::new(CountingStore {
            inner,
            calls: AtomicUsize::new(0),
            fail,
        })
    }

    fn acl() -> Arc<AclRegistry> {
        Arc::new(
            AclRegistry::builder()
                .register("editor", AclEntry::new(Grants::new().with_edit(["doc"])))
                .register("guest", AclEntry::new(Grants::new().with_view(["public"])))
                .build()
                .unwrap(),
        )
    }

    fn authorizer(username: &str, store: Arc<CountingStore>) -> ExternalAuthorizer {
        ExternalAuthorizer::new(
            ExternalIdentity {
                user_pool_id: "pool".to_string(),
                username: username.to_string(),
            },
            acl(),
            store,
        )
    }

    #[tokio::test]
    async fn test_roles_split_on_spaces() {
        let authorizer = authorizer("alice", store(false).await);
        assert_eq!(authorizer.roles().await, vec!["editor", "reviewer"]);
    }

    #[tokio::test]
    async fn test_missing_attribute_is_guest() {
        let authorizer = authorizer("bob", store(false).await);
        assert_eq!(authorizer.roles().await, vec!["guest"]);
    }

    #[tokio::test]
    async fn test_lookup_is_memoized() {
        let store = store(false).await;
        let authorizer = authorizer("alice", store.clone());

        authorizer.roles().await;
        authorizer.roles().await;
        authorizer.authorize(None).await.unwrap();

        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_lookup_is_memoized() {
        let store = store(true).await;
        let authorizer = authorizer("alice", store.clone());

        assert_eq!(authorizer.roles().await, vec!["guest"]);
        assert!(authorizer.authorize(None).await.is_err());
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_authorize_propagates_lookup_failure() {
        let authorizer = authorizer("alice", store(true).await);
        let err = authorizer
            .authorize(Some(&Authorization::new("public", Operation::View)))
            .await
            .unwrap_err();
        assert!(matches!(err, AclError::UpstreamLookupFailed(_)));
    }

    #[tokio::test]
    async fn test_lenient_lookup_failure_still_allows_guest_routes() {
        let authorizer =
            authorizer("alice", store(true).await).with_lookup_policy(LookupPolicy::Lenient);

        assert_eq!(authorizer.roles().await, vec!["guest"]);
        let granted = authorizer
            .authorize(Some(&Authorization::new("public", Operation::View)))
            .await
            .unwrap();
        assert_eq!(granted.roles, vec!["guest"]);

        let err = authorizer
            .authorize(Some(&Authorization::new("doc", Operation::View)))
            .await
            .unwrap_err();
        assert!(matches!(err, AclError::NotAuthorized { .. }));
    }

    #[tokio::test]
    async fn test_unknown_user_is_lookup_failure() {
        let authorizer = authorizer("carol", store(false).await);
        assert_eq!(authorizer.roles().await, vec!["guest"]);
        assert!(matches!(
            authorizer.authorize(None).await,
            Err(AclError::UpstreamLookupFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_authorize_with_store_roles() {
        let authorizer = authorizer("alice", store(false).await);
        let granted = authorizer
            .authorize(Some(&Authorization::new("doc", Operation::Create)))
            .await
            .unwrap();
        assert_eq!(granted.roles, vec!["editor", "reviewer"]);
    }
}
