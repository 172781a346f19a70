//! Integration tests for authorizer selection against a shared registry

use seill_acl::{
    AclEntry, AclError, AclRegistry, Authorization, AuthorizerFactory, Grants, Identity,
    InMemoryIdentityStore, LookupPolicy, Operation, UserRecord, ROLES_ATTRIBUTE,
};
use std::sync::Arc;
use tokio::task::JoinSet;

fn registry() -> Arc<AclRegistry> {
    let acls: Vec<(String, AclEntry)> = serde_json::from_str(
        r#"[
            ["guest", {"view": ["public"]}],
            ["member", {"create": ["comment"], "parent": "guest"}],
            ["moderator", {"remove": ["comment"], "parent": "member"}],
            ["system/admin", {"remove": ["*"]}]
        ]"#,
    )
    .unwrap();

    Arc::new(AclRegistry::builder().extend(acls).build().unwrap())
}

async fn store() -> Arc<InMemoryIdentityStore> {
    let store = InMemoryIdentityStore::new();
    store
        .insert(
            "eu-pool",
            UserRecord::new("mia").with_attribute(ROLES_ATTRIBUTE, "moderator"),
        )
        .await;
    Arc::new(store)
}

#[tokio::test]
async fn test_hierarchy_through_static_identity() {
    let factory = AuthorizerFactory::new(registry(), store().await);
    let authorizer = factory.select(&Identity::fixed(["member"], "max")).unwrap();

    // inherited from guest
    assert!(authorizer
        .authorize(Some(&Authorization::new("public", Operation::View)))
        .await
        .is_ok());
    assert!(authorizer
        .authorize(Some(&Authorization::new("comment", Operation::Create)))
        .await
        .is_ok());
    assert!(matches!(
        authorizer
            .authorize(Some(&Authorization::new("comment", Operation::Remove)))
            .await,
        Err(AclError::NotAuthorized { .. })
    ));
}

#[tokio::test]
async fn test_external_identity_resolves_store_roles() {
    let factory = AuthorizerFactory::new(registry(), store().await);
    let authorizer = factory.select(&Identity::external("eu-pool", "mia")).unwrap();

    let granted = authorizer
        .authorize(Some(&Authorization::new("comment", Operation::Remove)))
        .await
        .unwrap();
    assert_eq!(granted.roles, vec!["moderator"]);
    assert!(granted.action.view.contains(&"public".to_string()));
}

#[tokio::test]
async fn test_guest_scenario_with_lenient_lookup() {
    let factory = AuthorizerFactory::new(registry(), store().await)
        .with_lookup_policy(LookupPolicy::Lenient);
    let authorizer = factory.select(&Identity::external("eu-pool", "ghost")).unwrap();

    assert_eq!(authorizer.roles().await, vec!["guest"]);
    assert!(authorizer
        .authorize(Some(&Authorization::new("public", Operation::View)))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_concurrent_authorizations_share_registry() {
    let factory = AuthorizerFactory::new(registry(), store().await);
    let mut tasks = JoinSet::new();

    for i in 0..32 {
        let factory = factory.clone();
        tasks.spawn(async move {
            let role = if i % 2 == 0 { "system/admin" } else { "guest" };
            let authorizer = factory.select(&Identity::fixed([role], "load")).unwrap();
            let allowed = authorizer
                .authorize(Some(&Authorization::new("billing", Operation::Edit)))
                .await
                .is_ok();
            (role, allowed)
        });
    }

    while let Some(result) = tasks.join_next().await {
        let (role, allowed) = result.unwrap();
        assert_eq!(allowed, role == "system/admin");
    }
}
