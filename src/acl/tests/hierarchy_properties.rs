//! Property tests for role-hierarchy resolution and action aggregation

use proptest::prelude::*;
use seill_acl::{AclEntry, AclRegistry, Grants, Operation, Role};
use std::collections::HashSet;

fn role_name(idx: usize) -> Role {
    format!("role-{}", idx)
}

fn patterns() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(vec!["doc", "report", "user", "*"]), 0..3)
        .prop_map(|v| v.into_iter().map(String::from).collect())
}

fn grants() -> impl Strategy<Value = Grants> {
    (patterns(), patterns(), patterns(), patterns()).prop_map(|(view, create, edit, remove)| {
        Grants::new()
            .with_view(view)
            .with_create(create)
            .with_edit(edit)
            .with_remove(remove)
    })
}

/// Acyclic hierarchy: role `i` may only name a parent with a smaller index
fn registry() -> impl Strategy<Value = AclRegistry> {
    prop::collection::vec((grants(), any::<prop::sample::Index>(), any::<bool>()), 1..8).prop_map(
        |entries| {
            let mut builder = AclRegistry::builder();
            for (idx, (grants, parent, has_parent)) in entries.into_iter().enumerate() {
                let mut entry = AclEntry::new(grants);
                if has_parent && idx > 0 {
                    entry = entry.with_parent(role_name(parent.index(idx)));
                }
                builder = builder.register(role_name(idx), entry);
            }
            builder.build().expect("acyclic by construction")
        },
    )
}

fn as_set(items: &[String]) -> HashSet<&str> {
    items.iter().map(String::as_str).collect()
}

proptest! {
    #[test]
    fn prop_parent_grants_only_add(registry in registry(), pick in any::<prop::sample::Index>()) {
        let roles: Vec<Role> = registry.roles().cloned().collect();
        let role = pick.get(&roles).clone();

        if let Some(parent) = registry.get(&role).and_then(|e| e.parent.clone()) {
            let alone = registry.aggregate(&[role.clone()]);
            let with_parent = registry.aggregate(&[role, parent]);

            for op in Operation::ALL {
                let bigger = as_set(with_parent.patterns(op));
                for pattern in alone.patterns(op) {
                    prop_assert!(bigger.contains(pattern.as_str()));
                }
            }
        }
    }

    #[test]
    fn prop_implication_chain(grants in grants()) {
        let registry = AclRegistry::builder()
            .register("only", AclEntry::new(grants.clone()))
            .build()
            .unwrap();
        let action = registry.aggregate(&["only".to_string()]);

        let remove = as_set(&grants.remove);
        let edit = as_set(&action.edit);
        let create = as_set(&action.create);
        let view = as_set(&action.view);

        prop_assert!(remove.is_subset(&edit));
        prop_assert!(edit.is_subset(&create));
        prop_assert!(create.is_subset(&view));
    }

    #[test]
    fn prop_resolution_is_idempotent(
        registry in registry(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..4),
    ) {
        let names: Vec<Role> = registry.roles().cloned().collect();
        let roles: Vec<Role> = picks.iter().map(|p| p.get(&names).clone()).collect();

        let mut resolved = roles.clone();
        resolved.extend(registry.resolve_parents(&roles));
        let known = as_set(&resolved);

        for again in registry.resolve_parents(&resolved) {
            prop_assert!(known.contains(again.as_str()));
        }
    }

    #[test]
    fn prop_wildcard_grant_authorizes_any_resource(resource in "[a-z/]{1,12}") {
        let registry = AclRegistry::builder()
            .register("root", AclEntry::new(Grants::new().with_remove(["*"])))
            .build()
            .unwrap();
        for op in Operation::ALL {
            let request = seill_acl::Authorization::new(resource.clone(), op);
            prop_assert!(registry.authorize(&["root".to_string()], Some(&request)).is_ok());
        }
    }
}
