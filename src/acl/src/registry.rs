//! ACL registry with role-hierarchy resolution and action aggregation
//!
//! The registry is assembled once through [`AclRegistryBuilder`], validated, and
//! then shared read-only (typically behind an `Arc`) by every in-flight request.
//!
//! # Example
//!
//! ```rust
//! use seill_acl::{AclEntry, AclRegistry, Grants};
//!
//! let registry = AclRegistry::builder()
//!     .register("viewer", AclEntry::new(Grants::new().with_view(["report"])))
//!     .register(
//!         "analyst",
//!         AclEntry::new(Grants::new().with_edit(["draft"])).with_parent("viewer"),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(registry.resolve_parents(&["analyst".to_string()]), vec!["viewer".to_string()]);
//! ```

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::error::{AclError, Result};
use crate::matcher::matches_any;
use crate::types::{AclEntry, Action, Authorization, Role};

/// Immutable role table
#[derive(Debug, Clone, Default)]
pub struct AclRegistry {
    acls: HashMap<Role, AclEntry>,
}

impl AclRegistry {
    /// Start assembling a registry
    pub fn builder() -> AclRegistryBuilder {
        AclRegistryBuilder::new()
    }

    /// A registry with no roles; every lookup resolves to nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, role: &str) -> Option<&AclEntry> {
        self.acls.get(role)
    }

    pub fn len(&self) -> usize {
        self.acls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acls.is_empty()
    }

    /// Registered role names, in no particular order
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.acls.keys()
    }

    /// Every ancestor reachable from `roles`, in discovery order
    ///
    /// Each starting role's parent chain is walked on its own, so an ancestor
    /// shared by two starting roles is reported twice. A walk stops as soon as
    /// it reaches a role already seen on the same chain. Unknown roles have no
    /// parents.
    pub fn resolve_parents(&self, roles: &[Role]) -> Vec<Role> {
        let mut parents = Vec::new();

        for role in roles {
            let mut seen: HashSet<&str> = HashSet::new();
            seen.insert(role.as_str());

            let mut current = role.as_str();
            while let Some(parent) = self.acls.get(current).and_then(|e| e.parent.as_deref()) {
                if !seen.insert(parent) {
                    break;
                }
                parents.push(parent.to_string());
                current = parent;
            }
        }

        parents
    }

    /// Effective action of exactly `roles`, without walking parents
    ///
    /// Unknown roles contribute nothing; an empty role list yields an action
    /// with four empty sequences.
    pub fn aggregate(&self, roles: &[Role]) -> Action {
        let mut action = Action::new();
        for entry in roles.iter().filter_map(|role| self.acls.get(role)) {
            action.absorb(&entry.grants);
        }
        action
    }

    /// Effective action of `roles` together with all of their ancestors
    pub fn action_for(&self, roles: &[Role]) -> Action {
        let mut resolved = roles.to_vec();
        resolved.extend(self.resolve_parents(roles));
        self.aggregate(&resolved)
    }

    /// Compute the effective action of `roles` and, if `request` is given,
    /// check that it grants the requested operation on the requested resource
    pub fn authorize(&self, roles: &[Role], request: Option<&Authorization>) -> Result<Action> {
        let action = self.action_for(roles);

        let Some(request) = request else {
            return Ok(action);
        };

        if matches_any(&request.resource, action.patterns(request.operation)) {
            debug!(
                "Authorized {} on '{}' for roles {:?}",
                request.operation, request.resource, roles
            );
            Ok(action)
        } else {
            debug!(
                "Denied {} on '{}' for roles {:?}",
                request.operation, request.resource, roles
            );
            Err(AclError::NotAuthorized {
                resource: request.resource.clone(),
                operation: request.operation,
            })
        }
    }
}

/// Collects ACL entries during startup and validates them into an [`AclRegistry`]
#[derive(Debug, Default)]
pub struct AclRegistryBuilder {
    entries: Vec<(Role, AclEntry)>,
}

impl AclRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one role's entry
    pub fn register(mut self, role: impl Into<Role>, entry: AclEntry) -> Self {
        self.entries.push((role.into(), entry));
        self
    }

    /// Register many entries at once
    pub fn extend<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (Role, AclEntry)>,
    {
        self.entries.extend(entries);
        self
    }

    /// Validate and freeze the registry
    ///
    /// # Errors
    ///
    /// - [`AclError::InvalidInput`] for an empty role name
    /// - [`AclError::DuplicateRole`] when a role is registered twice
    /// - [`AclError::CircularParent`] when a parent chain returns to a role on it
    pub fn build(self) -> Result<AclRegistry> {
        let mut acls: HashMap<Role, AclEntry> = HashMap::with_capacity(self.entries.len());

        for (role, entry) in self.entries {
            if role.is_empty() {
                return Err(AclError::InvalidInput("role name cannot be empty".to_string()));
            }
            if acls.contains_key(&role) {
                return Err(AclError::DuplicateRole(role));
            }
            acls.insert(role, entry);
        }

        for (role, entry) in &acls {
            if let Some(parent) = &entry.parent {
                if !acls.contains_key(parent) {
                    warn!("Role '{}' names unregistered parent '{}'", role, parent);
                }
            }
            Self::check_chain(&acls, role)?;
        }

        info!("AclRegistry built with {} roles", acls.len());

        Ok(AclRegistry { acls })
    }

    fn check_chain(acls: &HashMap<Role, AclEntry>, start: &str) -> Result<()> {
        let mut path: Vec<&str> = vec![start];
        let mut current = start;

        while let Some(parent) = acls.get(current).and_then(|e| e.parent.as_deref()) {
            if path.contains(&parent) {
                path.push(parent);
                return Err(AclError::CircularParent(path.join(" -> ")));
            }
            path.push(parent);
            current = parent;
        }

        Ok(())
    }
}
