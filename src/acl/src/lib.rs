//! # Seill ACL Engine
//!
//! Role-hierarchy access control for multi-tenant API backends.
//!
//! ## Features
//!
//! - **Role hierarchy**: each role may name a parent whose grants it inherits
//! - **Action implication**: `remove` implies `edit`, `edit` implies `create`,
//!   `create` implies `view`
//! - **Resource matching**: exact resource identifiers or the universal `*`
//! - **Pluggable identities**: static role lists or an external identity store
//!
//! ## Example
//!
//! ```rust
//! use seill_acl::{AclEntry, AclRegistry, Authorization, Grants, Operation};
//!
//! # fn main() -> seill_acl::Result<()> {
//! let registry = AclRegistry::builder()
//!     .register("editor", AclEntry::new(Grants::new().with_edit(["doc"])))
//!     .register("admin", AclEntry::new(Grants::new().with_remove(["doc"])).with_parent("editor"))
//!     .build()?;
//!
//! let roles = vec!["admin".to_string()];
//! let action = registry.authorize(&roles, Some(&Authorization::new("doc", Operation::View)))?;
//!
//! assert!(action.view.contains(&"doc".to_string()));
//! # Ok(())
//! # }
//! ```

pub mod authorizer;
pub mod error;
pub mod identity;
pub mod matcher;
pub mod registry;
pub mod store;
pub mod types;

pub use authorizer::{
    authorize_roles, Authorized, Authorizer, AuthorizerFactory, ExternalAuthorizer, LookupPolicy,
    StaticAuthorizer,
};
pub use error::{AclError, Result, StoreError};
pub use identity::{ExternalIdentity, Identity, IdentityKind, StaticIdentity};
pub use matcher::{matches, matches_any};
pub use registry::{AclRegistry, AclRegistryBuilder};
pub use store::{IdentityStore, InMemoryIdentityStore, UserAttribute, UserRecord};
pub use types::{AclEntry, Action, Authorization, Grants, Operation, Role};

/// Custom attribute on an identity-store record holding space-separated role names
pub const ROLES_ATTRIBUTE: &str = "custom:roles";

/// Role assumed when an identity's roles cannot be resolved
pub const GUEST_ROLE: &str = "guest";

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
