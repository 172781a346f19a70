//! Principal descriptors
//!
//! An [`Identity`] says which resolution strategy applies to an
//! already-authenticated principal and carries the data that strategy needs.

use serde::{Deserialize, Serialize};

use crate::types::Role;

/// How a principal's roles are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityKind {
    /// Roles travel with the identity
    Static,
    /// Roles are read from an external identity store
    External,
    /// Anything else; no authorizer can be selected
    #[serde(other)]
    Unknown,
}

/// Static identity payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticIdentity {
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub username: String,
}

/// External identity payload: where to look the principal up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIdentity {
    pub user_pool_id: String,
    pub username: String,
}

/// Principal descriptor
///
/// Only the payload matching `kind` is consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,

    #[serde(rename = "type")]
    pub kind: IdentityKind,

    #[serde(default, rename = "static", skip_serializing_if = "Option::is_none")]
    pub static_identity: Option<StaticIdentity>,

    #[serde(default, rename = "external", skip_serializing_if = "Option::is_none")]
    pub external_identity: Option<ExternalIdentity>,
}

impl Identity {
    /// Identity carrying its roles directly
    pub fn fixed<I, S>(roles: I, username: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Role>,
    {
        Self {
            member_id: None,
            kind: IdentityKind::Static,
            static_identity: Some(StaticIdentity {
                roles: roles.into_iter().map(Into::into).collect(),
                username: username.into(),
            }),
            external_identity: None,
        }
    }

    /// Identity resolved through the identity store
    pub fn external(user_pool_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            member_id: None,
            kind: IdentityKind::External,
            static_identity: None,
            external_identity: Some(ExternalIdentity {
                user_pool_id: user_pool_id.into(),
                username: username.into(),
            }),
        }
    }

    pub fn with_member_id(mut self, member_id: impl Into<String>) -> Self {
        self.member_id = Some(member_id.into());
        self
    }
}
