//! Request context handed through the dispatcher

use seill_acl::{Action, Authorized, Identity, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound request, and after authorization the principal's resolved grants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub stage: String,

    pub request_id: String,

    /// Opaque to the dispatcher
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,

    /// Set only when the route was guarded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Role>>,

    /// Set only when the route was guarded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

impl Request {
    pub fn new(stage: impl Into<String>, request_id: impl Into<String>, payload: Value) -> Self {
        Self {
            stage: stage.into(),
            request_id: request_id.into(),
            payload,
            identity: None,
            roles: None,
            action: None,
        }
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Attach the outcome of a successful authorization
    pub fn with_grant(mut self, granted: Authorized) -> Self {
        self.roles = Some(granted.roles);
        self.action = Some(granted.action);
        self
    }

    /// Resources the principal may see, across all operations
    pub fn granted_resources(&self) -> Vec<String> {
        self.action.as_ref().map(Action::resources).unwrap_or_default()
    }
}
