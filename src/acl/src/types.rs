//! Core ACL types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AclError;

/// Role name
pub type Role = String;

/// Operation kinds, ordered from weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    View,
    Create,
    Edit,
    Remove,
}

impl Operation {
    /// All operations, weakest first
    pub const ALL: [Operation; 4] = [
        Operation::View,
        Operation::Create,
        Operation::Edit,
        Operation::Remove,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::View => "view",
            Operation::Create => "create",
            Operation::Edit => "edit",
            Operation::Remove => "remove",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(Operation::View),
            "create" => Ok(Operation::Create),
            "edit" => Ok(Operation::Edit),
            "remove" => Ok(Operation::Remove),
            other => Err(AclError::InvalidInput(format!("unknown operation '{}'", other))),
        }
    }
}

/// Resource patterns permitted per operation
///
/// Used both for the direct grants of a role and for the effective,
/// already-expanded permissions of a resolved role set. Sequences are
/// ordered and may contain duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub view: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub create: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edit: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<String>,
}

/// Direct grants of a single role
pub type Grants = Action;

fn collect<I, S>(patterns: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    patterns.into_iter().map(Into::into).collect()
}

impl Action {
    /// Create an action with every operation mapped to an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_view<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.view.extend(collect(patterns));
        self
    }

    pub fn with_create<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.create.extend(collect(patterns));
        self
    }

    pub fn with_edit<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edit.extend(collect(patterns));
        self
    }

    pub fn with_remove<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.remove.extend(collect(patterns));
        self
    }

    /// Patterns permitted for a single operation
    pub fn patterns(&self, operation: Operation) -> &[String] {
        match operation {
            Operation::View => &self.view,
            Operation::Create => &self.create,
            Operation::Edit => &self.edit,
            Operation::Remove => &self.remove,
        }
    }

    /// Every pattern across all operations: view, create, edit, then remove
    pub fn resources(&self) -> Vec<String> {
        Operation::ALL
            .iter()
            .flat_map(|op| self.patterns(*op).iter().cloned())
            .collect()
    }

    /// Fold a role's direct grants into this action, applying the implication hierarchy
    ///
    /// A stronger grant is copied into every weaker operation:
    /// `remove` reaches edit, create and view; `edit` reaches create and view;
    /// `create` reaches view.
    pub fn absorb(&mut self, grants: &Grants) {
        for (idx, target) in Operation::ALL.iter().enumerate() {
            let field = match target {
                Operation::View => &mut self.view,
                Operation::Create => &mut self.create,
                Operation::Edit => &mut self.edit,
                Operation::Remove => &mut self.remove,
            };
            for stronger in &Operation::ALL[idx..] {
                field.extend(grants.patterns(*stronger).iter().cloned());
            }
        }
    }
}

/// ACL entry: a role's direct grants and optional parent role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    #[serde(flatten)]
    pub grants: Grants,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Role>,
}

impl AclEntry {
    pub fn new(grants: Grants) -> Self {
        Self {
            grants,
            parent: None,
        }
    }

    /// Inherit every grant of `parent`
    pub fn with_parent(mut self, parent: impl Into<Role>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// Permission a route demands: one operation on one resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Authorization {
    pub resource: String,

    #[serde(alias = "action")]
    pub operation: Operation,
}

impl Authorization {
    pub fn new(resource: impl Into<String>, operation: Operation) -> Self {
        Self {
            resource: resource.into(),
            operation,
        }
    }
}
