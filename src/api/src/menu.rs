//! Navigation menu filtered by granted resources

use seill_acl::matches;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub title: String,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub link: Option<String>,

    #[serde(default)]
    pub home: Option<bool>,

    #[serde(default)]
    pub group: Option<bool>,

    /// `None` shows the item to anyone holding at least one grant
    #[serde(default)]
    pub resource: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_children(mut self, children: Vec<MenuItem>) -> Self {
        self.children = children;
        self
    }
}

/// Full menu tree, fixed at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Items visible to a holder of `resources`, in menu order
    ///
    /// An item stays when it has no resource or some pattern in `resources`
    /// matches its resource; its children are filtered the same way. With no
    /// patterns at all, nothing is visible.
    pub fn visible(&self, resources: &[String]) -> Vec<MenuItem> {
        Self::filter(&self.items, resources)
    }

    fn filter(items: &[MenuItem], resources: &[String]) -> Vec<MenuItem> {
        items
            .iter()
            .filter(|item| {
                resources.iter().any(|pattern| match &item.resource {
                    None => true,
                    Some(resource) => matches(resource, pattern),
                })
            })
            .map(|item| MenuItem {
                children: Self::filter(&item.children, resources),
                ..item.clone()
            })
            .collect()
    }
}
