use serde::{Deserialize, Serialize};

/// Host-assigned element identifier, stable across snapshots of the same
/// page (the way DevTools backend node ids are). A `NodeId` that no longer
/// resolves in the current snapshot is a stale reference and must be
/// treated as "abandon silently" by every consumer.
pub type NodeId = u64;

/// A serialized view of one page's input-bearing DOM, extracted by the
/// host. Elements are listed in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "bodyText")]
    pub body_text: String,
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub node: NodeId,
    pub tag: String,
    #[serde(default)]
    pub parent: Option<NodeId>,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// The html `id` attribute, distinct from `node`.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default, rename = "ariaLabel")]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub autocomplete: Option<String>,
    #[serde(default, rename = "testId")]
    pub test_id: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    /// Viewport coordinates of the element's top-left corner, used for the
    /// nearest-field proximity fallback.
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

impl Element {
    pub fn is_input(&self) -> bool {
        self.tag == "input"
    }

    pub fn is_password_type(&self) -> bool {
        self.is_input() && self.r#type.as_deref() == Some("password")
    }

    pub fn is_form(&self) -> bool {
        self.tag == "form"
    }

    pub fn value_is_empty(&self) -> bool {
        self.value.as_deref().map(str::trim).unwrap_or("").is_empty()
    }
}

impl PageSnapshot {
    /// Resolve a node id against this snapshot. `None` means the reference
    /// is stale.
    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.elements.iter().find(|el| el.node == node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    /// Document-order position of a node (its index in the element list).
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.elements.iter().position(|el| el.node == node)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|el| el.is_input())
    }

    pub fn forms(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|el| el.is_form())
    }

    pub fn password_inputs(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|el| el.is_password_type())
    }
}
