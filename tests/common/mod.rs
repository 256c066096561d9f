#![allow(dead_code)]

use chrono::Utc;
use credfill::config::DetectionConfig;
use credfill::dom::dom_model::{Element, NodeId, PageSnapshot};
use credfill::store::model::CredentialRecord;

// ============================================================================
// Element builder
// ============================================================================

/// Fluent builder over `Element` so snapshots stay readable in tests.
pub struct El(Element);

impl El {
    pub fn new(node: NodeId, tag: &str) -> El {
        El(Element {
            node,
            tag: tag.to_string(),
            parent: None,
            r#type: None,
            name: None,
            id: None,
            class: None,
            placeholder: None,
            aria_label: None,
            autocomplete: None,
            test_id: None,
            value: None,
            text: None,
            disabled: false,
            x: 0.0,
            y: 0.0,
        })
    }

    pub fn form(node: NodeId) -> El {
        El::new(node, "form")
    }

    pub fn div(node: NodeId) -> El {
        El::new(node, "div")
    }

    pub fn button(node: NodeId) -> El {
        El::new(node, "button")
    }

    pub fn input(node: NodeId, input_type: &str) -> El {
        El::new(node, "input").r#type(input_type)
    }

    pub fn text_input(node: NodeId) -> El {
        El::input(node, "text")
    }

    pub fn password_input(node: NodeId) -> El {
        El::input(node, "password")
    }

    pub fn r#type(mut self, input_type: &str) -> El {
        self.0.r#type = Some(input_type.to_string());
        self
    }

    pub fn parent(mut self, parent: NodeId) -> El {
        self.0.parent = Some(parent);
        self
    }

    pub fn name(mut self, name: &str) -> El {
        self.0.name = Some(name.to_string());
        self
    }

    pub fn id_attr(mut self, id: &str) -> El {
        self.0.id = Some(id.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> El {
        self.0.class = Some(class.to_string());
        self
    }

    pub fn placeholder(mut self, placeholder: &str) -> El {
        self.0.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn aria_label(mut self, label: &str) -> El {
        self.0.aria_label = Some(label.to_string());
        self
    }

    pub fn autocomplete(mut self, value: &str) -> El {
        self.0.autocomplete = Some(value.to_string());
        self
    }

    pub fn test_id(mut self, value: &str) -> El {
        self.0.test_id = Some(value.to_string());
        self
    }

    pub fn value(mut self, value: &str) -> El {
        self.0.value = Some(value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> El {
        self.0.text = Some(text.to_string());
        self
    }

    pub fn disabled(mut self) -> El {
        self.0.disabled = true;
        self
    }

    pub fn at(mut self, x: f32, y: f32) -> El {
        self.0.x = x;
        self.0.y = y;
        self
    }

    pub fn build(self) -> Element {
        self.0
    }
}

// ============================================================================
// Snapshot and credential builders
// ============================================================================

pub fn page(url: &str, elements: Vec<El>) -> PageSnapshot {
    PageSnapshot {
        url: url.to_string(),
        title: String::new(),
        body_text: String::new(),
        elements: elements.into_iter().map(El::build).collect(),
    }
}

pub fn page_with(url: &str, title: &str, body_text: &str, elements: Vec<El>) -> PageSnapshot {
    PageSnapshot {
        url: url.to_string(),
        title: title.to_string(),
        body_text: body_text.to_string(),
        elements: elements.into_iter().map(El::build).collect(),
    }
}

pub fn credential(id: &str, username: &str, password: &str, website: &str) -> CredentialRecord {
    CredentialRecord {
        id: id.to_string(),
        name: website.to_string(),
        username: username.to_string(),
        password: password.to_string(),
        website: website.to_string(),
        category: "other".to_string(),
        favorite: false,
        folder: None,
        note: None,
        date_added: Utc::now(),
        date_modified: None,
    }
}

pub fn config() -> DetectionConfig {
    DetectionConfig::default()
}
