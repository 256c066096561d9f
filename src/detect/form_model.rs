use serde::Serialize;

use crate::config::DetectionConfig;
use crate::dom::dom_model::{Element, NodeId, PageSnapshot};
use crate::dom::query;

// ============================================================================
// Detected form records
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormKind {
    Login,
    Registration,
}

/// The owning container of a detected credential form: either a real
/// `<form>` element, or a synthetic wrapper around a standalone password
/// field. Both variants expose the same capability set (field lookup and
/// a submit plan) so the rest of the pipeline treats them uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "container", rename_all = "camelCase")]
pub enum FormContainer {
    Native { form: NodeId },
    Synthetic { anchor: NodeId },
}

/// How the host should trigger (or listen for) this form's submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "submit", rename_all = "camelCase")]
pub enum SubmitPlan {
    /// Dispatch/observe a native form submission.
    SubmitForm { form: NodeId },
    /// Click/observe a discovered submit-looking control.
    ClickControl { control: NodeId },
    /// No control found: dispatch Enter on the password field.
    PressEnter { field: NodeId },
}

impl FormContainer {
    pub fn root(&self) -> NodeId {
        match *self {
            FormContainer::Native { form } => form,
            FormContainer::Synthetic { anchor } => anchor,
        }
    }

    /// Password-type inputs currently inside this container. Stale
    /// containers yield an empty list.
    pub fn password_fields(&self, snap: &PageSnapshot) -> Vec<NodeId> {
        match *self {
            FormContainer::Native { form } => query::descendants(snap, form)
                .into_iter()
                .filter(|el| el.is_password_type())
                .map(|el| el.node)
                .collect(),
            FormContainer::Synthetic { anchor } => snap
                .get(anchor)
                .filter(|el| el.is_password_type())
                .map(|el| vec![el.node])
                .unwrap_or_default(),
        }
    }

    /// How to submit this container, resolved against the current
    /// snapshot.
    pub fn submit_plan(&self, snap: &PageSnapshot, config: &DetectionConfig) -> SubmitPlan {
        match *self {
            FormContainer::Native { form } => SubmitPlan::SubmitForm { form },
            FormContainer::Synthetic { anchor } => {
                match find_submit_control(snap, anchor, config) {
                    Some(control) => SubmitPlan::ClickControl { control },
                    None => SubmitPlan::PressEnter { field: anchor },
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectedForm {
    pub container: FormContainer,
    pub kind: FormKind,
    /// At least one entry; more than one signals a password + confirm pair.
    pub password_fields: Vec<NodeId>,
    pub username_field: Option<NodeId>,
    /// Identity of this record across passes, derived from the field node
    /// ids. Two records with the same fields carry the same fingerprint.
    pub fingerprint: String,
}

impl DetectedForm {
    pub fn new(
        container: FormContainer,
        kind: FormKind,
        password_fields: Vec<NodeId>,
        username_field: Option<NodeId>,
    ) -> DetectedForm {
        let fingerprint = form_fingerprint(&password_fields, username_field);
        DetectedForm {
            container,
            kind,
            password_fields,
            username_field,
            fingerprint,
        }
    }

    pub fn primary_password(&self) -> Option<NodeId> {
        self.password_fields.first().copied()
    }

    pub fn tracks_field(&self, node: NodeId) -> bool {
        self.password_fields.contains(&node) || self.username_field == Some(node)
    }
}

/// Fingerprint of a password/username pairing, used for within-pass dedup
/// and trace correlation.
pub fn form_fingerprint(password_fields: &[NodeId], username_field: Option<NodeId>) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    for id in password_fields {
        hasher.update(id.to_le_bytes());
    }
    hasher.update(match username_field {
        Some(id) => id.to_le_bytes(),
        None => u64::MAX.to_le_bytes(),
    });
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// Submit-control discovery
// ============================================================================

/// Search the ancestor chain of a standalone password field for a
/// submit-looking control.
pub fn find_submit_control(
    snap: &PageSnapshot,
    anchor: NodeId,
    config: &DetectionConfig,
) -> Option<NodeId> {
    for level in 1..=config.submit_search_levels {
        let Some(scope) = query::ancestor_at(snap, anchor, level) else {
            break;
        };
        if let Some(control) = query::descendants(snap, scope)
            .into_iter()
            .find(|el| is_submit_control(el, config))
        {
            return Some(control.node);
        }
    }
    None
}

/// Submit-looking: a button-like element whose type, class, test-id, or
/// label text matches the configured submit vocabulary.
pub fn is_submit_control(el: &Element, config: &DetectionConfig) -> bool {
    if el.disabled {
        return false;
    }

    let button_like = matches!(el.tag.as_str(), "button" | "input" | "a");
    if !button_like {
        return false;
    }

    if el.r#type.as_deref() == Some("submit") {
        return true;
    }

    let keywords = &config.keywords;

    if let Some(class) = el.class.as_deref() {
        let lower = class.to_lowercase();
        if keywords.submit_classes.iter().any(|c| lower.contains(c)) {
            return true;
        }
    }

    if let Some(test_id) = el.test_id.as_deref() {
        let lower = test_id.to_lowercase();
        if keywords.submit_test_ids.iter().any(|t| lower.contains(t)) {
            return true;
        }
    }

    let label = el
        .text
        .as_deref()
        .or(el.aria_label.as_deref())
        .or(el.value.as_deref());
    if let Some(label) = label {
        let lower = label.to_lowercase();
        if keywords.submit_labels.iter().any(|l| lower.contains(l)) {
            return true;
        }
    }

    false
}
