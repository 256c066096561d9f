use std::collections::HashSet;

use log::debug;

use crate::config::DetectionConfig;
use crate::detect::form_model::{DetectedForm, FormContainer, FormKind};
use crate::detect::provider;
use crate::dom::dom_model::{Element, NodeId, PageSnapshot};
use crate::dom::query;
use crate::page::domain::{host_of, is_provider_host};

/// One full detection pass over a snapshot. Provider pages use the
/// bespoke selector lists; everything else runs the generic strategy.
/// The result is the complete, deduplicated form set for this pass;
/// previous passes' results are always discarded wholesale.
pub fn detect_forms(snap: &PageSnapshot, config: &DetectionConfig) -> Vec<DetectedForm> {
    let host = host_of(&snap.url);

    let records = if is_provider_host(&host, &config.provider) {
        provider::detect_provider_forms(snap, config)
    } else {
        detect_generic_forms(snap, config)
    };

    let records = dedup_forms(records);
    debug!("detected {} credential form(s) on {}", records.len(), snap.url);
    records
}

fn detect_generic_forms(snap: &PageSnapshot, config: &DetectionConfig) -> Vec<DetectedForm> {
    let mut records = Vec::new();

    for form_el in snap.forms() {
        let passwords: Vec<NodeId> = query::descendants(snap, form_el.node)
            .into_iter()
            .filter(|el| el.is_password_type())
            .map(|el| el.node)
            .collect();

        if passwords.is_empty() {
            continue;
        }

        let username = find_username_field(snap, Some(form_el.node), passwords[0], config);
        let kind = if passwords.len() >= 2 {
            FormKind::Registration
        } else {
            FormKind::Login
        };

        records.push(DetectedForm::new(
            FormContainer::Native { form: form_el.node },
            kind,
            passwords,
            username,
        ));
    }

    if !records.is_empty() {
        return records;
    }

    // No usable form wraps any password input: fall back to standalone
    // password fields, pairing each with a nearby identity input.
    for pw in snap.password_inputs() {
        let username = find_nearby_username(snap, pw, config);
        let container = match query::nearest_form_ancestor(snap, pw.node) {
            Some(form) => FormContainer::Native { form },
            None => FormContainer::Synthetic { anchor: pw.node },
        };

        records.push(DetectedForm::new(
            container,
            FormKind::Login,
            vec![pw.node],
            username,
        ));
    }

    records
}

// ============================================================================
// Username resolution
// ============================================================================

/// Locate the best identity input for a password field, scoped to a
/// container subtree (or the whole document when `scope` is `None`).
///
/// Tiers run in priority order: explicit email type, username/email
/// autocomplete, name/id "email", name/id "username", name/id "user",
/// then any generic text input. Within a tier, a candidate positioned
/// before the password field wins; otherwise the first candidate does.
pub fn find_username_field(
    snap: &PageSnapshot,
    scope: Option<NodeId>,
    before: NodeId,
    config: &DetectionConfig,
) -> Option<NodeId> {
    let pool: Vec<&Element> = match scope {
        Some(root) => query::descendants(snap, root)
            .into_iter()
            .filter(|el| el.is_input() && !el.is_password_type())
            .collect(),
        None => snap
            .inputs()
            .filter(|el| !el.is_password_type())
            .collect(),
    };

    let username_autocomplete = &config.keywords.username_autocomplete;

    let pick = |tier: &dyn Fn(&Element) -> bool| -> Option<NodeId> {
        let matches: Vec<&Element> = pool.iter().copied().filter(|el| tier(el)).collect();
        if matches.is_empty() {
            return None;
        }
        matches
            .iter()
            .find(|el| query::precedes(snap, el.node, before))
            .or_else(|| matches.first())
            .map(|el| el.node)
    };

    pick(&|el| el.r#type.as_deref() == Some("email"))
        .or_else(|| {
            pick(&|el| {
                el.autocomplete.as_deref().is_some_and(|ac| {
                    username_autocomplete.iter().any(|v| ac.eq_ignore_ascii_case(v))
                })
            })
        })
        .or_else(|| pick(&|el| name_or_id_contains(el, "email")))
        .or_else(|| pick(&|el| name_or_id_contains(el, "username")))
        .or_else(|| pick(&|el| name_or_id_contains(el, "user")))
        .or_else(|| pick(&|el| matches!(el.r#type.as_deref(), None | Some("text"))))
}

/// Username search for a standalone password field: parent subtree, then
/// grandparent subtree, then nearest text/email input on screen within the
/// configured distance.
fn find_nearby_username(
    snap: &PageSnapshot,
    pw: &Element,
    config: &DetectionConfig,
) -> Option<NodeId> {
    for level in 1..=2 {
        if let Some(scope) = query::ancestor_at(snap, pw.node, level) {
            if let Some(found) = find_username_field(snap, Some(scope), pw.node, config) {
                return Some(found);
            }
        }
    }

    nearest_identity_input(snap, pw, config.proximity_threshold_px)
}

fn nearest_identity_input(snap: &PageSnapshot, pw: &Element, threshold: f32) -> Option<NodeId> {
    snap.inputs()
        .filter(|el| {
            el.node != pw.node
                && matches!(el.r#type.as_deref(), Some("text") | Some("email"))
        })
        .map(|el| (el.node, query::screen_distance(el, pw)))
        .filter(|(_, distance)| *distance <= threshold)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(node, _)| node)
}

fn name_or_id_contains(el: &Element, key: &str) -> bool {
    [&el.name, &el.id]
        .into_iter()
        .filter_map(|attr| attr.as_deref())
        .any(|attr| attr.to_lowercase().contains(key))
}

/// Drop records whose password/username identity already appeared earlier
/// in the pass.
pub fn dedup_forms(records: Vec<DetectedForm>) -> Vec<DetectedForm> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|form| seen.insert(form.fingerprint.clone()))
        .collect()
}
