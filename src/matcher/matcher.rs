use crate::detect::form_model::DetectedForm;
use crate::dom::dom_model::{NodeId, PageSnapshot};
use crate::session::session_model::PageAction;
use crate::store::model::CredentialRecord;

// ============================================================================
// Match state machine
// ============================================================================

/// Per-page-session suggestion state. Every offering state is terminal
/// once resolved (accepted or dismissed); the sticky session flags ensure
/// nothing is offered twice.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchState {
    Idle,
    SuggestingGenerated {
        password: String,
        field: NodeId,
    },
    OfferingAutofill {
        credential: CredentialRecord,
    },
    OfferingSelection {
        credentials: Vec<CredentialRecord>,
    },
    Done,
}

impl MatchState {
    pub fn is_offering(&self) -> bool {
        matches!(
            self,
            MatchState::SuggestingGenerated { .. }
                | MatchState::OfferingAutofill { .. }
                | MatchState::OfferingSelection { .. }
        )
    }
}

// ============================================================================
// Autofill decision
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum AutofillDecision {
    NoMatch,
    Single(CredentialRecord),
    Multiple(Vec<CredentialRecord>),
}

/// Decide what to offer for a credential set. A typed username exactly
/// matching one stored record short-circuits to a single offer instead of
/// the full chooser.
pub fn decide(
    mut credentials: Vec<CredentialRecord>,
    typed_username: Option<&str>,
) -> AutofillDecision {
    if credentials.is_empty() {
        return AutofillDecision::NoMatch;
    }

    if let Some(typed) = typed_username.map(str::trim).filter(|t| !t.is_empty()) {
        if let Some(matching) = credentials.iter().find(|c| c.username == typed) {
            return AutofillDecision::Single(matching.clone());
        }
    }

    if credentials.len() == 1 {
        return AutofillDecision::Single(credentials.remove(0));
    }

    AutofillDecision::Multiple(credentials)
}

// ============================================================================
// Fill plans
// ============================================================================

/// Actions applying a stored credential to a form. Fields removed from the
/// document since detection are skipped silently.
pub fn credential_fill_plan(
    form: &DetectedForm,
    credential: &CredentialRecord,
    snap: &PageSnapshot,
) -> Vec<PageAction> {
    let mut actions = Vec::new();

    if let Some(username) = form.username_field.filter(|n| snap.contains(*n)) {
        actions.push(PageAction::Fill {
            node: username,
            value: credential.username.clone(),
            fire_input: true,
        });
    }

    for pw in &form.password_fields {
        if snap.contains(*pw) {
            actions.push(PageAction::Fill {
                node: *pw,
                value: credential.password.clone(),
                fire_input: true,
            });
        }
    }

    actions
}

/// Actions applying a generated password to the primary and any
/// confirm/secondary password field, all with the same value.
pub fn generated_fill_plan(
    form: &DetectedForm,
    password: &str,
    snap: &PageSnapshot,
) -> Vec<PageAction> {
    form.password_fields
        .iter()
        .filter(|n| snap.contains(**n))
        .map(|n| PageAction::Fill {
            node: *n,
            value: password.to_string(),
            fire_input: true,
        })
        .collect()
}
