use crate::detect::form_model::SubmitPlan;
use crate::dom::dom_model::NodeId;
use crate::page::domain::host_of;

// ============================================================================
// Driver inputs
// ============================================================================

/// How a tracked form's submission was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    FormSubmit,
    ControlClick,
    EnterKey,
}

/// A user's answer to a rendered prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptChoice {
    /// Accept the single autofill offer.
    Autofill,
    /// Pick one entry from the chooser.
    Selection { credential_id: String },
    /// Accept the suggested generated password.
    GeneratedPassword,
}

/// Everything the host reports into the driver. DOM mutation batches
/// carry the added nodes' ids; the driver filters for relevance before
/// scheduling a rescan.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Loaded,
    Mutation { added: Vec<NodeId> },
    FieldFocused { node: NodeId },
    UsernameChanged { node: NodeId },
    SubmitIntent { fingerprint: String, trigger: SubmitTrigger },
    PromptAccepted { choice: PromptChoice },
    OutsideClick { target: Option<NodeId> },
}

// ============================================================================
// Driver outputs
// ============================================================================

/// DOM side effects for the host to apply. The engine never touches the
/// page itself.
#[derive(Debug, Clone, PartialEq)]
pub enum PageAction {
    /// Attach focus/change listeners to a tracked field. Re-emitted every
    /// pass; hosts de-duplicate listener registration.
    WatchField { node: NodeId },
    /// Attach a submission listener per the plan (form submit, control
    /// click, or Enter on the field).
    WatchSubmit { fingerprint: String, plan: SubmitPlan },
    /// Set a field's value, optionally dispatching a synthetic input
    /// event so reactive pages notice the change.
    Fill {
        node: NodeId,
        value: String,
        fire_input: bool,
    },
    /// Suppress the next default submission of this form (registration
    /// capture runs before the page navigates away).
    PreventNextSubmit { fingerprint: String },
    /// Execute a submission.
    Submit(SubmitPlan),
}

// ============================================================================
// Session state
// ============================================================================

/// Session-wide mutable detection state, owned exclusively by the driver
/// and reset wholesale on navigation. The two suggestion flags are
/// sticky: once set, they survive every later pass of the same page.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Plain lowercase host of the active page, computed once.
    pub current_host: String,
    pub current_url: String,

    pub credentials_offered: bool,
    pub password_suggestion_shown: bool,

    /// Re-entrancy guard: a pass requested while one is in flight is
    /// dropped, not queued.
    pub processing_forms: bool,

    pub passes: u64,
}

impl SessionState {
    pub fn new(url: &str) -> SessionState {
        SessionState {
            current_host: host_of(url),
            current_url: url.to_string(),
            credentials_offered: false,
            password_suggestion_shown: false,
            processing_forms: false,
            passes: 0,
        }
    }

    /// Full reset for a navigation to a new page.
    pub fn reset_for(&mut self, url: &str) {
        *self = SessionState::new(url);
    }
}
