use crate::dom::dom_model::NodeId;
use crate::store::model::CredentialRecord;

/// What the presentation layer should render. The engine never owns
/// rendering; user responses come back asynchronously as page events.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    /// Single saved credential: offer to autofill it.
    Autofill {
        credential: CredentialRecord,
        anchor: NodeId,
    },
    /// Several saved credentials: let the user choose. Duplicates are
    /// shown as-is; the store never dedups on save.
    Selection {
        credentials: Vec<CredentialRecord>,
        anchor: NodeId,
    },
    /// Registration page: suggest a generated password.
    GeneratedPassword { password: String, field: NodeId },
}

pub trait Presenter {
    fn show(&mut self, prompt: &Prompt);
    fn dismiss(&mut self);
}

/// Presenter that records what it was asked to render; the test double
/// for every driver test.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub shown: Vec<Prompt>,
    pub dismissed: u32,
}

impl RecordingPresenter {
    pub fn new() -> RecordingPresenter {
        RecordingPresenter::default()
    }
}

impl Presenter for RecordingPresenter {
    fn show(&mut self, prompt: &Prompt) {
        self.shown.push(prompt.clone());
    }

    fn dismiss(&mut self) {
        self.dismissed += 1;
    }
}

/// Handle to a `RecordingPresenter` that can be held on both sides of a
/// driver: the driver renders through its clone, the owner inspects what
/// was shown.
#[derive(Clone, Default)]
pub struct SharedPresenter {
    inner: std::rc::Rc<std::cell::RefCell<RecordingPresenter>>,
}

impl SharedPresenter {
    pub fn new() -> SharedPresenter {
        SharedPresenter::default()
    }

    pub fn shown(&self) -> Vec<Prompt> {
        self.inner.borrow().shown.clone()
    }

    pub fn dismissed(&self) -> u32 {
        self.inner.borrow().dismissed
    }
}

impl Presenter for SharedPresenter {
    fn show(&mut self, prompt: &Prompt) {
        self.inner.borrow_mut().show(prompt);
    }

    fn dismiss(&mut self) {
        self.inner.borrow_mut().dismiss();
    }
}
