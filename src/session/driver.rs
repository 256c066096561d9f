use chrono::Utc;
use log::debug;

use crate::config::DetectionConfig;
use crate::detect::detector::detect_forms;
use crate::detect::form_model::DetectedForm;
use crate::dom::dom_model::{Element, NodeId, PageSnapshot};
use crate::dom::query;
use crate::fields::classifier::is_password_candidate;
use crate::generate::password::generate_password;
use crate::matcher::capture::capture_submission;
use crate::matcher::matcher::{self, AutofillDecision, MatchState};
use crate::page::classify::{PageClass, PageKind, classify_page};
use crate::page::domain::is_provider_host;
use crate::session::scheduler::RescanScheduler;
use crate::session::session_model::{
    PageAction, PageEvent, PromptChoice, SessionState, SubmitTrigger,
};
use crate::store::store::{StoreClient, StoreTransport};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::DetectionEvent;
use crate::ui::presenter::{Presenter, Prompt};

#[derive(Debug, Clone)]
struct PendingCapture {
    due_at: u64,
    fingerprint: String,
    resubmit: bool,
}

#[derive(Debug, Clone)]
struct PendingSubmit {
    due_at: u64,
    fingerprint: String,
}

/// The continuous re-detection driver. Owns all session-wide detection
/// state, re-runs the detector and classifier as the page churns, and
/// turns matches into prompts, fills, and captures.
///
/// Single-threaded and host-clock-driven: the host reports events through
/// `handle_event` and advances time through `tick`; both return the DOM
/// actions the host should apply.
pub struct DetectionDriver {
    config: DetectionConfig,
    state: SessionState,
    scheduler: RescanScheduler,
    match_state: MatchState,
    forms: Vec<DetectedForm>,
    page: PageClass,
    store: StoreClient,
    presenter: Box<dyn Presenter>,
    tracer: TraceLogger,
    pending_captures: Vec<PendingCapture>,
    pending_submits: Vec<PendingSubmit>,
}

impl DetectionDriver {
    pub fn new(
        config: DetectionConfig,
        url: &str,
        transport: Box<dyn StoreTransport>,
        presenter: Box<dyn Presenter>,
        tracer: TraceLogger,
        now: u64,
    ) -> DetectionDriver {
        let scheduler = RescanScheduler::new(&config.timing, now);
        DetectionDriver {
            state: SessionState::new(url),
            scheduler,
            match_state: MatchState::Idle,
            forms: Vec::new(),
            page: PageClass::default(),
            store: StoreClient::new(transport),
            presenter,
            tracer,
            config,
            pending_captures: Vec::new(),
            pending_submits: Vec::new(),
        }
    }

    pub fn forms(&self) -> &[DetectedForm] {
        &self.forms
    }

    pub fn page(&self) -> PageClass {
        self.page
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    /// Navigation to a new page: reset the whole session.
    pub fn reset_for(&mut self, url: &str, now: u64) {
        self.state.reset_for(url);
        self.scheduler.reset(now);
        self.match_state = MatchState::Idle;
        self.forms.clear();
        self.page = PageClass::default();
        self.pending_captures.clear();
        self.pending_submits.clear();
    }

    /// Advance the host clock: runs due rescans, delayed captures, and
    /// scheduled auto-submits.
    pub fn tick(&mut self, snap: &PageSnapshot, now: u64) -> Vec<PageAction> {
        let mut actions = Vec::new();

        if self.scheduler.take_due(now) {
            actions.extend(self.run_pass(snap, now));
        }

        actions.extend(self.run_due_captures(snap, now));
        actions.extend(self.run_due_submits(snap, now));
        actions
    }

    pub fn handle_event(
        &mut self,
        event: &PageEvent,
        snap: &PageSnapshot,
        now: u64,
    ) -> Vec<PageAction> {
        match event {
            PageEvent::Loaded => {
                self.scheduler.on_load(now);
                self.run_pass(snap, now)
            }

            PageEvent::Mutation { added } => {
                if mutation_needs_rescan(snap, added, &self.config) {
                    debug!("relevant DOM mutation, scheduling rescan");
                    self.scheduler.on_mutation(now);
                }
                Vec::new()
            }

            PageEvent::FieldFocused { node } => self.on_field_focused(*node, snap),
            PageEvent::UsernameChanged { node } => self.on_username_changed(*node, snap),
            PageEvent::SubmitIntent {
                fingerprint,
                trigger,
            } => self.on_submit_intent(fingerprint, *trigger, now),
            PageEvent::PromptAccepted { choice } => self.on_prompt_accepted(choice, snap, now),
            PageEvent::OutsideClick { target } => self.on_outside_click(*target),
        }
    }

    // ========================================================================
    // Detection pass
    // ========================================================================

    fn run_pass(&mut self, snap: &PageSnapshot, _now: u64) -> Vec<PageAction> {
        if self.state.processing_forms {
            debug!("detection pass already in flight, dropping request");
            return Vec::new();
        }
        self.state.processing_forms = true;
        self.state.passes += 1;
        let pass = self.state.passes;

        self.tracer
            .log(&DetectionEvent::now(pass, "pass_start").with_url(&snap.url));

        // Discovery completes before classification, which completes
        // before listener attachment and credential querying.
        self.forms = detect_forms(snap, &self.config);
        self.page = classify_page(snap, &self.forms, &self.config);

        for form in &self.forms {
            self.tracer.log(
                &DetectionEvent::now(pass, "form_detected")
                    .with_detail(format!("{:?}", form.kind))
                    .with_fingerprint(&form.fingerprint),
            );
        }
        self.tracer.log(
            &DetectionEvent::now(pass, "page_classified").with_detail(format!(
                "login={} registration={}",
                self.page.is_login, self.page.is_registration
            )),
        );

        let mut actions = Vec::new();
        for form in &self.forms {
            for pw in &form.password_fields {
                actions.push(PageAction::WatchField { node: *pw });
            }
            if let Some(username) = form.username_field {
                actions.push(PageAction::WatchField { node: username });
            }
            actions.push(PageAction::WatchSubmit {
                fingerprint: form.fingerprint.clone(),
                plan: form.container.submit_plan(snap, &self.config),
            });
        }

        self.check_saved(snap, None);

        self.state.processing_forms = false;
        actions
    }

    /// Query stored credentials and drive the suggestion flow. Prompts go
    /// through the presenter; fills happen only on acceptance.
    fn check_saved(&mut self, snap: &PageSnapshot, typed: Option<String>) {
        let provider = is_provider_host(&self.state.current_host, &self.config.provider);
        let login_like = self.page.is_login || (provider && !self.page.is_registration);

        if login_like {
            // Sticky: once offered, never query or prompt again this page.
            if self.state.credentials_offered {
                return;
            }

            let host = self.state.current_host.clone();
            let mut credentials = self.store.passwords_for_domain(&host);
            if credentials.is_empty() && provider {
                // Retry broadly against the collapsed canonical domain.
                let canonical = self.config.provider.canonical_host.clone();
                credentials = self.store.passwords_for_domain(&canonical);
            }

            let typed = typed.or_else(|| self.typed_username(snap));
            let Some(anchor) = self.prompt_anchor(snap) else {
                return;
            };

            match matcher::decide(credentials, typed.as_deref()) {
                AutofillDecision::NoMatch => {}
                AutofillDecision::Single(credential) => {
                    self.presenter.show(&Prompt::Autofill {
                        credential: credential.clone(),
                        anchor,
                    });
                    self.match_state = MatchState::OfferingAutofill { credential };
                    self.state.credentials_offered = true;
                    self.tracer
                        .log(&DetectionEvent::now(self.state.passes, "offer_autofill"));
                }
                AutofillDecision::Multiple(credentials) => {
                    self.presenter.show(&Prompt::Selection {
                        credentials: credentials.clone(),
                        anchor,
                    });
                    self.match_state = MatchState::OfferingSelection { credentials };
                    self.state.credentials_offered = true;
                    self.tracer
                        .log(&DetectionEvent::now(self.state.passes, "offer_selection"));
                }
            }
        } else if self.page.is_registration && !self.state.password_suggestion_shown {
            let target = self.forms.iter().find_map(|form| {
                let node = form.primary_password()?;
                let el = snap.get(node)?;
                el.value_is_empty().then_some(node)
            });

            if let Some(field) = target {
                self.suggest_generated(field);
            }
        }
    }

    fn suggest_generated(&mut self, field: NodeId) {
        let password = generate_password();
        self.presenter.show(&Prompt::GeneratedPassword {
            password: password.clone(),
            field,
        });
        self.match_state = MatchState::SuggestingGenerated { password, field };
        self.state.password_suggestion_shown = true;
        self.tracer
            .log(&DetectionEvent::now(self.state.passes, "suggest_password"));
    }

    // ========================================================================
    // Event handlers
    // ========================================================================

    fn on_field_focused(&mut self, node: NodeId, snap: &PageSnapshot) -> Vec<PageAction> {
        let provider_reg_url = is_provider_host(&self.state.current_host, &self.config.provider)
            && self
                .config
                .provider
                .registration_paths
                .iter()
                .any(|p| self.state.current_url.to_lowercase().contains(p));

        if !(self.page.is_registration || provider_reg_url) {
            return Vec::new();
        }
        if self.state.password_suggestion_shown {
            return Vec::new();
        }
        if !self.forms.iter().any(|f| f.password_fields.contains(&node)) {
            return Vec::new();
        }
        if snap.get(node).map(|el| el.value_is_empty()) != Some(true) {
            return Vec::new();
        }

        self.suggest_generated(node);
        Vec::new()
    }

    fn on_username_changed(&mut self, node: NodeId, snap: &PageSnapshot) -> Vec<PageAction> {
        let typed = snap
            .get(node)
            .and_then(|el| el.value.clone())
            .unwrap_or_default();
        let typed = typed.trim();
        if typed.is_empty() {
            return Vec::new();
        }

        self.check_saved(snap, Some(typed.to_string()));
        Vec::new()
    }

    fn on_submit_intent(
        &mut self,
        fingerprint: &str,
        _trigger: SubmitTrigger,
        now: u64,
    ) -> Vec<PageAction> {
        if !self.forms.iter().any(|f| f.fingerprint == fingerprint) {
            return Vec::new();
        }

        // Registration captures must run before the page navigates away,
        // so the default submission is suppressed and re-triggered after
        // the capture.
        let suppress = self.page.kind() == PageKind::Registration;
        self.pending_captures.push(PendingCapture {
            due_at: now + self.config.timing.capture_delay_ms,
            fingerprint: fingerprint.to_string(),
            resubmit: suppress,
        });

        if suppress {
            vec![PageAction::PreventNextSubmit {
                fingerprint: fingerprint.to_string(),
            }]
        } else {
            Vec::new()
        }
    }

    fn on_prompt_accepted(
        &mut self,
        choice: &PromptChoice,
        snap: &PageSnapshot,
        now: u64,
    ) -> Vec<PageAction> {
        let state = std::mem::replace(&mut self.match_state, MatchState::Done);

        match (state, choice) {
            (
                MatchState::SuggestingGenerated { password, field },
                PromptChoice::GeneratedPassword,
            ) => {
                let Some(form) = self
                    .forms
                    .iter()
                    .find(|f| f.password_fields.contains(&field))
                    .cloned()
                else {
                    return Vec::new();
                };
                matcher::generated_fill_plan(&form, &password, snap)
            }

            (MatchState::OfferingAutofill { credential }, PromptChoice::Autofill) => {
                self.fill_and_maybe_submit(&credential, snap, now)
            }

            (
                MatchState::OfferingSelection { credentials },
                PromptChoice::Selection { credential_id },
            ) => match credentials.into_iter().find(|c| &c.id == credential_id) {
                Some(credential) => self.fill_and_maybe_submit(&credential, snap, now),
                None => Vec::new(),
            },

            // Acknowledgement does not match what is on offer: restore.
            (other, _) => {
                self.match_state = other;
                Vec::new()
            }
        }
    }

    fn fill_and_maybe_submit(
        &mut self,
        credential: &crate::store::model::CredentialRecord,
        snap: &PageSnapshot,
        now: u64,
    ) -> Vec<PageAction> {
        let Some(form) = self.forms.first().cloned() else {
            return Vec::new();
        };

        let actions = matcher::credential_fill_plan(&form, credential, snap);

        // The provider swallows plain value assignment on some surfaces;
        // submitting right after the fill keeps the flow moving.
        if is_provider_host(&self.state.current_host, &self.config.provider) {
            self.pending_submits.push(PendingSubmit {
                due_at: now + self.config.timing.auto_submit_delay_ms,
                fingerprint: form.fingerprint.clone(),
            });
        }

        actions
    }

    fn on_outside_click(&mut self, target: Option<NodeId>) -> Vec<PageAction> {
        if !self.match_state.is_offering() {
            return Vec::new();
        }

        // Clicks landing on a tracked field keep the prompt up.
        if let Some(node) = target {
            if self.forms.iter().any(|f| f.tracks_field(node)) {
                return Vec::new();
            }
        }

        self.presenter.dismiss();
        self.match_state = MatchState::Done;
        Vec::new()
    }

    // ========================================================================
    // Scheduled work
    // ========================================================================

    fn run_due_captures(&mut self, snap: &PageSnapshot, now: u64) -> Vec<PageAction> {
        let mut due = Vec::new();
        self.pending_captures.retain(|p| {
            if p.due_at <= now {
                due.push(p.clone());
                false
            } else {
                true
            }
        });

        let mut actions = Vec::new();
        for pending in due {
            let Some(form) = self
                .forms
                .iter()
                .find(|f| f.fingerprint == pending.fingerprint)
                .cloned()
            else {
                continue;
            };

            let outcome = capture_submission(
                &form,
                snap,
                self.page,
                &mut self.store,
                &self.config,
                Utc::now(),
            );
            self.tracer.log(
                &DetectionEvent::now(self.state.passes, "capture")
                    .with_detail(format!("{:?}", outcome))
                    .with_fingerprint(&form.fingerprint),
            );

            // A suppressed default submission is re-triggered whether or
            // not the capture stored anything; the page must never break.
            if pending.resubmit {
                actions.push(PageAction::Submit(
                    form.container.submit_plan(snap, &self.config),
                ));
            }
        }
        actions
    }

    fn run_due_submits(&mut self, snap: &PageSnapshot, now: u64) -> Vec<PageAction> {
        let mut due = Vec::new();
        self.pending_submits.retain(|p| {
            if p.due_at <= now {
                due.push(p.clone());
                false
            } else {
                true
            }
        });

        let mut actions = Vec::new();
        for pending in due {
            let Some(form) = self
                .forms
                .iter()
                .find(|f| f.fingerprint == pending.fingerprint)
            else {
                continue;
            };
            actions.push(PageAction::Submit(
                form.container.submit_plan(snap, &self.config),
            ));
        }
        actions
    }

    fn typed_username(&self, snap: &PageSnapshot) -> Option<String> {
        let form = self.forms.first()?;
        let node = form.username_field?;
        let value = snap.get(node)?.value.clone()?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Where a prompt should anchor: the first form's username field,
    /// else its password field. No form, no prompt.
    fn prompt_anchor(&self, snap: &PageSnapshot) -> Option<NodeId> {
        let form = self.forms.first()?;
        form.username_field
            .filter(|n| snap.contains(*n))
            .or_else(|| form.primary_password().filter(|n| snap.contains(*n)))
    }
}

// ============================================================================
// Mutation filtering
// ============================================================================

/// Whether a mutation batch warrants a rescan: it added a form, a
/// password-like input, or a provider identity field (directly or in a
/// subtree).
fn mutation_needs_rescan(snap: &PageSnapshot, added: &[NodeId], config: &DetectionConfig) -> bool {
    added.iter().any(|node| {
        let Some(root) = snap.get(*node) else {
            return false;
        };
        if is_relevant(root, config) {
            return true;
        }
        query::descendants(snap, root.node)
            .into_iter()
            .any(|el| is_relevant(el, config))
    })
}

fn is_relevant(el: &Element, config: &DetectionConfig) -> bool {
    el.is_form()
        || el.is_password_type()
        || is_password_candidate(el, &config.keywords)
        || config
            .provider
            .login_username
            .iter()
            .chain(config.provider.login_password.iter())
            .any(|s| s.matches(el))
}
