mod common;

use common::{El, config, credential, page, page_with};
use credfill::detect::form_model::SubmitPlan;
use credfill::dom::dom_model::PageSnapshot;
use credfill::matcher::matcher::MatchState;
use credfill::session::driver::DetectionDriver;
use credfill::session::session_model::{PageAction, PageEvent, PromptChoice, SubmitTrigger};
use credfill::store::model::CredentialRecord;
use credfill::store::store::SharedMemoryStore;
use credfill::trace::logger::TraceLogger;
use credfill::ui::presenter::{Prompt, SharedPresenter};

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    driver: DetectionDriver,
    store: SharedMemoryStore,
    presenter: SharedPresenter,
}

fn harness(url: &str, records: Vec<CredentialRecord>) -> Harness {
    let store = SharedMemoryStore::with_records(records);
    let presenter = SharedPresenter::new();
    let driver = DetectionDriver::new(
        config(),
        url,
        Box::new(store.clone()),
        Box::new(presenter.clone()),
        TraceLogger::disabled(),
        0,
    );
    Harness {
        driver,
        store,
        presenter,
    }
}

fn login_snapshot(url: &str) -> PageSnapshot {
    page(
        url,
        vec![
            El::form(1),
            El::text_input(2).parent(1).name("email"),
            El::password_input(3).parent(1),
        ],
    )
}

fn fills_of(actions: &[PageAction]) -> Vec<(u64, String)> {
    actions
        .iter()
        .filter_map(|a| match a {
            PageAction::Fill { node, value, .. } => Some((*node, value.clone())),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Autofill offers
// ============================================================================

#[test]
fn single_credential_offers_autofill_and_fills_on_accept() {
    let record = credential("1", "a@x.com", "p1", "https://x.com");
    let mut h = harness("https://x.com/login", vec![record.clone()]);
    let snap = login_snapshot("https://x.com/login");

    let actions = h.driver.tick(&snap, 0);

    // The pass attaches listeners before anything user-visible happens.
    assert!(actions.iter().any(|a| matches!(a, PageAction::WatchField { node: 3 })));
    assert!(actions.iter().any(|a| matches!(a, PageAction::WatchSubmit { .. })));

    assert_eq!(h.presenter.shown().len(), 1);
    match &h.presenter.shown()[0] {
        Prompt::Autofill { credential, .. } => assert_eq!(credential.username, "a@x.com"),
        other => panic!("expected Autofill prompt, got {:?}", other),
    }
    assert!(matches!(h.driver.match_state(), MatchState::OfferingAutofill { .. }));

    let fills = fills_of(&h.driver.handle_event(
        &PageEvent::PromptAccepted {
            choice: PromptChoice::Autofill,
        },
        &snap,
        10,
    ));
    assert_eq!(
        fills,
        vec![(2, "a@x.com".to_string()), (3, "p1".to_string())]
    );
    assert!(matches!(h.driver.match_state(), MatchState::Done));
}

#[test]
fn multiple_credentials_open_the_chooser_and_fill_only_the_picked_one() {
    let a = credential("1", "a@x.com", "p1", "https://x.com");
    let b = credential("2", "b@x.com", "p2", "https://x.com");
    let mut h = harness("https://x.com/login", vec![a, b]);
    let snap = login_snapshot("https://x.com/login");

    h.driver.tick(&snap, 0);

    match &h.presenter.shown()[0] {
        Prompt::Selection { credentials, .. } => assert_eq!(credentials.len(), 2),
        other => panic!("expected Selection prompt, got {:?}", other),
    }

    let fills = fills_of(&h.driver.handle_event(
        &PageEvent::PromptAccepted {
            choice: PromptChoice::Selection {
                credential_id: "2".into(),
            },
        },
        &snap,
        10,
    ));
    assert_eq!(
        fills,
        vec![(2, "b@x.com".to_string()), (3, "p2".to_string())],
        "Only the second record's values are used"
    );
}

#[test]
fn credentials_offered_is_sticky_across_passes() {
    let record = credential("1", "a@x.com", "p1", "https://x.com");
    let mut h = harness("https://x.com/login", vec![record]);
    let snap = login_snapshot("https://x.com/login");

    h.driver.tick(&snap, 0);
    assert_eq!(h.store.lookup_count(), 1);
    assert_eq!(h.presenter.shown().len(), 1);

    // Poll-interval rescan: forms are rebuilt, but the user is not
    // re-prompted and the store is not queried again.
    h.driver.tick(&snap, 2000);
    assert_eq!(h.driver.state().passes, 2, "Second pass did run");
    assert_eq!(h.store.lookup_count(), 1, "No second storage query");
    assert_eq!(h.presenter.shown().len(), 1, "No second prompt");
}

#[test]
fn store_failure_means_no_prompt() {
    use credfill::store::store::FailingStore;

    let presenter = SharedPresenter::new();
    let mut driver = DetectionDriver::new(
        config(),
        "https://x.com/login",
        Box::new(FailingStore),
        Box::new(presenter.clone()),
        TraceLogger::disabled(),
        0,
    );

    driver.tick(&login_snapshot("https://x.com/login"), 0);
    assert!(presenter.shown().is_empty(), "Failure degrades to zero results");
}

#[test]
fn zero_results_keep_the_offer_available_for_later() {
    // Nothing stored: no prompt, but the sticky flag must not be set, so
    // a username change can still trigger a lookup.
    let mut h = harness("https://x.com/login", vec![]);
    let snap = login_snapshot("https://x.com/login");

    h.driver.tick(&snap, 0);
    assert!(h.presenter.shown().is_empty());
    assert!(!h.driver.state().credentials_offered);
}

// ============================================================================
// Outside clicks
// ============================================================================

#[test]
fn outside_click_dismisses_the_prompt() {
    let record = credential("1", "a@x.com", "p1", "https://x.com");
    let mut h = harness("https://x.com/login", vec![record]);
    let snap = login_snapshot("https://x.com/login");

    h.driver.tick(&snap, 0);
    h.driver
        .handle_event(&PageEvent::OutsideClick { target: None }, &snap, 10);

    assert_eq!(h.presenter.dismissed(), 1);
    assert!(matches!(h.driver.match_state(), MatchState::Done));
}

#[test]
fn clicks_on_tracked_fields_keep_the_prompt_up() {
    let record = credential("1", "a@x.com", "p1", "https://x.com");
    let mut h = harness("https://x.com/login", vec![record]);
    let snap = login_snapshot("https://x.com/login");

    h.driver.tick(&snap, 0);
    h.driver
        .handle_event(&PageEvent::OutsideClick { target: Some(2) }, &snap, 10);

    assert_eq!(h.presenter.dismissed(), 0);
    assert!(h.driver.match_state().is_offering());
}

// ============================================================================
// Generated password suggestions
// ============================================================================

fn registration_snapshot() -> PageSnapshot {
    page(
        "https://x.com/signup",
        vec![
            El::form(1),
            El::text_input(2).parent(1).name("email"),
            El::password_input(3).parent(1),
            El::password_input(4).parent(1),
        ],
    )
}

#[test]
fn registration_page_suggests_a_generated_password() {
    let mut h = harness("https://x.com/signup", vec![]);
    let snap = registration_snapshot();

    h.driver.tick(&snap, 0);

    let shown = h.presenter.shown();
    assert_eq!(shown.len(), 1);
    let password = match &shown[0] {
        Prompt::GeneratedPassword { password, field } => {
            assert_eq!(*field, 3, "Anchored to the primary password field");
            password.clone()
        }
        other => panic!("expected GeneratedPassword prompt, got {:?}", other),
    };

    let fills = fills_of(&h.driver.handle_event(
        &PageEvent::PromptAccepted {
            choice: PromptChoice::GeneratedPassword,
        },
        &snap,
        10,
    ));
    assert_eq!(
        fills,
        vec![(3, password.clone()), (4, password)],
        "Primary and confirm get the same value"
    );
    assert!(h.driver.state().password_suggestion_shown);
}

#[test]
fn password_suggestion_is_sticky_across_passes_and_focus() {
    let mut h = harness("https://x.com/signup", vec![]);
    let snap = registration_snapshot();

    h.driver.tick(&snap, 0);
    assert_eq!(h.presenter.shown().len(), 1);

    h.driver.tick(&snap, 2000);
    h.driver
        .handle_event(&PageEvent::FieldFocused { node: 3 }, &snap, 2100);

    assert_eq!(h.presenter.shown().len(), 1, "Never re-offered on this page");
}

#[test]
fn focus_on_a_cleared_password_field_triggers_the_suggestion() {
    // At pass time the field carried a browser-restored draft value, so
    // nothing was suggested; the user clears it and focuses.
    let mut h = harness("https://x.com/signup", vec![]);
    let filled = page(
        "https://x.com/signup",
        vec![
            El::form(1),
            El::text_input(2).parent(1).name("email"),
            El::password_input(3).parent(1).value("draft"),
            El::password_input(4).parent(1).value("draft"),
        ],
    );

    h.driver.tick(&filled, 0);
    assert!(h.presenter.shown().is_empty(), "Nothing to suggest yet");

    let cleared = registration_snapshot();
    h.driver
        .handle_event(&PageEvent::FieldFocused { node: 3 }, &cleared, 100);

    assert_eq!(h.presenter.shown().len(), 1);
    assert!(matches!(
        h.driver.match_state(),
        MatchState::SuggestingGenerated { .. }
    ));
}

#[test]
fn prefilled_password_field_suppresses_the_suggestion() {
    let mut h = harness("https://x.com/signup", vec![]);
    let snap = page(
        "https://x.com/signup",
        vec![
            El::form(1),
            El::password_input(3).parent(1).value("already-set"),
            El::password_input(4).parent(1).value("already-set"),
        ],
    );

    h.driver.tick(&snap, 0);
    assert!(h.presenter.shown().is_empty());
}

// ============================================================================
// Re-detection scheduling
// ============================================================================

#[test]
fn irrelevant_mutations_do_not_schedule_a_rescan() {
    let mut h = harness("https://x.com/login", vec![]);
    let snap = login_snapshot("https://x.com/login");

    h.driver.tick(&snap, 0);
    assert_eq!(h.driver.state().passes, 1);

    let with_banner = page(
        "https://x.com/login",
        vec![
            El::form(1),
            El::text_input(2).parent(1).name("email"),
            El::password_input(3).parent(1),
            El::div(9).text("cookie banner"),
        ],
    );
    h.driver.handle_event(
        &PageEvent::Mutation { added: vec![9] },
        &with_banner,
        100,
    );
    h.driver.tick(&with_banner, 700);

    assert_eq!(h.driver.state().passes, 1, "Debounce never armed");
}

#[test]
fn password_bearing_mutations_rescan_after_the_debounce() {
    let mut h = harness("https://x.com", vec![]);
    let empty = page_with("https://x.com", "", "", vec![El::div(1)]);

    h.driver.tick(&empty, 0);
    assert_eq!(h.driver.state().passes, 1);
    assert!(h.driver.forms().is_empty());

    // Client-side rendering adds the login form later.
    let snap = page(
        "https://x.com",
        vec![
            El::div(1),
            El::form(5).parent(1),
            El::text_input(6).parent(5).name("email"),
            El::password_input(7).parent(5),
        ],
    );
    h.driver
        .handle_event(&PageEvent::Mutation { added: vec![5] }, &snap, 100);

    h.driver.tick(&snap, 300);
    assert_eq!(h.driver.state().passes, 1, "Still inside the debounce window");

    h.driver.tick(&snap, 650);
    assert_eq!(h.driver.state().passes, 2, "Debounced rescan ran");
    assert_eq!(h.driver.forms().len(), 1);
}

#[test]
fn load_event_schedules_the_delayed_rescans() {
    let mut h = harness("https://x.com", vec![]);
    let snap = page_with("https://x.com", "", "", vec![]);

    h.driver.tick(&snap, 0);
    h.driver.handle_event(&PageEvent::Loaded, &snap, 10);
    assert_eq!(h.driver.state().passes, 2, "Load runs a pass immediately");

    h.driver.tick(&snap, 520);
    assert_eq!(h.driver.state().passes, 3, "First delayed rescan (load+500ms)");

    h.driver.tick(&snap, 1520);
    assert_eq!(h.driver.state().passes, 4, "Second delayed rescan (load+1500ms)");
}

#[test]
fn polling_rescans_for_the_lifetime_of_the_page() {
    let mut h = harness("https://x.com", vec![]);
    let snap = page_with("https://x.com", "", "", vec![]);

    h.driver.tick(&snap, 0);
    h.driver.tick(&snap, 2000);
    h.driver.tick(&snap, 4000);

    assert_eq!(h.driver.state().passes, 3, "One initial pass plus two poll hits");
}

// ============================================================================
// Submission capture
// ============================================================================

#[test]
fn login_submission_updates_a_changed_password_after_the_delay() {
    let record = credential("1", "a@x.com", "p1", "https://x.com");
    let mut h = harness("https://x.com/login", vec![record]);
    let snap = page(
        "https://x.com/login",
        vec![
            El::form(1),
            El::text_input(2).parent(1).name("email").value("a@x.com"),
            El::password_input(3).parent(1).value("p2"),
        ],
    );

    h.driver.tick(&snap, 0);
    let fingerprint = h.driver.forms()[0].fingerprint.clone();

    let actions = h.driver.handle_event(
        &PageEvent::SubmitIntent {
            fingerprint: fingerprint.clone(),
            trigger: SubmitTrigger::FormSubmit,
        },
        &snap,
        100,
    );
    assert!(
        actions.is_empty(),
        "Login submissions are not suppressed; the page's handler runs first"
    );

    // The capture fires only after the configured delay.
    h.driver.tick(&snap, 300);
    assert_eq!(h.store.records()[0].password, "p1");

    h.driver.tick(&snap, 650);
    assert_eq!(h.store.records()[0].password, "p2");
    assert!(h.store.records()[0].date_modified.is_some());
}

#[test]
fn registration_submission_is_suppressed_captured_and_resubmitted() {
    let mut h = harness("https://x.com/signup", vec![]);
    let snap = page(
        "https://x.com/signup",
        vec![
            El::form(1),
            El::text_input(2).parent(1).name("email").value("new@x.com"),
            El::password_input(3).parent(1).value("fresh1"),
            El::password_input(4).parent(1).value("fresh1"),
        ],
    );

    h.driver.tick(&snap, 0);
    let fingerprint = h.driver.forms()[0].fingerprint.clone();

    let actions = h.driver.handle_event(
        &PageEvent::SubmitIntent {
            fingerprint: fingerprint.clone(),
            trigger: SubmitTrigger::ControlClick,
        },
        &snap,
        100,
    );
    assert!(
        actions
            .iter()
            .any(|a| matches!(a, PageAction::PreventNextSubmit { .. })),
        "Registration capture runs before the page navigates"
    );

    let actions = h.driver.tick(&snap, 650);
    assert_eq!(h.store.records().len(), 1, "Captured as a brand-new record");
    assert_eq!(h.store.records()[0].username, "new@x.com");
    assert!(
        actions
            .iter()
            .any(|a| matches!(a, PageAction::Submit(SubmitPlan::SubmitForm { form: 1 }))),
        "Suppressed default submission is re-triggered"
    );
}

#[test]
fn fields_gone_by_capture_time_abandon_it_silently() {
    let mut h = harness("https://x.com/login", vec![]);
    let snap = login_snapshot("https://x.com/login");

    h.driver.tick(&snap, 0);
    let fingerprint = h.driver.forms()[0].fingerprint.clone();
    h.driver.handle_event(
        &PageEvent::SubmitIntent {
            fingerprint,
            trigger: SubmitTrigger::EnterKey,
        },
        &snap,
        100,
    );

    // The whole form disappeared before the capture delay elapsed; the
    // next pass drops the record, so the pending capture finds nothing.
    let gone = page_with("https://x.com/login", "", "", vec![]);
    h.driver.handle_event(&PageEvent::Loaded, &gone, 200);
    h.driver.tick(&gone, 650);

    assert!(h.store.records().is_empty());
}

// ============================================================================
// Provider flows
// ============================================================================

fn provider_login_snapshot(url: &str) -> PageSnapshot {
    page(
        url,
        vec![
            El::form(1),
            El::text_input(2).parent(1).name("email"),
            El::password_input(3).parent(1).name("pass"),
            El::button(4).parent(1).name("login"),
        ],
    )
}

#[test]
fn provider_retries_the_canonical_domain_before_giving_up() {
    // Stored under the bare canonical host; the page lives on a different
    // provider host, so the first (host-exact) lookup misses.
    let record = credential("1", "a@x.com", "p1", "https://facebook.com");
    let mut h = harness("https://www.fb.com/login.php", vec![record]);
    let snap = provider_login_snapshot("https://www.fb.com/login.php");

    h.driver.tick(&snap, 0);

    assert_eq!(h.store.lookup_count(), 2, "Host lookup, then canonical retry");
    assert_eq!(h.presenter.shown().len(), 1);
    assert!(matches!(h.driver.match_state(), MatchState::OfferingAutofill { .. }));
}

#[test]
fn provider_autofill_schedules_an_automatic_submit() {
    let record = credential("1", "a@x.com", "p1", "https://facebook.com");
    let mut h = harness("https://www.facebook.com/login.php", vec![record]);
    let snap = provider_login_snapshot("https://www.facebook.com/login.php");

    h.driver.tick(&snap, 0);
    let actions = h.driver.handle_event(
        &PageEvent::PromptAccepted {
            choice: PromptChoice::Autofill,
        },
        &snap,
        100,
    );
    assert!(!fills_of(&actions).is_empty(), "Accept fills immediately");
    assert!(
        !actions.iter().any(|a| matches!(a, PageAction::Submit(_))),
        "Submit waits for the configured delay"
    );

    let actions = h.driver.tick(&snap, 450);
    assert!(
        actions
            .iter()
            .any(|a| matches!(a, PageAction::Submit(SubmitPlan::SubmitForm { form: 1 }))),
        "Auto-submit fires after the delay"
    );
}

// ============================================================================
// Navigation reset
// ============================================================================

#[test]
fn navigation_resets_the_whole_session() {
    let record = credential("1", "a@x.com", "p1", "https://x.com");
    let mut h = harness("https://x.com/login", vec![record]);
    let snap = login_snapshot("https://x.com/login");

    h.driver.tick(&snap, 0);
    assert!(h.driver.state().credentials_offered);

    h.driver.reset_for("https://y.com/login", 5000);

    assert_eq!(h.driver.state().current_host, "y.com");
    assert!(!h.driver.state().credentials_offered);
    assert!(!h.driver.state().password_suggestion_shown);
    assert_eq!(h.driver.state().passes, 0);
    assert!(h.driver.forms().is_empty());
}
