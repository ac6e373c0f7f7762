// Integration tests for contact-tui

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use contact_tui::app::submit::{self, SUCCESS_MESSAGE};
use contact_tui::form::{FieldId, InquiryType, StatusKind};
use contact_tui::modal::markup::{EmbeddedMarkup, MarkupSource};
use contact_tui::modal::{CLOSE_TRANSITION, Content, FOCUS_DELAY, ModalController, ModalState};
use contact_tui::modal::focus::Focusable;
use contact_tui::relay::{DeliveryPolicy, Relay, RelayConfig, Transport};

struct FailingMarkup;

impl MarkupSource for FailingMarkup {
    fn fetch(&self) -> anyhow::Result<String> {
        anyhow::bail!("404 Not Found")
    }

    fn describe(&self) -> String {
        "contact.toml".to_string()
    }
}

/// Counts calls and answers with a fixed result.
struct CountingTransport {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl Transport for CountingTransport {
    fn post_form(&self, _url: &str, body: &str) -> anyhow::Result<u16> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(body.contains("entry.1="));
        if self.fail {
            anyhow::bail!("connection refused")
        }
        Ok(200)
    }
}

fn relay(configured: bool, policy: DeliveryPolicy, fail: bool) -> (Arc<Relay>, Arc<AtomicUsize>) {
    let mut cfg = RelayConfig::placeholder();
    cfg.simulated_delay = Duration::ZERO;
    cfg.policy = policy;
    if configured {
        cfg.form_id = "1FAIpQLS-test".into();
        for (i, f) in FieldId::ALL.into_iter().enumerate() {
            cfg.entries.insert(f, format!("entry.{}", i + 1));
        }
    }
    let calls = Arc::new(AtomicUsize::new(0));
    let transport = CountingTransport {
        calls: Arc::clone(&calls),
        fail,
    };
    (Arc::new(Relay::with_transport(cfg, Box::new(transport))), calls)
}

fn open_filled(now: Instant) -> ModalController {
    let mut modal = ModalController::new();
    modal
        .open(Some(InquiryType::Consulting), &EmbeddedMarkup, now)
        .expect("embedded markup opens");
    let form = modal.form_mut().expect("form loaded");
    form.set_value(FieldId::Name, "Grace Hopper");
    form.set_value(FieldId::Email, "grace@example.com");
    form.set_value(FieldId::Message, "Please tell us about your workshops.");
    modal
}

// 1) Open/close lifecycle
#[test]
fn close_after_open_clears_content_and_session() {
    let t0 = Instant::now();
    let mut modal = ModalController::new();
    modal.open(None, &EmbeddedMarkup, t0).expect("open");
    assert!(modal.is_open());
    assert!(modal.is_visible());
    assert!(modal.scroll_locked());
    assert!(modal.focus().is_active());

    modal.close(t0);
    assert_eq!(modal.state(), &ModalState::Closed);
    assert_eq!(modal.session_id(), None);
    assert!(!modal.is_visible());
    assert!(!modal.scroll_locked());
    assert!(!modal.focus().is_active());

    modal.tick(t0 + CLOSE_TRANSITION);
    assert!(modal.content().is_empty());

    // Closing again is a no-op
    modal.close(t0 + CLOSE_TRANSITION);
    assert_eq!(modal.state(), &ModalState::Closed);
}

#[test]
fn open_with_category_preselects_it() {
    let t0 = Instant::now();
    let mut modal = ModalController::new();
    modal
        .open(Some(InquiryType::Speaking), &EmbeddedMarkup, t0)
        .expect("open");
    let form = modal.form().expect("form loaded");
    assert_eq!(form.value(FieldId::InquiryType), "speaking");
    match modal.state() {
        ModalState::Open(s) => assert_eq!(s.prefilled, Some(InquiryType::Speaking)),
        ModalState::Closed => panic!("modal should be open"),
    }
}

#[test]
fn focus_moves_to_first_field_after_delay() {
    let t0 = Instant::now();
    let mut modal = ModalController::new();
    modal.open(None, &EmbeddedMarkup, t0).expect("open");
    modal.tick(t0);
    assert_eq!(modal.focus().focused(), None);
    modal.tick(t0 + FOCUS_DELAY);
    assert_eq!(modal.focus().focused(), Some(Focusable::Field(FieldId::Name)));

    // Shift+Tab twice wraps past the close button to submit
    modal.focus_prev();
    assert_eq!(modal.focus().focused(), Some(Focusable::CloseButton));
    modal.focus_prev();
    assert_eq!(modal.focus().focused(), Some(Focusable::Submit));
    modal.focus_next();
    assert_eq!(modal.focus().focused(), Some(Focusable::CloseButton));
}

#[test]
fn leaving_a_filled_field_shows_other_errors() {
    let t0 = Instant::now();
    let mut modal = ModalController::new();
    modal.open(None, &EmbeddedMarkup, t0).expect("open");
    modal.tick(t0 + FOCUS_DELAY);
    modal.form_mut().expect("form").type_char(FieldId::Name, 'G');
    modal.focus_next();
    let form = modal.form().expect("form");
    assert_eq!(form.error(FieldId::Email), "Email is required");
    assert_eq!(form.error(FieldId::Name), "");
}

#[test]
fn markup_failure_is_shown_inline() {
    let t0 = Instant::now();
    let mut modal = ModalController::new();
    let err = modal.open(None, &FailingMarkup, t0).expect_err("load fails");
    assert!(err.to_string().contains("contact.toml"));
    assert!(modal.is_visible());
    match modal.content() {
        Content::LoadError(msg) => {
            assert_eq!(msg, "Error loading form. Please refresh and try again.")
        }
        other => panic!("expected inline error, got {:?}", other),
    }
    assert!(modal.form().is_none());
}

#[test]
fn reopening_during_close_transition_keeps_new_content() {
    let t0 = Instant::now();
    let mut modal = ModalController::new();
    modal.open(None, &EmbeddedMarkup, t0).expect("open");
    modal.close(t0);
    let t1 = t0 + Duration::from_millis(100);
    modal.open(None, &EmbeddedMarkup, t1).expect("reopen");
    modal.tick(t0 + CLOSE_TRANSITION + Duration::from_millis(1));
    assert!(modal.form().is_some());
    assert!(modal.is_open());
}

// 2) Submission flow
#[test]
fn placeholder_destination_succeeds_without_network() {
    let t0 = Instant::now();
    let (relay, calls) = relay(false, DeliveryPolicy::Optimistic, false);
    let mut modal = open_filled(t0);

    let job = submit::start_submit(&mut modal, &relay).expect("valid form is sent");
    assert!(modal.form().expect("form").submit.disabled);
    let session = job.session();
    let outcome = job.wait();
    assert!(matches!(outcome, Ok(true)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    submit::finish_submit(&mut modal, session, outcome, t0);
    let form = modal.form().expect("form");
    let status = form.form_status.as_ref().expect("status shown");
    assert_eq!(status.message, SUCCESS_MESSAGE);
    assert_eq!(status.kind, StatusKind::Success);
    assert_eq!(form.value(FieldId::Name), "");
    assert!(!form.submit.disabled);

    modal.tick(t0 + Duration::from_millis(1999));
    assert!(modal.is_open());
    modal.tick(t0 + submit::CLOSE_AFTER_SUCCESS);
    assert!(!modal.is_open());
}

#[test]
fn invalid_form_is_not_sent() {
    let t0 = Instant::now();
    let (relay, calls) = relay(true, DeliveryPolicy::Optimistic, false);
    let mut modal = open_filled(t0);
    modal.form_mut().expect("form").set_value(FieldId::Message, "too short");
    assert!(submit::start_submit(&mut modal, &relay).is_none());
    let form = modal.form().expect("form");
    assert_eq!(form.error(FieldId::Message), "Message must be at least 10 characters");
    assert!(!form.submit.disabled);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn optimistic_policy_reports_transport_error_as_success() {
    let t0 = Instant::now();
    let (relay, calls) = relay(true, DeliveryPolicy::Optimistic, true);
    let mut modal = open_filled(t0);
    let job = submit::start_submit(&mut modal, &relay).expect("sent");
    assert!(matches!(job.wait(), Ok(true)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn strict_policy_surfaces_failure_and_reenables_submit() {
    let t0 = Instant::now();
    let (relay, calls) = relay(true, DeliveryPolicy::Strict, true);
    let mut modal = open_filled(t0);
    let job = submit::start_submit(&mut modal, &relay).expect("sent");
    let session = job.session();
    let outcome = job.wait();
    assert!(matches!(outcome, Ok(false)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    submit::finish_submit(&mut modal, session, outcome, t0);
    let form = modal.form().expect("form");
    let status = form.form_status.as_ref().expect("status shown");
    assert_eq!(status.kind, StatusKind::Error);
    assert_eq!(
        status.message,
        "An error occurred. Please try again or contact us directly."
    );
    // Values stay so the user can retry
    assert_eq!(form.value(FieldId::Name), "Grace Hopper");
    assert!(!form.submit.disabled);
    assert!(modal.is_open());
}

#[test]
fn result_for_closed_modal_is_dropped() {
    let t0 = Instant::now();
    let (relay, _calls) = relay(false, DeliveryPolicy::Optimistic, false);
    let mut modal = open_filled(t0);
    let job = submit::start_submit(&mut modal, &relay).expect("sent");
    let session = job.session();
    modal.close(t0);
    submit::finish_submit(&mut modal, session, job.wait(), t0);
    assert!(!modal.is_open());
    assert!(modal.form().map(|f| f.form_status.is_none()).unwrap_or(true));
}

// 3) relay.conf roundtrip and init
#[test]
fn relay_conf_roundtrip_and_init() {
    use std::{fs, path::PathBuf, time::{SystemTime, UNIX_EPOCH}};
    use contact_tui::app::relayconf;

    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("ctui_relay_{}_{}.conf", std::process::id(), nonce));
    let path_str = path.to_string_lossy().to_string();

    let mut cfg = RelayConfig::placeholder();
    cfg.form_id = "1FAIpQLSroundtrip".into();
    cfg.policy = DeliveryPolicy::Strict;
    cfg.timeout = Duration::from_secs(7);
    cfg.entries.insert(FieldId::Message, "entry.99".into());
    relayconf::write_file(&cfg, &path_str).expect("write relay.conf");
    let back = relayconf::from_file(&path_str).expect("read relay.conf");
    assert_eq!(back, cfg);

    let mut p2 = PathBuf::from(&path_str);
    p2.set_file_name(format!("{}_init.conf", p2.file_stem().unwrap().to_string_lossy()));
    let p2_str = p2.to_string_lossy().to_string();
    let _ = fs::remove_file(&p2_str);
    let created = relayconf::load_or_init(&p2_str);
    assert!(p2.exists());
    assert!(!created.is_configured());

    let _ = fs::remove_file(&path_str);
    let _ = fs::remove_file(&p2_str);
}

// 4) Theme config roundtrip
#[test]
fn theme_roundtrip() {
    use contact_tui::app::Theme;

    let mut path = std::env::temp_dir();
    path.push(format!("ctui_theme_{}.conf", std::process::id()));
    let path_str = path.to_string_lossy().to_string();
    let t = Theme::mocha();
    t.write_file(&path_str).expect("write theme");
    let t2 = Theme::from_file(&path_str).expect("read theme");
    assert_eq!(t.error, t2.error);
    assert_eq!(t.focus_bg, t2.focus_bg);
    let _ = std::fs::remove_file(&path_str);
}

// 5) Key and mouse dispatch through AppState
mod dispatch {
    use super::*;
    use contact_tui::app::keymap::Keymap;
    use contact_tui::app::update::{handle_key, handle_mouse, submit_form};
    use contact_tui::app::{AppState, InputMode, Theme};
    use crossterm::event::{
        KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use ratatui::layout::Rect;

    fn app_with_delay(delay: Duration) -> AppState {
        let mut cfg = RelayConfig::placeholder();
        cfg.simulated_delay = delay;
        AppState::new(
            Theme::mocha(),
            Keymap::new_defaults(),
            Box::new(EmbeddedMarkup),
            Relay::new(cfg),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Open from the landing page and wait out the focus delay.
    fn opened(app: &mut AppState, t0: Instant) {
        assert!(!handle_key(app, key(KeyCode::Char('i')), t0));
        assert_eq!(app.input_mode, InputMode::Modal);
        app.tick(t0 + FOCUS_DELAY);
        assert_eq!(app.modal.focus().focused(), Some(Focusable::Field(FieldId::Name)));
    }

    fn fill(app: &mut AppState) {
        let form = app.modal.form_mut().expect("form");
        form.set_value(FieldId::Name, "Grace Hopper");
        form.set_value(FieldId::Email, "grace@example.com");
        form.set_value(FieldId::InquiryType, "consulting");
        form.set_value(FieldId::Message, "Please tell us about your workshops.");
    }

    #[test]
    fn escape_closes_dialog() {
        let t0 = Instant::now();
        let mut app = app_with_delay(Duration::ZERO);
        opened(&mut app, t0);
        handle_key(&mut app, key(KeyCode::Esc), t0 + FOCUS_DELAY);
        assert!(!app.modal.is_open());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn enter_on_close_button_closes_dialog() {
        let t0 = Instant::now();
        let mut app = app_with_delay(Duration::ZERO);
        opened(&mut app, t0);
        handle_key(&mut app, KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT), t0);
        assert_eq!(app.modal.focus().focused(), Some(Focusable::CloseButton));
        handle_key(&mut app, key(KeyCode::Enter), t0);
        assert!(!app.modal.is_open());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn click_outside_closes_but_inside_does_not() {
        let t0 = Instant::now();
        let mut app = app_with_delay(Duration::ZERO);
        opened(&mut app, t0);
        let area = Rect::new(0, 0, 120, 40);
        handle_mouse(&mut app, click(60, 20), area, t0);
        assert!(app.modal.is_open());
        handle_mouse(&mut app, click(0, 0), area, t0);
        assert!(!app.modal.is_open());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn enter_in_message_inserts_newline() {
        let t0 = Instant::now();
        let mut app = app_with_delay(Duration::ZERO);
        opened(&mut app, t0);
        // name, email, company, phone, linkedin, inquiryType, message
        for _ in 0..6 {
            handle_key(&mut app, key(KeyCode::Tab), t0);
        }
        assert_eq!(app.modal.focus().focused(), Some(Focusable::Field(FieldId::Message)));
        handle_key(&mut app, key(KeyCode::Char('H')), t0);
        handle_key(&mut app, key(KeyCode::Char('i')), t0);
        handle_key(&mut app, key(KeyCode::Enter), t0);
        let form = app.modal.form().expect("form");
        assert_eq!(form.value(FieldId::Message), "Hi\n");
        assert_eq!(form.error(FieldId::Name), "");
        assert!(app.submit_job.is_none());
        assert!(app.modal.is_open());
    }

    #[test]
    fn enter_in_field_submits_and_typing_clears_error() {
        let t0 = Instant::now();
        let mut app = app_with_delay(Duration::ZERO);
        opened(&mut app, t0);
        handle_key(&mut app, key(KeyCode::Enter), t0);
        assert_eq!(app.modal.form().expect("form").error(FieldId::Name), "Name is required");
        assert!(app.submit_job.is_none());

        handle_key(&mut app, key(KeyCode::Char('G')), t0);
        let form = app.modal.form().expect("form");
        assert_eq!(form.value(FieldId::Name), "G");
        assert_eq!(form.error(FieldId::Name), "");
        assert_eq!(form.error(FieldId::Email), "Email is required");
    }

    #[test]
    fn edits_are_blocked_while_sending() {
        let t0 = Instant::now();
        let mut app = app_with_delay(Duration::from_millis(200));
        opened(&mut app, t0);
        fill(&mut app);
        submit_form(&mut app);
        assert!(app.modal.form().expect("form").submit.disabled);

        handle_key(&mut app, key(KeyCode::Backspace), t0);
        handle_key(&mut app, key(KeyCode::Char('x')), t0);
        assert_eq!(app.modal.form().expect("form").value(FieldId::Name), "Grace Hopper");

        for _ in 0..5 {
            handle_key(&mut app, key(KeyCode::Tab), t0);
        }
        assert_eq!(
            app.modal.focus().focused(),
            Some(Focusable::Field(FieldId::InquiryType))
        );
        handle_key(&mut app, key(KeyCode::Right), t0);
        assert_eq!(app.modal.form().expect("form").value(FieldId::InquiryType), "consulting");
    }

    #[test]
    fn reopened_dialog_can_submit_while_old_request_runs() {
        let t0 = Instant::now();
        let mut app = app_with_delay(Duration::from_millis(500));
        opened(&mut app, t0);
        fill(&mut app);
        submit_form(&mut app);
        let first = app.submit_job.as_ref().map(|j| j.session()).expect("first job");

        app.close_modal(t0);
        opened(&mut app, t0);
        let second = app.modal.session_id().expect("reopened");
        assert_ne!(first, second);

        // Empty form: validation must run instead of waiting on the old job
        submit_form(&mut app);
        let form = app.modal.form().expect("form");
        assert_eq!(form.error(FieldId::Name), "Name is required");
        assert!(!form.submit.disabled);
        assert!(app.submit_job.is_none());
        assert_eq!(app.orphaned_jobs.len(), 1);

        // The old result is collected and dropped without touching this dialog
        for _ in 0..200 {
            if app.orphaned_jobs.is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
            app.tick(Instant::now());
        }
        assert!(app.orphaned_jobs.is_empty());
        assert!(app.modal.is_open());
        assert!(app.modal.form().expect("form").form_status.is_none());

        fill(&mut app);
        submit_form(&mut app);
        assert_eq!(app.submit_job.as_ref().map(|j| j.session()), Some(second));
    }
}
