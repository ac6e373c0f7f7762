use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Position, Rect};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, submit};
use crate::form::FieldId;
use crate::form::InquiryType;
use crate::modal::focus::Focusable;
use crate::modal::markup::FieldKind;
use crate::ui;

/// Run the event loop until the user quits. `initial` opens the dialog at
/// startup, optionally with a category already selected.
pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
    initial: Option<Option<InquiryType>>,
) -> Result<()> {
    if let Some(category) = initial {
        app.open_modal(category, Instant::now());
    }

    loop {
        app.tick(Instant::now());
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let area = {
            let size = terminal.size()?;
            Rect::new(0, 0, size.width, size.height)
        };
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key(app, key, Instant::now()) {
                    break;
                }
            }
            Event::Mouse(mouse) => handle_mouse(app, mouse, area, Instant::now()),
            _ => {}
        }
    }
    tracing::info!(uptime_secs = app.started_at.elapsed().as_secs(), "exiting");
    Ok(())
}

/// Dispatch one key press. Returns `true` when the app should exit.
pub fn handle_key(app: &mut AppState, key: KeyEvent, now: Instant) -> bool {
    match app.input_mode {
        InputMode::Normal => handle_landing_key(app, key, now),
        InputMode::Help => {
            match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => {
                    app.input_mode = InputMode::Normal;
                    app.help_scroll = 0;
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    app.help_scroll = app.help_scroll.saturating_add(1)
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    app.help_scroll = app.help_scroll.saturating_sub(1)
                }
                _ => {}
            }
            false
        }
        InputMode::Modal => {
            handle_modal_key(app, key, now);
            false
        }
    }
}

fn handle_landing_key(app: &mut AppState, key: KeyEvent, now: Instant) -> bool {
    match app.keymap.resolve(&key) {
        Some(KeyAction::Quit) => return true,
        Some(KeyAction::OpenInquiry) => app.open_modal(None, now),
        Some(KeyAction::ActivateCta) => {
            let category = app.landing.selected_cta();
            app.open_modal(category, now);
        }
        Some(KeyAction::PrevCta) => app.landing.move_by(-1),
        Some(KeyAction::NextCta) => app.landing.move_by(1),
        Some(KeyAction::OpenHelp) => app.input_mode = InputMode::Help,
        Some(KeyAction::ToggleKeybindsPane) => app.show_keybinds = !app.show_keybinds,
        Some(KeyAction::Ignore) | None => {}
    }
    false
}

fn handle_modal_key(app: &mut AppState, key: KeyEvent, now: Instant) {
    if key.code == KeyCode::Esc
        || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
    {
        app.close_modal(now);
        return;
    }
    match key.code {
        KeyCode::Tab => app.modal.focus_next(),
        KeyCode::BackTab => app.modal.focus_prev(),
        KeyCode::Enter => match app.modal.focus().focused() {
            Some(Focusable::CloseButton) => app.close_modal(now),
            Some(Focusable::Field(FieldId::Message)) => type_into_focused(app, '\n'),
            Some(Focusable::Field(_)) | Some(Focusable::Submit) => submit_form(app),
            None => {}
        },
        KeyCode::Backspace => {
            if let Some(id) = focused_text_field(app)
                && let Some(form) = app.modal.form_mut()
                && !form.submit.disabled
            {
                form.backspace(id);
            }
        }
        KeyCode::Left | KeyCode::Up => cycle_focused_select(app, -1),
        KeyCode::Right | KeyCode::Down => cycle_focused_select(app, 1),
        KeyCode::Char(' ') if focused_select(app) => cycle_focused_select(app, 1),
        KeyCode::Char(c) => type_into_focused(app, c),
        _ => {}
    }
}

/// Validate and hand the form to the relay unless this dialog's submission
/// is still running. A job left over from a closed dialog keeps running in
/// the background and no longer blocks the new one.
pub fn submit_form(app: &mut AppState) {
    if let Some(job) = app.submit_job.take() {
        if Some(job.session()) == app.modal.session_id() {
            app.submit_job = Some(job);
            return;
        }
        app.orphaned_jobs.push(job);
    }
    app.submit_job = submit::start_submit(&mut app.modal, &app.relay);
}

fn field_kind(app: &AppState, id: FieldId) -> Option<FieldKind> {
    app.modal.template()?.spec(id).map(|s| s.kind)
}

fn focused_text_field(app: &AppState) -> Option<FieldId> {
    let id = app.modal.focus().focused_field()?;
    match field_kind(app, id)? {
        FieldKind::Select => None,
        _ => Some(id),
    }
}

fn focused_select(app: &AppState) -> bool {
    app.modal
        .focus()
        .focused_field()
        .and_then(|id| field_kind(app, id))
        == Some(FieldKind::Select)
}

fn type_into_focused(app: &mut AppState, c: char) {
    if let Some(id) = focused_text_field(app)
        && let Some(form) = app.modal.form_mut()
        && !form.submit.disabled
    {
        form.type_char(id, c);
    }
}

fn cycle_focused_select(app: &mut AppState, step: isize) {
    if focused_select(app)
        && let Some(form) = app.modal.form_mut()
        && !form.submit.disabled
    {
        form.cycle_category(step);
    }
}

/// Left click outside the dialog closes it.
pub fn handle_mouse(app: &mut AppState, mouse: MouseEvent, area: Rect, now: Instant) {
    if app.input_mode != InputMode::Modal {
        return;
    }
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        let dialog = ui::form::dialog_rect(area);
        if !dialog.contains(Position::new(mouse.column, mouse.row)) {
            app.close_modal(now);
        }
    }
}
