//! Shared UI components (status bar, keybindings panel, help overlay).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::collections::{BTreeMap, BTreeSet};

use crate::app::keymap::{KeyAction, Keymap};
use crate::app::{AppState, InputMode};

/// Render the bottom status bar with mode and relay destination.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Modal => "FORM",
        InputMode::Help => "HELP",
    };
    let cfg = app.relay.config();
    let relay = if cfg.is_configured() {
        format!("relay:{} ({})", cfg.form_id, cfg.policy.as_str())
    } else {
        "relay:simulated".to_string()
    };
    let sending = if app.submit_job.is_some() { "  sending…" } else { "" };
    let msg = format!("mode: {mode}  {relay}  form: {}{sending}", app.markup.describe());
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Render the right-side keybindings panel from the live keymap.
pub fn render_keybinds_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .title("Keybindings")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);

    let mut page: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    for ((mods, code), action) in app.keymap.all_bindings() {
        let label = match action {
            KeyAction::Quit => "Quit",
            KeyAction::OpenInquiry => "Inquire",
            KeyAction::OpenHelp => "Help",
            KeyAction::PrevCta => "Previous button",
            KeyAction::NextCta => "Next button",
            KeyAction::ActivateCta => "Press button",
            KeyAction::ToggleKeybindsPane => "Toggle this pane",
            KeyAction::Ignore => continue,
        };
        page.entry(label)
            .or_default()
            .insert(Keymap::format_key(mods, code));
    }

    let col1_w = page
        .keys()
        .map(|k| k.len())
        .chain(["Cycle category".len()])
        .max()
        .unwrap_or(0)
        .min(inner.width.saturating_sub(8) as usize);
    let row = |label: &str, value: String| {
        let lbl: String = label.chars().take(col1_w).collect();
        Line::from(vec![
            Span::raw(format!("  {:>width$} │ ", lbl, width = col1_w)),
            Span::styled(value, Style::default().add_modifier(Modifier::ITALIC)),
        ])
    };

    let mut lines = vec![Line::from(Span::styled(
        "Page:",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (label, keys) in &page {
        lines.push(row(label, keys.iter().cloned().collect::<Vec<_>>().join(", ")));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Contact form:",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (label, value) in [
        ("Next field", "Tab"),
        ("Previous field", "Shift+Tab"),
        ("Cycle category", "←/→, Space"),
        ("Submit", "Enter"),
        ("Close", "Esc, click outside"),
    ] {
        lines.push(row(label, value.to_string()));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(block, area);
    f.render_widget(p, inner);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the help overlay.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 72u16.min(area.width.saturating_sub(4)).max(40);
    let height = 18u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let key = |k: &'static str| Span::styled(k, Style::default().add_modifier(Modifier::ITALIC));
    let lines: Vec<Line> = vec![
        Line::from(vec![Span::raw("Open the contact form: "), key("i"), Span::raw(" or a button + "), key("Enter")]),
        Line::from(vec![Span::raw("Choose a button: "), key("←/→, h/l, Tab")]),
        Line::from(vec![Span::raw("Toggle keybindings pane: "), key("Shift+K")]),
        Line::from(vec![Span::raw("Quit: "), key("q")]),
        Line::raw(""),
        Line::from(Span::styled("Contact form", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(vec![Span::raw("Move between fields: "), key("Tab / Shift+Tab"), Span::raw(" (wraps)")]),
        Line::from(vec![Span::raw("Pick an inquiry type: "), key("←/→ or Space")]),
        Line::from(vec![Span::raw("Submit: "), key("Enter"), Span::raw(" (newline inside Message)")]),
        Line::from(vec![Span::raw("Close: "), key("Esc"), Span::raw(" or click outside the dialog")]),
        Line::raw(""),
        Line::from("Required: name, email, inquiry type, and a message of 10+ characters."),
        Line::from("Edit relay.conf to send submissions to your Google Form."),
        Line::raw(""),
        Line::from(vec![Span::raw("Close help: "), key("Esc / Enter")]),
    ];

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
