pub mod components;
pub mod form;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{AppState, InputMode, Landing};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    let header = Paragraph::new("contact-tui | i: inquire; ←/→: choose; Enter: open; ?: help; q: quit")
        .block(
            Block::default()
                .title("Optimal Rate of Failure")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.title));
    f.render_widget(header, root[0]);

    let body = if app.show_keybinds {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
            .split(root[1]);
        components::render_keybinds_panel(f, cols[1], app);
        cols[0]
    } else {
        root[1]
    };
    render_landing(f, body, app);

    components::render_status_bar(f, root[2], app);

    let area = f.area();
    if app.modal.is_visible() {
        form::render_contact_modal(f, area, app);
    }
    if app.input_mode == InputMode::Help {
        components::render_help_modal(f, area, app, app.help_scroll);
    }
}

fn render_landing(f: &mut Frame, area: Rect, app: &AppState) {
    // Page is inert while the dialog has scroll locked
    let dim = app.modal.scroll_locked();
    let text_style = if dim {
        Style::default().fg(app.theme.muted)
    } else {
        Style::default().fg(app.theme.text)
    };

    let mut lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            "Fail faster. Learn sooner.",
            Style::default().fg(app.theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "Workshops, consulting and talks on building teams that treat failure as data.",
            text_style,
        )),
        Line::raw(""),
    ];

    let mut buttons: Vec<Span> = Vec::new();
    for (idx, cta) in Landing::ctas().into_iter().enumerate() {
        let label = match cta {
            None => "[ Inquire ]".to_string(),
            Some(t) => format!("[ {} ]", t.label()),
        };
        let style = if idx == app.landing.selected && !dim {
            Style::default()
                .fg(app.theme.focus_fg)
                .bg(app.theme.focus_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            text_style
        };
        buttons.push(Span::styled(label, style));
        buttons.push(Span::raw("  "));
    }
    lines.push(Line::from(buttons));

    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}
