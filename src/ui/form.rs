//! Contact dialog rendering.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::components::centered_rect;
use crate::app::AppState;
use crate::form::{ContactForm, FieldId, InquiryType, StatusKind};
use crate::modal::Content;
use crate::modal::focus::Focusable;
use crate::modal::markup::{FieldKind, FormTemplate};

/// Area the dialog occupies; clicks outside it dismiss the dialog.
pub fn dialog_rect(area: Rect) -> Rect {
    let width = 76u16.min(area.width.saturating_sub(4)).max(40);
    let height = 34u16.min(area.height.saturating_sub(2)).max(12);
    centered_rect(width, height, area)
}

pub fn render_contact_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let rect = dialog_rect(area);
    let focused = app.modal.focus().focused();
    let theme = &app.theme;

    let close_style = if focused == Some(Focusable::CloseButton) {
        Style::default().fg(theme.focus_fg).bg(theme.focus_bg)
    } else {
        Style::default().fg(theme.muted)
    };
    let mut lines = vec![Line::from(Span::styled("[x] close", close_style)).alignment(Alignment::Right)];

    let title = match app.modal.content() {
        Content::Form(loaded) => {
            render_fields(&mut lines, &loaded.template, &loaded.form, focused, app);
            loaded.template.title.clone()
        }
        Content::LoadError(msg) => {
            lines.push(Line::raw(""));
            lines.push(
                Line::from(Span::styled(msg.clone(), Style::default().fg(theme.accent)))
                    .alignment(Alignment::Center),
            );
            "Contact".to_string()
        }
        Content::Empty => "Contact".to_string(),
    };

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

fn render_fields<'a>(
    lines: &mut Vec<Line<'a>>,
    template: &'a FormTemplate,
    form: &'a ContactForm,
    focused: Option<Focusable>,
    app: &AppState,
) {
    let theme = &app.theme;
    if let Some(intro) = &template.intro {
        lines.push(Line::from(Span::styled(intro.as_str(), Style::default().fg(theme.text))));
    }

    for spec in &template.fields {
        let Some(id) = FieldId::from_dom_id(&spec.id) else {
            continue;
        };
        let is_focused = focused == Some(Focusable::Field(id));
        let marker = if id.is_required() { " *" } else { "" };
        let label_style = if form.is_invalid(id) {
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.title)
        };
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(format!("{}{}", spec.label, marker), label_style)));

        let value = form.value(id);
        let shown = match spec.kind {
            FieldKind::Select => select_display(value),
            _ if value.is_empty() && !is_focused => spec.placeholder.clone().unwrap_or_default(),
            _ if is_focused => format!("{}▏", value),
            _ => value.to_string(),
        };
        let value_style = if is_focused {
            Style::default().fg(theme.focus_fg).bg(theme.focus_bg)
        } else if value.is_empty() && spec.kind != FieldKind::Select {
            Style::default().fg(theme.muted)
        } else {
            Style::default().fg(theme.text)
        };
        for (i, part) in shown.split('\n').enumerate() {
            let prefix = if i == 0 { "> " } else { "  " };
            lines.push(Line::from(vec![
                Span::raw(prefix),
                Span::styled(part.to_string(), value_style),
            ]));
        }

        let err = form.error(id);
        if !err.is_empty() {
            lines.push(Line::from(Span::styled(
                err.to_string(),
                Style::default().fg(theme.error),
            )));
        }
    }

    lines.push(Line::raw(""));
    let submit_style = if form.submit.disabled {
        Style::default().fg(theme.muted)
    } else if focused == Some(Focusable::Submit) {
        Style::default()
            .fg(theme.focus_fg)
            .bg(theme.focus_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.accent)
    };
    lines.push(Line::from(Span::styled(form.submit.label.clone(), submit_style)).alignment(Alignment::Center));

    if let Some(status) = &form.form_status {
        let color = match status.kind {
            StatusKind::Success => theme.success,
            StatusKind::Error => theme.error,
        };
        lines.push(
            Line::from(Span::styled(status.message.clone(), Style::default().fg(color)))
                .alignment(Alignment::Center),
        );
    }
}

fn select_display(value: &str) -> String {
    match value.parse::<InquiryType>() {
        Ok(t) => format!("◀ {} ▶", t.label()),
        Err(_) => "◀ Select an inquiry type ▶".to_string(),
    }
}
