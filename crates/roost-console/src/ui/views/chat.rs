use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use roost_core::models::SenderKind;

use crate::ui::format::format_clock_time;
use crate::ui::{theme, App, InputMode};

pub fn render_chat(f: &mut Frame, app: &App, area: Rect) {
    let [header_area, messages_area, input_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(3),
    ])
    .areas(area);

    render_header(f, app, header_area);
    render_messages(f, app, messages_area);
    render_input(f, app, input_area);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let line = match app.open_ticket() {
        Some(ticket) => Line::from(vec![
            Span::styled(format!("#{} ", ticket.id), theme::title()),
            Span::raw(ticket.subject.clone()),
            Span::raw("  "),
            Span::styled(
                format!(
                    "{} · {} · {}",
                    ticket.requester_name,
                    ticket.requester.label(),
                    ticket.status.label()
                ),
                theme::muted(),
            ),
        ]),
        None => Line::from(Span::styled(
            format!("Ticket #{}", app.poller.open_ticket_id().unwrap_or(0)),
            theme::title(),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn sender_color(sender: SenderKind) -> ratatui::style::Color {
    match sender {
        SenderKind::Admin => theme::ACCENT_PRIMARY,
        SenderKind::Host => theme::ACCENT_WARNING,
        SenderKind::User => theme::ACCENT_SUCCESS,
    }
}

fn render_messages(f: &mut Frame, app: &App, area: Rect) {
    let messages = app.poller.messages();
    if messages.is_empty() {
        let empty = Paragraph::new(Line::from("No messages yet")).style(theme::muted());
        f.render_widget(empty, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for message in messages {
        lines.push(Line::from(vec![
            Span::styled(
                message.sender.wire_value(),
                Style::default().fg(sender_color(message.sender)),
            ),
            Span::styled(
                format!("  {}", format_clock_time(message.created_at)),
                theme::muted(),
            ),
        ]));
        for text_line in message.body.lines() {
            lines.push(Line::from(format!("  {}", text_line)));
        }
        lines.push(Line::from(""));
    }

    // Pin the view to the newest messages.
    let visible = area.height as usize;
    if lines.len() > visible {
        lines.drain(..lines.len() - visible);
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let (title, border_color) = if app.poller.pending_resolve() {
        ("Resolve ticket? (y/n)", theme::ACCENT_WARNING)
    } else if app.input_mode == InputMode::Editing {
        ("Reply", theme::ACCENT_PRIMARY)
    } else {
        ("Reply (e to edit)", theme::TEXT_MUTED)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);
    let input = Paragraph::new(app.input.as_str()).block(block);
    f.render_widget(input, area);

    if app.input_mode == InputMode::Editing && !app.poller.pending_resolve() {
        let x = area.x + 1 + app.input.chars().count() as u16;
        f.set_cursor_position((x.min(area.x + area.width.saturating_sub(2)), area.y + 1));
    }
}
