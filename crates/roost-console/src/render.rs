use ratatui::{
    layout::{Constraint, Layout},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::notifications::NotificationLevel;
use crate::ui::views::{chat, tickets};
use crate::ui::{theme, App, View};

pub fn render(f: &mut Frame, app: &mut App) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(f.area());

    match app.view {
        View::Tickets => tickets::render_tickets(f, app, main_area),
        View::Chat => chat::render_chat(f, app, main_area),
    }

    render_status_line(f, app, status_area);
}

fn render_status_line(f: &mut Frame, app: &mut App, area: ratatui::layout::Rect) {
    if let Some(notification) = app.current_notification() {
        let color = match notification.level {
            NotificationLevel::Info => theme::ACCENT_PRIMARY,
            NotificationLevel::Success => theme::ACCENT_SUCCESS,
            NotificationLevel::Error => theme::ACCENT_ERROR,
        };
        let line = Line::from(Span::styled(
            notification.message.clone(),
            Style::default().fg(color),
        ));
        f.render_widget(Paragraph::new(line), area);
        return;
    }

    let hints = match app.view {
        View::Tickets => "j/k move · Enter open · Tab filter · r refresh · q quit",
        View::Chat => {
            if app.poller.pending_resolve() {
                "Resolve this ticket? y confirm · n cancel"
            } else {
                "Enter send · Ctrl+R resolve · Esc back"
            }
        }
    };
    f.render_widget(Paragraph::new(Line::from(hints)).style(theme::muted()), area);
}
