use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use roost_core::models::TicketStatus;

use crate::ui::format::{format_relative_time, truncate_with_ellipsis};
use crate::ui::{theme, App};

pub fn render_tickets(f: &mut Frame, app: &App, area: Rect) {
    let [header_area, table_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).areas(area);

    render_header(f, app, header_area);

    let tickets = app.visible_tickets();
    if tickets.is_empty() {
        let empty = Paragraph::new(Line::from("No support tickets")).style(theme::muted());
        f.render_widget(empty, table_area);
        return;
    }

    let rows: Vec<Row> = tickets
        .iter()
        .enumerate()
        .map(|(i, ticket)| {
            let status_style = Style::default().fg(match ticket.status {
                TicketStatus::Open => theme::ACCENT_PRIMARY,
                TicketStatus::Pending => theme::ACCENT_WARNING,
                TicketStatus::Resolved => theme::ACCENT_SUCCESS,
            });
            let row = Row::new(vec![
                Cell::from(format!("#{}", ticket.id)),
                Cell::from(truncate_with_ellipsis(&ticket.subject, 40)),
                Cell::from(format!(
                    "{} <{}>",
                    ticket.requester_name, ticket.requester_email
                )),
                Cell::from(ticket.requester.label()),
                Cell::from(Span::styled(ticket.status.label(), status_style)),
                Cell::from(format_relative_time(ticket.created_at)),
            ]);
            if i == app.selected {
                row.style(theme::selected_row())
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Min(20),
            Constraint::Min(20),
            Constraint::Length(5),
            Constraint::Length(9),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new(vec!["ID", "Subject", "Requester", "Kind", "Status", "Age"])
            .style(theme::muted()),
    );

    f.render_widget(table, table_area);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let stats = app.directory.stats();
    let line = Line::from(vec![
        Span::styled("Support tickets", theme::title()),
        Span::raw("   "),
        Span::styled(format!("filter: {}", app.filter.label()), theme::muted()),
        Span::raw("   "),
        Span::raw(format!(
            "{} total · {} open · {} pending · {} resolved ({:.0}%)",
            stats.total,
            stats.open,
            stats.pending,
            stats.resolved,
            stats.resolved_pct()
        )),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
