use crate::models::{Ticket, TicketStatus};

/// Counts shown in the ticket list header.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TicketStats {
    pub total: usize,
    pub open: usize,
    pub pending: usize,
    pub resolved: usize,
}

impl TicketStats {
    pub fn from_tickets<'a>(tickets: impl IntoIterator<Item = &'a Ticket>) -> Self {
        let mut stats = TicketStats::default();
        for ticket in tickets {
            stats.total += 1;
            match ticket.status {
                TicketStatus::Open => stats.open += 1,
                TicketStatus::Pending => stats.pending += 1,
                TicketStatus::Resolved => stats.resolved += 1,
            }
        }
        stats
    }

    /// Share of resolved tickets, 0.0 for an empty list.
    pub fn resolved_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.resolved as f64 * 100.0 / self.total as f64
        }
    }
}
