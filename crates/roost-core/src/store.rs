use crate::models::{RequesterKind, Ticket, TicketStatus};
use crate::stats::TicketStats;

/// Which tickets the list view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TicketFilter {
    #[default]
    All,
    Users,
    Hosts,
}

impl TicketFilter {
    pub fn next(self) -> Self {
        match self {
            TicketFilter::All => TicketFilter::Users,
            TicketFilter::Users => TicketFilter::Hosts,
            TicketFilter::Hosts => TicketFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketFilter::All => "All",
            TicketFilter::Users => "Users",
            TicketFilter::Hosts => "Hosts",
        }
    }

    fn matches(&self, ticket: &Ticket) -> bool {
        match self {
            TicketFilter::All => true,
            TicketFilter::Users => ticket.requester == RequesterKind::User,
            TicketFilter::Hosts => ticket.requester == RequesterKind::Host,
        }
    }
}

/// The user and host ticket lists, fetched at startup and re-fetched after a
/// resolve so status badges stay current. Owned by the app; the backend is
/// the only other writer.
#[derive(Debug, Default)]
pub struct TicketDirectory {
    user_tickets: Vec<Ticket>,
    host_tickets: Vec<Ticket>,
}

impl TicketDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_user_tickets(&mut self, tickets: Vec<Ticket>) {
        self.user_tickets = tickets;
    }

    pub fn replace_host_tickets(&mut self, tickets: Vec<Ticket>) {
        self.host_tickets = tickets;
    }

    pub fn get(&self, ticket_id: u64) -> Option<&Ticket> {
        self.user_tickets
            .iter()
            .chain(self.host_tickets.iter())
            .find(|t| t.id == ticket_id)
    }

    /// Merged view for the list screen, newest first, optionally narrowed to
    /// one requester kind.
    pub fn filtered(&self, filter: TicketFilter) -> Vec<&Ticket> {
        let mut tickets: Vec<&Ticket> = self
            .user_tickets
            .iter()
            .chain(self.host_tickets.iter())
            .filter(|t| filter.matches(t))
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        tickets
    }

    pub fn stats(&self) -> TicketStats {
        TicketStats::from_tickets(self.user_tickets.iter().chain(self.host_tickets.iter()))
    }

    pub fn unresolved(&self) -> usize {
        self.user_tickets
            .iter()
            .chain(self.host_tickets.iter())
            .filter(|t| t.status != TicketStatus::Resolved)
            .count()
    }
}
