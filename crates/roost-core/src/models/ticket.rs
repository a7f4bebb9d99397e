use serde::Deserialize;

/// Who opened a support ticket: a guest account or a property host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequesterKind {
    User,
    Host,
}

impl RequesterKind {
    /// Parse a backend string, case-insensitively. Unknown values fall back
    /// to `User` rather than failing the whole list.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "host" => RequesterKind::Host,
            _ => RequesterKind::User,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RequesterKind::User => "USER",
            RequesterKind::Host => "HOST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    Open,
    Pending,
    Resolved,
}

impl TicketStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "resolved" | "closed" => TicketStatus::Resolved,
            "pending" | "in_progress" | "in-progress" => TicketStatus::Pending,
            _ => TicketStatus::Open,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::Pending => "Pending",
            TicketStatus::Resolved => "Resolved",
        }
    }
}

/// Canonical support ticket as the rest of the console sees it. Built from
/// [`TicketWire`] at the API boundary; the console never mutates one except
/// by re-fetching after a resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub id: u64,
    pub subject: String,
    pub requester_name: String,
    pub requester_email: String,
    pub requester: RequesterKind,
    pub status: TicketStatus,
    /// Unix seconds.
    pub created_at: i64,
}

impl Ticket {
    pub fn is_resolved(&self) -> bool {
        self.status == TicketStatus::Resolved
    }
}

/// Wire shape for a ticket. The backend is inconsistent about field casing
/// (`created_at` vs `createdAt`), so every field accepts both spellings and
/// conversion into [`Ticket`] normalizes the enums.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketWire {
    pub id: u64,
    #[serde(default)]
    pub subject: String,
    #[serde(default, alias = "requesterName", alias = "name")]
    pub requester_name: String,
    #[serde(default, alias = "requesterEmail", alias = "email")]
    pub requester_email: String,
    #[serde(default, alias = "requesterType", alias = "requester_kind")]
    pub requester_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: i64,
}

impl From<TicketWire> for Ticket {
    fn from(wire: TicketWire) -> Self {
        Ticket {
            id: wire.id,
            subject: wire.subject,
            requester_name: wire.requester_name,
            requester_email: wire.requester_email,
            requester: RequesterKind::parse(&wire.requester_type),
            status: TicketStatus::parse(&wire.status),
            created_at: wire.created_at,
        }
    }
}
