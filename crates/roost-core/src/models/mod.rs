pub mod message;
pub mod ticket;

pub use message::{sort_for_display, Message, MessageWire, SenderKind};
pub use ticket::{RequesterKind, Ticket, TicketStatus, TicketWire};
