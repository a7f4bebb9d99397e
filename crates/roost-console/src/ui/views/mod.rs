pub mod chat;
pub mod tickets;
