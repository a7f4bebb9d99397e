pub mod api;
pub mod config;
pub mod models;
pub mod poller;
pub mod stats;
pub mod store;
pub mod tracing_setup;

pub use api::{ApiError, SupportApi, SupportBackend};
pub use config::ConsoleConfig;
pub use poller::{Applied, ChatPoller, SendOutcome, SessionEvent};
pub use stats::TicketStats;
pub use store::{TicketDirectory, TicketFilter};
