pub mod app;
pub mod format;
pub mod notifications;
pub mod terminal;
pub mod theme;
pub mod views;

pub use app::{App, DirectoryEvent, InputMode, View};
