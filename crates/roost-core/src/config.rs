use std::time::Duration;

/// Everything the console needs from the outside world, passed in explicitly
/// at construction. The admin identity in particular is part of the config,
/// not read from any shared store.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL of the platform backend, e.g. `https://api.roost.example`.
    pub api_base: String,
    /// Identity used as `senderId`/`adminId` on writes.
    pub admin_id: u64,
    /// Cadence of the chat poll loop.
    pub poll_interval: Duration,
}

impl ConsoleConfig {
    pub fn new(api_base: impl Into<String>, admin_id: u64) -> Self {
        Self {
            api_base: api_base.into(),
            admin_id,
            poll_interval: Duration::from_millis(3000),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}
