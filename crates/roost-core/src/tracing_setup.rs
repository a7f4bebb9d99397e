use std::fs::OpenOptions;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize tracing for the console. The TUI owns the terminal, so nothing
/// is written to stdout; set `ROOST_LOG_FILE` (or pass a path) to get an
/// append-mode log file, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing(log_file: Option<&str>) -> anyhow::Result<()> {
    let env_path = std::env::var("ROOST_LOG_FILE").ok();
    let log_path = log_file.or(env_path.as_deref());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry();
    if let Some(path) = log_path {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_filter(filter);
        registry.with(file_layer).init();
    } else {
        registry.with(filter).init();
    }
    Ok(())
}
