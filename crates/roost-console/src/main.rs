mod input;
mod render;
mod runtime;
mod ui;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use roost_core::{ChatPoller, ConsoleConfig, SupportApi};

use crate::runtime::run_app;
use crate::ui::App;

#[derive(Parser, Debug)]
#[command(name = "roost-console", about = "Admin support console for the Roost platform")]
struct Args {
    /// Base URL of the platform backend.
    #[arg(long, env = "ROOST_API_BASE", default_value = "http://localhost:8080")]
    api_base: String,

    /// Admin identity used for replies and resolutions.
    #[arg(long, env = "ROOST_ADMIN_ID")]
    admin_id: u64,

    /// Chat poll interval in milliseconds.
    #[arg(long, default_value_t = 3000)]
    poll_interval_ms: u64,

    /// Append logs to this file instead of discarding them.
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    roost_core::tracing_setup::init_tracing(args.log_file.as_deref())?;

    // Restore the terminal before the panic message prints, otherwise raw
    // mode swallows it.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ui::terminal::restore();
        original_hook(panic_info);
    }));

    let config = ConsoleConfig::new(args.api_base, args.admin_id)
        .with_poll_interval(Duration::from_millis(args.poll_interval_ms));
    let backend = Arc::new(SupportApi::new(config.api_base.clone()));
    let (poller, session_rx) = ChatPoller::new(backend.clone(), &config);

    let mut app = App::new(backend, poller);
    app.refresh_tickets();

    let mut terminal = ui::terminal::init()?;
    let result = run_app(&mut terminal, &mut app, session_rx).await;
    ui::terminal::restore()?;
    result
}
