/**
 * DASHLYTICS CONSOLE - Terminal front-end for the sales dashboard
 *
 * ROLE : loads config, wires the four views to the HTTP backend, performs the
 * initial load, then runs an interactive command loop on stdin.
 *
 * OUTPUT : tables and notifications on stdout, logs on stderr (RUST_LOG).
 */

mod app;
mod commands;
mod render;
mod sink;

use crate::app::{Console, Outcome};
use anyhow::{Context, Result};
use dashlytics_core::{load_config, Dashboard, HttpTransport, NotificationBus};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dashlytics=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cfg = load_config().await;
    info!(base_url = %cfg.api.base_url, "📊 Dashlytics console starting");

    let transport = HttpTransport::new(cfg.api.timeout()).context("Failed to build HTTP client")?;
    let bus = NotificationBus::init_global(cfg.notifications.bus_settings()).clone();
    bus.add_sink(Arc::new(sink::ConsoleSink));

    let dashboard = Dashboard::new(&cfg, transport, bus)
        .with_context(|| format!("Invalid api.base_url `{}`", cfg.api.base_url))?;

    let report = dashboard.load_all().await;
    if report.failures() > 0 {
        info!(failures = report.failures(), "some views failed to load");
    }

    let mut console = Console::new(dashboard);
    println!("{}", console.render_all());
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match commands::parse(&line) {
            Ok(None) => {}
            Ok(Some(cmd)) => match console.execute(cmd).await {
                Outcome::Print(text) => print!("{text}"),
                Outcome::Quit => break,
            },
            Err(e) => println!("error: {e:#}"),
        }
    }

    info!("👋 Dashlytics console stopped");
    Ok(())
}
