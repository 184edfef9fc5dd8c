use anyhow::{Context, Result};
use log::{debug, info};
use std::sync::Arc;

use picostream::config::SessionConfig;
use picostream::engine::TelemetrySession;
use picostream::transport::HttpTransport;
use picostream::visualization::LoggingObserver;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::load(&path)?,
        None => SessionConfig::default(),
    };
    info!("Streaming from {}", config.server_url);

    let transport = HttpTransport::new(config.server_url.clone(), config.request_timeout())
        .context("Failed to build HTTP client")?;
    let mut session = TelemetrySession::new(&config, Arc::new(transport), Arc::new(LoggingObserver));
    session.start()?;

    let feed = session.chart_feed();
    let mut render = tokio::time::interval(config.render_period());
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = render.tick() => {
                for (channel, points) in feed.drain_all() {
                    if !points.is_empty() {
                        debug!("channel {}: {} new point(s)", channel, points.len());
                    }
                }
            }
            result = &mut ctrl_c => {
                result.context("Failed to listen for Ctrl-C")?;
                break;
            }
        }
    }

    session.shutdown()?;
    println!("\n{}", session.monitor().generate_report());

    Ok(())
}
