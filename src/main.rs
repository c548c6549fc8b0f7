use anyhow::{Context, Result};
use padel_watch::prelude::*;
use padel_watch::telemetry;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    telemetry::init().map_err(|e| anyhow::anyhow!(e))?;

    info!("Starting padel court monitor");

    let config = WatchConfig::from_env().context("Configuration error")?;
    config.log_redacted();

    let fetcher = HttpFetcher::builder()
        .with_timeout(config.request_timeout())
        .build()?;
    let notifier = TelegramNotifier::new(
        &config.telegram_bot_token,
        &config.telegram_chat_id,
        config.request_timeout(),
    )?
    .with_api_url(&config.telegram_api_url);

    let watcher = Watcher::new(
        Box::new(fetcher),
        Box::new(notifier),
        config.watch_options()?,
    );

    watcher.announce_start().await;
    info!(
        "Detailed status:\n{}",
        watcher.status_summary(&WatchState::new(), watcher.now())
    );

    tokio::select! {
        _ = watcher.run() => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Padel monitor stopped by user");
        }
    }

    Ok(())
}
