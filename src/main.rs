use anyhow::Result;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use utbot_scanner::config::load_config;
use utbot_scanner::connection::BinanceFutures;
use utbot_scanner::notify::TelegramNotifier;
use utbot_scanner::scanner::run_scan;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = load_config()?;
    info!(
        "MAIN: starting scanner (timeframe={}, window={}, top_n={}, quote={})",
        cfg.scanner.timeframe, cfg.scanner.candle_limit, cfg.scanner.top_n, cfg.scanner.quote_asset
    );

    let market = BinanceFutures::new(&cfg.binance)?;
    let notifier = TelegramNotifier::new(&cfg.telegram)?;

    // One scan at a time: each tick awaits the full pass before the
    // next can start, so scans never overlap.
    let mut ticker = interval(Duration::from_secs(cfg.scanner.scan_interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = run_scan(&cfg, &market, &notifier).await {
                    error!("MAIN: scan aborted: {err}");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("MAIN: received shutdown signal (Ctrl+C)");
                break;
            }
        }
    }

    info!("MAIN: shutting down");
    Ok(())
}
