use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;

use yad2_alert_bot::api::{ListingSource, Yad2Client};
use yad2_alert_bot::core::{self, Config, HealthChecker};
use yad2_alert_bot::notify::{Dispatcher, EmailChannel, NotificationChannel, WhatsAppChannel};
use yad2_alert_bot::scheduler::Scheduler;
use yad2_alert_bot::store::SeenStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    core::logging::init_logging(&config.monitor.log_level);

    tracing::info!("🚀 Yad2 alert bot starting...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Poll interval: {}s", config.monitor.poll_interval_secs);

    let mut channels: Vec<Box<dyn NotificationChannel>> = Vec::new();
    if let Some(whatsapp) = config.whatsapp.clone() {
        channels.push(Box::new(WhatsAppChannel::new(whatsapp)));
    }
    if let Some(email) = config.email.clone() {
        channels.push(Box::new(EmailChannel::new(email)));
    }
    let dispatcher = Dispatcher::new(channels);
    if dispatcher.is_empty() {
        tracing::warn!("no notification channels configured; new listings will only be logged");
    } else {
        tracing::info!("Channels: {}", dispatcher.channel_names().join(", "));
    }

    let store = SeenStore::load(&config.monitor.seen_file)
        .with_context(|| format!("cannot read seen store at {}", config.monitor.seen_file))?;
    if store.is_empty() {
        tracing::info!("🛑 no prior state, first cycle will record existing ads without alerting");
    } else {
        tracing::info!(
            "📂 Loaded {} seen ads from {}",
            store.len(),
            config.monitor.seen_file
        );
    }

    // Health endpoint
    let health_checker = HealthChecker::new();
    let health_clone = health_checker.clone();
    let health_port = config.monitor.health_port;
    tokio::spawn(async move { start_health_server(health_clone, health_port).await });
    tracing::info!("✅ Health endpoint running on port {}", health_port);

    // Let the current cycle finish before stopping.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received ctrl-c, finishing current cycle before exit");
            let _ = shutdown_tx.send(true);
        }
    });

    let source: Arc<dyn ListingSource> = Arc::new(Yad2Client::new(&config.feed));
    let scheduler = Scheduler::new(source, store, dispatcher, health_checker, &config.monitor);
    scheduler.run(shutdown_rx).await;

    tracing::info!("👋 poll loop stopped");
    Ok(())
}

async fn start_health_server(health_checker: HealthChecker, port: u16) {
    use warp::Filter;

    let health = warp::path("health")
        .and(warp::any().map(move || health_checker.clone()))
        .and_then(|checker: HealthChecker| async move {
            let status = checker.get_status().await;
            Ok::<_, warp::Rejection>(warp::reply::json(&status))
        });

    warp::serve(health).run(([0, 0, 0, 0], port)).await;
}
