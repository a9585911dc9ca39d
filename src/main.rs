//! Order pipeline demo.
//!
//! 1. Loads configuration and restores the newest snapshot.
//! 2. Submits a few orders and runs one kitchen cycle.
//! 3. Saves the roster and shuts down.

use clap::Parser;
use order_pipeline::config::load_config;
use order_pipeline::lifecycle::{setup_tracing, OrderSystem};
use order_pipeline::model::MenuItem;
use std::path::PathBuf;
use tracing::{info, warn, Instrument};

#[derive(Parser, Debug)]
#[command(name = "order-pipeline")]
#[command(about = "Restaurant order pipeline demo", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Preparation time override in milliseconds
    #[arg(long)]
    preparation_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).map_err(|e| e.to_string())?;
    if let Some(ms) = cli.preparation_ms {
        config.preparation_time_ms = ms;
    }

    let system = OrderSystem::new(&config);
    let restored = system.load_saved_orders().await.map_err(|e| e.to_string())?;
    info!(restored, "Starting with saved orders");

    let menu = [
        (MenuItem::new("Beef Noodles", 180.0).with_description("braised shank"), 2),
        (MenuItem::new("Dumplings", 60.0), 1),
        (MenuItem::new("Bubble Tea", 55.5), 120),
    ];

    let span = tracing::info_span!("order_intake");
    async {
        for (item, quantity) in menu {
            let name = item.name().to_string();
            match system.submit_order(item, quantity).await {
                Ok(Some(id)) => info!(order_id = %id, item = %name, quantity, "Order placed"),
                Ok(None) => warn!(item = %name, quantity, "Order rejected"),
                Err(e) => warn!(error = %e, "Order submission failed"),
            }
        }
    }
    .instrument(span)
    .await;

    system.start_processing();
    match system.process_next_order().await.map_err(|e| e.to_string())? {
        Some(id) => info!(order_id = %id, "Kitchen picked up order"),
        None => info!("Kitchen is busy or has nothing waiting"),
    }
    system.wait_for_work_cycles().await;

    for order in system.total_orders().await.map_err(|e| e.to_string())? {
        info!("{order}");
    }
    let revenue = system.revenue().await.map_err(|e| e.to_string())?;
    info!(revenue, "Revenue so far");

    if let Some(path) = system
        .save_orders_on_shutdown()
        .await
        .map_err(|e| e.to_string())?
    {
        info!(path = %path.display(), "Snapshot written");
    }
    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Application completed successfully");
    Ok(())
}
