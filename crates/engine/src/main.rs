//! Run one pickup notification workflow for a delivery.
//!
//! ## Usage
//!
//! ```bash
//! # Notify the assigned volunteer of a new pickup
//! cargo run --bin pickup-notify -- new-pickup NoQZLaczgEWwHt4tYDOb
//!
//! # Remind them to input their pickup data
//! cargo run --bin pickup-notify -- reminder NoQZLaczgEWwHt4tYDOb
//! ```
//!
//! Exits 0 whether or not a notification went out; the outcome is logged.

use clap::Parser;

use pickup_common::config::AppConfig;
use pickup_engine::WorkflowOutcome;
use pickup_engine::bootstrap::Clients;
use pickup_engine::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pickup_engine=debug,pickup_notifier=debug".into()),
        )
        .json()
        .init();

    let Cli {
        workflow,
        delivery_id,
    } = Cli::parse();

    // Load configuration
    let config = AppConfig::from_env()?;
    let clients = Clients::from_config(&config)?;
    let notifier = clients.pickup_notifier(&config)?;

    match notifier.run(workflow, &delivery_id).await {
        WorkflowOutcome::Sent(receipt) => {
            tracing::info!(%workflow, delivery_id = %delivery_id, message_id = %receipt, "Done")
        }
        WorkflowOutcome::NoRecipient => {
            tracing::info!(%workflow, delivery_id = %delivery_id, "No volunteer to notify")
        }
        WorkflowOutcome::Failed => {
            tracing::warn!(%workflow, delivery_id = %delivery_id, "Notification not sent")
        }
    }

    Ok(())
}
