//! create-products
//!
//! Makes sure the Luceta products exist in Dodo Payments. Safe to re-run:
//! products whose id is already known remotely are skipped.
//!
//! Exit status is 0 when nothing failed, 1 otherwise (including a missing
//! `DODO_PAYMENTS_API_KEY`).

use std::process::ExitCode;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use luceta_payments::{
    provisioning_catalog, DodoConfig, DodoPaymentsClient, Provisioner, API_KEY_VAR, DEFAULT_DELAY,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = dotenvy::dotenv() {
        tracing::warn!("Could not load .env file: {}", e);
    }

    ExitCode::from(run(|key| std::env::var(key).ok(), DEFAULT_DELAY).await)
}

async fn run<F>(lookup: F, delay: Duration) -> u8
where
    F: Fn(&str) -> Option<String>,
{
    tracing::info!("Luceta Audio Platform - Product Creation");

    let config = match DodoConfig::from_lookup(lookup) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            tracing::error!("  Make sure your .env file contains {}", API_KEY_VAR);
            return 1;
        }
    };

    tracing::info!(environment = %config.environment, base_url = config.base_url(), "API key configured");

    let provisioner = Provisioner::new(DodoPaymentsClient::new(config)).with_delay(delay);
    let summary = provisioner.run(&provisioning_catalog()).await;

    println!("{summary}");

    if summary.created > 0 {
        tracing::info!("Products created successfully, checkout integration is ready to test");
    }

    if summary.is_success() { 0 } else { 1 }
}
