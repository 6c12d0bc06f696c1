//! Luceta HTTP Server
//!
//! Axum-based server behind the marketing site's pricing page. It hands out
//! Dodo Payments checkout URLs and serves the product catalog.

mod handlers;
mod state;

use axum::{routing::{get, post}, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use luceta_payments::DodoPaymentsClient;

use crate::handlers::{create_checkout, get_product, health_check, list_products};
use crate::state::AppState;

/// Build the router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/products", get(list_products))
        .route("/api/products/{id}", get(get_product))
        .route("/api/checkout", post(create_checkout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let payments = match DodoPaymentsClient::from_env() {
        Ok(client) => {
            tracing::info!(
                environment = %client.config().environment,
                return_url = %client.config().return_url,
                "✓ Dodo Payments configured"
            );
            Some(client)
        }
        Err(e) => {
            tracing::warn!("⚠ Dodo Payments not configured - checkout disabled ({})", e);
            tracing::warn!("  Set DODO_PAYMENTS_API_KEY in .env");
            None
        }
    };

    let app = app(AppState::new(payments));

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🚀 luceta-server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health             - Health check");
    tracing::info!("  GET  /api/products       - Product catalog");
    tracing::info!("  GET  /api/products/{{id}}  - Single product");
    tracing::info!("  POST /api/checkout       - Create checkout session");

    axum::serve(listener, app).await?;

    Ok(())
}
