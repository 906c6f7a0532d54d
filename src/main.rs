use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use bcd_core::{
    constants::{DEFAULT_REST_ADDR, DEFAULT_SYSTEM_NAME},
    CoreConfig, PendingProvider,
};

/// Main entry point for the BCD front end
///
/// Starts the REST server that hosts the diagnosis intake → results report
/// pipeline: multipart intake classification, results snapshots, and the
/// printable report documents, with OpenAPI/Swagger documentation.
///
/// # Environment Variables
/// - `BCD_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `BCD_SYSTEM_NAME`: Organisation name stamped into report footers
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration or server startup fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("bcd=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("BCD_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());
    let system_name =
        std::env::var("BCD_SYSTEM_NAME").unwrap_or_else(|_| DEFAULT_SYSTEM_NAME.into());

    let cfg = Arc::new(CoreConfig::new(system_name)?);

    tracing::info!("++ Starting BCD REST on {}", addr);

    // The external diagnostic capability is not wired in this binary;
    // results render as pending until a real provider replaces this one.
    let state = AppState::new(cfg, Arc::new(PendingProvider));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, api_rest::app(state)).await?;

    Ok(())
}
