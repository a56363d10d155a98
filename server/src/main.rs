//! ERP gateway server: reads configuration from the environment (and `.env`), then serves the API.
//!
//! Run from repo root: `cargo run -p erp-gateway-server`

use erp_gateway::{app, AppState, GatewayConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("erp_gateway=info,tower_http=info")),
        )
        .init();

    let config = GatewayConfig::from_env()?;
    let state = AppState::new(&config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
