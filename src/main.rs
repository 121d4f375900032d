//! practiceos — marketing/CRM operations dashboard service.

use std::net::SocketAddr;
use std::sync::Arc;

use practiceos::config::Config;
use practiceos::routes;
use practiceos::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    let status = config.vendor_status();
    log::info!(
        "vendor credentials: copper={} mailerlite={} google_analytics={} wix={} make={}",
        status.copper,
        status.mailerlite,
        status.google_analytics,
        status.wix,
        status.make
    );

    let port = config.port;
    let state = Arc::new(AppState::new(config)?);
    let app = routes::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    log::info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
