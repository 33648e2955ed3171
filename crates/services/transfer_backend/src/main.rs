// File: services/transfer_backend/src/main.rs
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use transfer_backend::{app, service_factory};
use transfer_common::logging::{self, log_error};
use transfer_config::load_config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    logging::init();

    let config = match load_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            log_error(&e, "Failed to load config");
            return Err(e.into());
        }
    };

    let calendar = service_factory::calendar_service(&config);
    let app = app(config.clone(), calendar);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
