use std::sync::Arc;

use log::info;
use race_app::build_application;
use race_persistence_sea_orm::{create_db_pool, create_tables, races::RaceRepositoryImpl};

mod logs;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    logs::init_logger();

    create_tables(&create_db_pool().await)
        .await
        .expect("Failed to create database tables");

    let race_repo = Arc::new(RaceRepositoryImpl::new().await);
    let app = Arc::new(build_application(race_repo));

    info!("Starting application");

    let http_app = tokio::spawn(async move {
        race_http_api::run(app, shutdown_signal()).await;
    });

    if let Err(e) = http_app.await {
        log::error!("HTTP API task failed: {}", e);
    }
}
