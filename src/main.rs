use std::sync::Arc;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::clock::SystemClock;
use payroll_engine::config::ConfigLoader;
use payroll_engine::service::PayrollService;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_DIR: &str = "./config/default";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_dir =
        std::env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let mut config = ConfigLoader::load(&config_dir)?;
    if let Ok(address) = std::env::var("PAYROLL_BIND_ADDR") {
        config = config.with_bind_address(address);
    }

    info!(
        config_dir = %config_dir,
        organisation = %config.settings().organisation,
        "Configuration loaded"
    );

    let service = PayrollService::from_config(&config, Arc::new(SystemClock))?;
    let router = create_router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(&config.settings().bind_address).await?;
    info!(address = %listener.local_addr()?, "Payroll API listening");
    axum::serve(listener, router).await?;

    Ok(())
}
