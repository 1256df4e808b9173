use std::env;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cleaning_ops::api::{AppState, create_router};
use cleaning_ops::config::ConfigLoader;

const CONFIG_ENV: &str = "CLEANING_OPS_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config/dashboard.yaml";

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let loaded = ConfigLoader::load(&config_path);
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => ConfigLoader::default(),
    };

    init_tracing(config.config().server.log_json);
    match loaded {
        Ok(_) => info!(path = %config_path, "Configuration loaded"),
        Err(e) => warn!(path = %config_path, error = %e, "Using default configuration"),
    }

    let bind_addr = config.config().server.bind_addr.clone();
    let state = AppState::from_config(config)?;
    let listener = TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Cleaning operations API listening");

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
