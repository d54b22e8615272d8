mod config;
mod entity;
mod error;
mod filter;
mod prelude;
mod record;
mod server;
mod state;
mod sv;
mod utils;

use anyhow::Context;
use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{config::Config, prelude::*, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "promotions=debug,tower_http=debug,axum=trace,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::from_env().context("Invalid configuration")?;

  info!("Starting Promotion Service v{}", env!("CARGO_PKG_VERSION"));
  debug!("Configuration: {:?}", config.policy);

  let app_state = Arc::new(AppState::new(config).await?);

  server::serve(app_state).await?;

  tokio::signal::ctrl_c().await.context("Failed to listen for shutdown")?;
  info!("Shutting down");

  Ok(())
}
