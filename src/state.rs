use anyhow::Context;

use crate::{config::Config, prelude::*, sv};

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: Config,
}

impl AppState {
  /// Connects to the configured store and brings its schema up to date.
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    let db = Database::connect(&config.database_url)
      .await
      .with_context(|| format!("Failed to connect to {}", config.database_url))?;

    Migrator::up(&db, None).await.context("Failed to run migrations")?;
    info!("Database ready at {}", config.database_url);

    Ok(Self::from_parts(db, config))
  }

  pub fn from_parts(db: DatabaseConnection, config: Config) -> Self {
    Self { db, config }
  }

  pub fn promotions(&self) -> sv::Promotion<'_> {
    sv::Promotion::new(&self.db).with_policy(self.config.policy)
  }
}
