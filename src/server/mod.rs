mod handlers;

use std::net::SocketAddr;

use anyhow::Context;
use axum::{
  Router,
  routing::{get, put},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

use crate::{prelude::*, state::AppState};

/// Promotion routes without the network-facing layers.
pub fn router(app: Arc<AppState>) -> Router {
  Router::new()
    .route("/", get(handlers::index))
    .route("/health", get(handlers::health))
    .route("/promotions", get(handlers::list).post(handlers::create))
    .route(
      "/promotions/{id}",
      get(handlers::get).put(handlers::update).delete(handlers::delete),
    )
    .route("/promotions/{id}/activate", put(handlers::activate))
    .route("/promotions/{id}/deactivate", put(handlers::deactivate))
    .with_state(app)
}

/// Binds the listener and serves in the background.
pub async fn serve(app: Arc<AppState>) -> anyhow::Result<()> {
  let governor_conf = Arc::new(
    GovernorConfigBuilder::default()
      .per_second(app.config.rate_per_second)
      .burst_size(app.config.rate_burst)
      .finish()
      .context("Failed to build rate limiter config")?,
  );

  let governor_limiter = governor_conf.limiter().clone();

  tokio::spawn(async move {
    loop {
      tokio::time::sleep(Duration::from_secs(60)).await;
      governor_limiter.retain_recent();
    }
  });

  let addr = SocketAddr::from(([0, 0, 0, 0], app.config.port));

  let router = router(app)
    .layer(
      ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(GovernorLayer::new(governor_conf))
        .layer(
          CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        ),
    )
    .into_make_service_with_connect_info::<SocketAddr>();

  let listener = tokio::net::TcpListener::bind(addr)
    .await
    .with_context(|| format!("Failed to bind {addr}"))?;

  info!("HTTP Server listening on {addr}");

  tokio::spawn(async move {
    if let Err(err) = axum::serve(listener, router).await {
      error!("HTTP server stopped: {err}");
    }
  });

  Ok(())
}
