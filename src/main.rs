use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use ws_game_server::app::config::ServerConfig;
use ws_game_server::app::{router::router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  init_tracing();

  let config = ServerConfig::from_env().context("invalid server configuration")?;
  let address = config.address();
  let state = Arc::new(AppState::new(config));

  tracing::info!(
    heartbeat_interval = ?state.config.heartbeat_interval,
    width = state.world.width,
    height = state.world.height,
    "listening on {address}"
  );

  let listener = tokio::net::TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  axum::serve(listener, router(state))
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  tracing::info!("server stopped");
  Ok(())
}

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  if matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json")) {
    tracing_subscriber::fmt().with_env_filter(filter).json().init();
  } else {
    tracing_subscriber::fmt().with_env_filter(filter).init();
  }
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(error) = tokio::signal::ctrl_c().await {
      tracing::warn!(?error, "failed to listen for ctrl-c");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut signal) => {
        signal.recv().await;
      }
      Err(error) => {
        tracing::warn!(?error, "failed to listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
  tracing::info!("shutdown requested");
}
