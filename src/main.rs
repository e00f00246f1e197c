use anyhow::Result;
use dockboard::*;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; values may come from the environment or config.toml.
    let _ = dotenv::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let engine = Arc::new(docker_repo::DockerRepo::connect(
        app_config.engine.socket.as_deref(),
    )?);
    let sessions = Arc::new(session::SessionStore::new(Duration::from_secs(
        app_config.auth.session_ttl_secs,
    )));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let pruner_handle = session::spawn_pruner(
        sessions.clone(),
        Duration::from_secs(app_config.auth.prune_interval_secs),
        shutdown_rx,
    );

    let app = routes::app(engine, sessions, app_config.clone());
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        project_label = %app_config.engine.project_label,
        "Listening on http://{}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Received shutdown signal");
        })
        .await?;

    let _ = shutdown_tx.send(());
    let _ = pruner_handle.await;
    Ok(())
}
