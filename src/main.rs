use std::net::SocketAddr;
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use wellness_app::config::{resolve_data_path, resolve_port};
use wellness_app::{AppState, load_data, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let data_path = resolve_data_path();
    if let Some(parent) = data_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let data = load_data(&data_path).await;
    if let Some(profile) = &data.profile {
        info!(name = %profile.name, points = profile.points, "loaded profile");
    }
    let app = router(AppState::new(data_path, data));

    let addr = SocketAddr::from(([0, 0, 0, 0], resolve_port()));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
