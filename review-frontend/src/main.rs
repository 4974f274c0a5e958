use dotenvy::dotenv;
use review_frontend::config::get_configuration;
use review_frontend::services::metrics::init_metrics;
use review_frontend::startup::build_router;
use review_frontend::AppState;
use service_core::observability::logging::init_tracing;
use std::time::Duration;
use tracing::info;

const SESSION_SWEEP: Duration = Duration::from_secs(600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(&configuration.logging.tracing_config("review-frontend"))?;
    init_metrics()?;

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let backend_url = configuration.backend.url.clone();
    let state = AppState::new(configuration)?;

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut sweep = tokio::time::interval(SESSION_SWEEP);
        loop {
            sweep.tick().await;
            sessions.prune_idle();
        }
    });

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!(backend = %backend_url, "Starting review-frontend on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
