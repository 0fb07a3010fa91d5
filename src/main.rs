use tracing_subscriber::EnvFilter;

use chartflow_api::server::{self, AppState};
use chartflow_api::{AppConfig, AppError};

/// Chart and funnel API
/// Stateless: every request carries or loads its own data
#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args: Vec<String> = std::env::args().collect();
    let config = AppConfig::load(&args)?;

    init_tracing(&config.logging.level);

    let addr = config.bind_address();
    if let Some(store) = &config.event_store {
        tracing::info!(path = %store.path.display(), table = %store.table, "event store configured");
    } else {
        tracing::info!("no event store configured; funnel requests must carry events");
    }

    let app = server::router(AppState::new(config)?);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("chartflow-api listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// RUST_LOG wins over the configured level
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
