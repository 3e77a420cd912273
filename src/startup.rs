use sheetbridge::components::google_sheets::GoogleSheetsClient;
use sheetbridge::config::Config;
use sheetbridge::error::Error;
use sheetbridge::server::{router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::shutdown;

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub fn load_config() -> miette::Result<Arc<Config>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(config)),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Start the HTTP server and run it until a shutdown signal arrives
pub async fn start_server(config: Arc<Config>) -> miette::Result<()> {
    let sheets = Arc::new(GoogleSheetsClient::new(&config));

    let state = AppState {
        config: Arc::clone(&config),
        sheets,
    };

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(Error::from)?;
    info!("Listening on {}", addr);

    // Create shutdown channel wired to the signal handler
    let (shutdown_send, shutdown_recv) = oneshot::channel();
    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send).await;
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = shutdown_recv.await;
        })
        .await
        .map_err(Error::from)?;

    info!("Server stopped");
    Ok(())
}
