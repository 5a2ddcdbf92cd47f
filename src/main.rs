use std::net::SocketAddr;
use std::sync::Arc;

use hidden_message::{
    app_state::AppState,
    config::AppConfig,
    database::init::init_db,
    repositories::message_repository::PgMessageRepository,
    routes::app_routes::create_router,
    repositories::message_repository::MessageStore,
    services::view_log::{JsonLinesViewLog, NoopViewLog, ViewRecorder},
};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// The main entry point for the application using the tokio runtime.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // No traffic is accepted without a working pool.
    let pool = match init_db(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Error initializing the database: {}", e);
            std::process::exit(1);
        }
    };

    let views: Arc<dyn ViewRecorder> = match &config.view_log_path {
        Some(path) => {
            info!("Recording views to {}", path.display());
            Arc::new(JsonLinesViewLog::new(path))
        }
        None => {
            info!("View logging disabled");
            Arc::new(NoopViewLog)
        }
    };

    let store = PgMessageRepository::new(pool);
    if let Err(e) = store.ping().await {
        error!("Storage not reachable: {}", e);
        std::process::exit(1);
    }

    let state = AppState::new(
        Arc::new(store),
        views,
        config.game_url.clone(),
    );
    let app = create_router(state, config.request_timeout);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Backend API server running on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let served = axum::Server::bind(&addr)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Err(e) = served {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Signal received, starting graceful shutdown");
}
