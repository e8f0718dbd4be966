use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biograph_api::config::ServerConfig;
use biograph_api::router::build_app_router;
use biograph_api::state::AppState;
use biograph_db::DbPool;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = config.port, "Configuration loaded");
    let addr = config.bind_addr();

    let pool = prepare_database().await;
    let app = build_app_router(AppState::new(pool, config));

    tracing::info!(%addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Shutdown complete");
}

/// Honour `RUST_LOG`, falling back to a chatty development filter.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "biograph_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, health-check, and migrate. Any failure aborts startup.
async fn prepare_database() -> DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = biograph_db::create_pool(&url)
        .await
        .expect("Failed to connect to database");

    biograph_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    biograph_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database ready");
    pool
}

/// Resolve when the process is asked to stop, via SIGINT (interactive)
/// or SIGTERM (process managers).
async fn shutdown_signal() {
    let sigint = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = sigint => tracing::info!("SIGINT received, shutting down"),
        () = sigterm => tracing::info!("SIGTERM received, shutting down"),
    }
}
