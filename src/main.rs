use std::net::SocketAddr;

use sqlx::postgres::PgConnection;
use sqlx::Connection;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use markbox::config::Config;
use markbox::storage;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Load config
    let config = Config::from_env().expect("Failed to load configuration");

    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    tracing::info!("Starting markbox");

    // Resolve the storage backend once; refuse to start without one.
    let backend = storage::select_backend(&config)?;

    // Ensure the submissions schema when a direct database is configured.
    // With only the managed backend, schema creation is the operator's job.
    if let Some(database_url) = &config.database_url {
        let mut conn = PgConnection::connect(database_url).await?;
        sqlx::migrate!("./migrations").run(&mut conn).await?;
        conn.close().await?;
        tracing::info!("Schema ensured");
    }

    let addr = SocketAddr::new(config.host, config.port);
    let app = markbox::build_app(backend, config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

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

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
