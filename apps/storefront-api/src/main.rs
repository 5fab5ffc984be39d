//! # Storefront API
//!
//! Server entry point.
//!
//! ```text
//! 1. tracing   ──► RUST_LOG or default filter
//! 2. config    ──► AppConfig::load()
//! 3. state     ──► catalog + cart store + services
//! 4. serve     ──► until SIGINT / SIGTERM
//! 5. shutdown  ──► close the database pool
//! ```

use tokio::signal;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use storefront_api::config::AppConfig;

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,storefront=debug,sqlx=warn";

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    info!(
        addr = %config.bind_addr(),
        store = %config.store,
        db_path = %config.db_path.display(),
        "Configuration loaded"
    );

    let state = storefront_api::build_state(&config).await?;
    let app = storefront_api::create_app(state.clone());

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %config.bind_addr(), "Server running, API available under /api");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = &state.database {
        db.close().await;
    }

    info!("server shut down gracefully");
    Ok(())
}
