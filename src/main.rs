//! Task List API
//!
//! HTTP service exposing CRUD endpoints for tasks and todos backed by `MySQL`.
//!
//! # Environment Variables
//!
//! - `DATABASE_NAME`, `DATABASE_USER`, `DATABASE_PASSWORD`, `DATABASE_HOST`: `MySQL` credentials
//! - `DATABASE_URL`: full connection URL, overrides the four above
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
//! - `DATABASE_ACQUIRE_TIMEOUT_SECONDS`: pool acquire timeout (default: 30)
//! - `DATABASE_CREATE_SCHEMA`: create missing tables at startup (default: false)
//! - `RUST_LOG`: Logging level (e.g., `debug`, `info`, `tasklist_api=debug`)
//! - `LOG_FORMAT`: `text` (default) | `json`
//! - `HOST`: Server host address (default: `0.0.0.0`)
//! - `PORT`: Server port (default: `5050`)
//! - `WORKER_THREADS`: Number of tokio worker threads (default: logical CPU count)
//!
//! Variables are also read from a `.env` file when one is present.

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tasklist_api::api::{AppState, router};
use tasklist_api::infrastructure::{Database, DatabaseConfig, ServerConfig};

/// Result of parsing `WORKER_THREADS` environment variable.
struct WorkerThreadsResult {
    threads: Option<usize>,
    warning_emitted: bool,
}

impl WorkerThreadsResult {
    /// Startup line describing the chosen thread count, if any is due.
    fn summary(&self) -> Option<String> {
        match self.threads {
            Some(threads) => Some(format!("Tokio worker_threads set to: {threads}")),
            None if self.warning_emitted => None,
            None => Some("Tokio worker_threads: using default (logical CPU count)".to_string()),
        }
    }
}

fn parse_worker_threads() -> WorkerThreadsResult {
    worker_threads_from(std::env::var("WORKER_THREADS").ok().as_deref())
}

fn worker_threads_from(value: Option<&str>) -> WorkerThreadsResult {
    let Some(value) = value else {
        return WorkerThreadsResult {
            threads: None,
            warning_emitted: false,
        };
    };

    match value.trim().parse::<usize>() {
        Ok(0) => {
            eprintln!("Warning: WORKER_THREADS=0 is invalid (must be > 0), using default");
            WorkerThreadsResult {
                threads: None,
                warning_emitted: true,
            }
        }
        Ok(threads) => WorkerThreadsResult {
            threads: Some(threads),
            warning_emitted: false,
        },
        Err(_) if value.trim().is_empty() => WorkerThreadsResult {
            threads: None,
            warning_emitted: false,
        },
        Err(error) => {
            eprintln!(
                "Warning: WORKER_THREADS='{}' is not a valid number ({error}), using default",
                value.trim()
            );
            WorkerThreadsResult {
                threads: None,
                warning_emitted: true,
            }
        }
    }
}

fn main() {
    dotenvy::dotenv().ok();

    let result = parse_worker_threads();
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if let Some(threads) = result.threads {
        builder.worker_threads(threads);
    }
    if let Some(summary) = result.summary() {
        eprintln!("{summary}");
    }

    let runtime = builder.build().expect("Failed to create tokio runtime");
    runtime.block_on(async_main());
}

async fn async_main() {
    let json_output =
        std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasklist_api=debug,tower_http=debug".into()),
        )
        .with(json_output.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_output).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting Task List API");

    let database_config = match DatabaseConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "Configuration error");
            std::process::exit(1);
        }
    };

    let server_config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "Configuration error");
            std::process::exit(1);
        }
    };

    let database = match Database::connect(&database_config).await {
        Ok(database) => database,
        Err(error) => {
            tracing::error!(%error, "Failed to open database pool");
            std::process::exit(1);
        }
    };

    let application = router(AppState::new(database.clone()));

    let address = match server_config.socket_addr() {
        Ok(address) => address,
        Err(error) => {
            tracing::error!(%error, "Invalid server address");
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(address).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%error, "Failed to bind to address {}", address);
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(address) => tracing::info!("Listening on {}", address),
        Err(error) => tracing::warn!(%error, "Could not determine local address"),
    }

    if let Err(error) = axum::serve(listener, application)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(%error, "Server error");
        database.close().await;
        std::process::exit(1);
    }

    database.close().await;
    tracing::info!("Server shutdown complete");
}

/// Completes when SIGINT or (on Unix) SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
