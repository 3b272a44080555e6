use clap::Parser;
use clap::error::ErrorKind;
use std::net::SocketAddr;
use tasklist_core::config::{ServerConfig, load_config_with_fallback};
use tasklist_core::error::AppError;
use tasklist_server::build_app;
use tasklist_server::cli::Cli;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "tasklist_server=info,tasklist_core=info,tower_http=info";

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn init_tracing(config: &ServerConfig) {
    let fallback = config
        .log_filter
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run(config: ServerConfig) -> Result<(), AppError> {
    let application = build_app(&config)?;

    let address: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|err| {
            AppError::invalid_input(format!(
                "invalid server address {}:{}: {}",
                config.host, config.port, err
            ))
        })?;

    let listener = TcpListener::bind(address)
        .await
        .map_err(|err| AppError::io(format!("failed to bind {address}: {err}")))?;

    match listener.local_addr() {
        Ok(address) => tracing::info!(%address, store = ?config.store, key = %config.store_key, "listening"),
        Err(error) => tracing::warn!(%error, "could not determine local address"),
    }

    axum::serve(listener, application)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::io(err.to_string()))?;

    tracing::info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "failed to install Ctrl+C handler");
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
                tracing::warn!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    let loaded = load_config_with_fallback();
    let config = match cli.effective_config(&loaded.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };

    if cli.print_config {
        match serde_json::to_string_pretty(&config) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("ERROR: {}", AppError::invalid_data(err.to_string()));
                std::process::exit(1);
            }
        }
        return;
    }

    init_tracing(&config.server);
    if let Some(err) = loaded.error {
        tracing::warn!(error = %err, "ignoring unreadable config file, using defaults");
    }

    if let Err(err) = run(config.server).await {
        tracing::error!(error = %err, "server failed");
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
