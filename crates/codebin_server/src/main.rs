//! CodeBin API server entrypoint.

use anyhow::Context;
use codebin_server::{
    resolve_bind_address, serve_router, AppState, Config, CorsPolicy, Database, DeploymentEnv,
    DEFAULT_PORT,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

fn init_tracing(deployment: DeploymentEnv) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| deployment.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn log_startup_summary(config: &Config) {
    tracing::info!(
        datastore = "[REDACTED]",
        port = config.port,
        deployment = ?config.deployment,
        "Loaded configuration"
    );
    match &config.cors {
        CorsPolicy::AllowAll => {
            tracing::warn!("CORS allow-all enabled - any origin may call the API")
        }
        CorsPolicy::AllowList(origins) => {
            tracing::info!("CORS allow-list: {}", origins.join(", "))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_path = dotenvy::dotenv().ok();

    let deployment = std::env::var("DEPLOYMENT_ENV")
        .map(|value| DeploymentEnv::parse(&value))
        .unwrap_or_default();
    init_tracing(deployment);

    if let Some(path) = dotenv_path {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;
    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env().context("Invalid configuration")?;
    log_startup_summary(&config);

    let database = Database::open(&config.db_path).context("Failed to open datastore")?;
    tracing::info!("Datastore connected successfully");

    let state = AppState::new(config.clone(), database);
    let bind_addr = resolve_bind_address(&config);
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("CodeBin running at http://{}", actual_addr);

    serve_router(listener, state, shutdown_signal()).await?;
    tracing::info!("Server stopped");
    Ok(())
}

fn print_help() {
    println!("CodeBin Server\n");
    println!("Usage: codebin [OPTIONS]\n");
    println!("Options:");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables (a .env file in the working directory is loaded first):");
    println!("  DATASTORE_CONNECTION_STRING  Datastore directory, optionally prefixed with redb:// (required)");
    println!("  PORT                         Server port (default: {})", DEFAULT_PORT);
    println!("  DEPLOYMENT_ENV               production or development (default: development)");
    println!("  BIND                         Override bind address (e.g. 127.0.0.1:{})", DEFAULT_PORT);
    println!("  CORS_ALLOW_ALL               Allow CORS from any origin");
    println!("  CORS_ALLOWED_ORIGINS         Comma-separated origin allow-list");
    println!("  RUST_LOG                     Tracing filter override");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
