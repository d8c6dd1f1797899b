use std::net::SocketAddr;
use std::process::ExitCode;
use std::time::Duration;

use station_server::config::{Config, ConfigError, LogFormat};
use station_server::gcp::{
    Credentials, GcpError, MetadataClient, MetadataConfig, SecretClient, SecretClientConfig,
};
use station_server::line::{LineClient, LineConfig, PushError};
use station_server::stations::{
    FirestoreConfig, FirestoreStationStore, MemoryStationStore, StoreError,
};
use station_server::web::{AppState, create_router};
use tracing_subscriber::EnvFilter;

/// How long in-flight requests get to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

const DEFAULT_LOG_FILTER: &str = "info,station_server=debug";

/// Why the server could not start or stopped abnormally.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("google cloud: {0}")]
    Gcp(#[from] GcpError),
    #[error("station store: {0}")]
    Store(#[from] StoreError),
    #[error("push client: {0}")]
    Push(#[from] PushError),
    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn run(config: Config) -> Result<(), StartupError> {
    let mut metadata_config = MetadataConfig::new();
    if let Some(host) = &config.metadata_host {
        metadata_config = metadata_config.with_host(host);
    }
    let metadata = MetadataClient::new(metadata_config)?;

    let project_id = match &config.project_id {
        Some(id) => id.clone(),
        None => metadata.project_id().await?,
    };
    match metadata.region().await {
        Ok(region) => tracing::info!(%project_id, %region, "running on google cloud"),
        Err(e) => tracing::debug!(%project_id, error = %e, "region unavailable"),
    }

    let credentials = if config.firestore_emulator_host.is_some() {
        Credentials::Anonymous
    } else {
        Credentials::Metadata(metadata.clone())
    };

    let access_token = match &config.line_access_token {
        Some(token) => token.clone(),
        None => {
            tracing::info!(secret = %config.line_secret_name, "loading channel access token");
            let secrets = SecretClient::new(
                SecretClientConfig::new(),
                Credentials::Metadata(metadata.clone()),
            )?;
            secrets
                .access_latest(&project_id, &config.line_secret_name)
                .await?
        }
    };
    let messenger =
        LineClient::new(LineConfig::new(access_token).with_endpoint(&config.line_endpoint))?;

    let state = match &config.station_fixture {
        Some(path) => {
            let store = MemoryStationStore::from_file(path, &config.status)?;
            tracing::info!(
                path = %path.display(),
                stations = store.len(),
                "serving stations from fixture"
            );
            AppState::new(store, messenger, config.matcher.clone())
        }
        None => {
            let mut firestore = FirestoreConfig::new(&project_id)
                .with_collection(&config.firestore_collection)
                .with_status(config.status.clone());
            if let Some(host) = &config.firestore_emulator_host {
                tracing::info!(%host, "using firestore emulator");
                firestore = firestore.with_emulator_host(host);
            }
            let store = FirestoreStationStore::new(firestore, credentials)?;
            AppState::new(store, messenger, config.matcher.clone())
        }
    };

    let app = create_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => return flatten(result),
        () = shutdown_signal() => {}
    }

    tracing::info!(grace_secs = SHUTDOWN_GRACE.as_secs(), "shutting down");
    let _ = shutdown_tx.send(());

    match tokio::time::timeout(SHUTDOWN_GRACE, server).await {
        Ok(result) => flatten(result),
        Err(_) => {
            tracing::warn!("in-flight requests did not finish in time");
            Ok(())
        }
    }
}

fn flatten(
    result: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<(), StartupError> {
    match result {
        Ok(served) => Ok(served?),
        Err(e) => Err(std::io::Error::other(e).into()),
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
