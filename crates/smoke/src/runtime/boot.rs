//! Boot — logging init, config load, Docker connection.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::HarnessConfig;
use crate::docker::DockerClient;

/// Initialise the tracing / logging subsystem.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smoke=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Load and validate config, then connect to the Docker daemon.
///
/// Returns `(DockerClient, HarnessConfig)` on success.
pub async fn boot() -> Result<(DockerClient, HarnessConfig), Box<dyn std::error::Error>> {
    let config = HarnessConfig::load()?;
    info!(
        "Loaded configuration: image_tag={} container_name={} host_port={}",
        config.image_tag, config.container_name, config.host_port
    );

    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    info!(
        "Connecting to Docker daemon at: {}",
        if config.docker_socket.is_empty() {
            "default socket"
        } else {
            &config.docker_socket
        }
    );

    let client = DockerClient::new(&config.docker_socket).map_err(|e| {
        error!("Failed to connect to Docker: {}", e);
        e
    })?;
    client.ping().await.map_err(|e| {
        error!("Docker daemon did not answer ping: {}", e);
        e
    })?;

    info!("Successfully connected to Docker daemon");
    Ok((client, config))
}
