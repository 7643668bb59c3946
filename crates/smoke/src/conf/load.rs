//! Load — config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::model::HarnessConfig;

impl HarnessConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path =
            std::env::var("HARNESS_CONFIG_FILE").unwrap_or_else(|_| "harness.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!(
                "Config file not found at {}, using environment variables",
                config_path
            );
            Self::from_env()
        };

        // Environment variables override file config
        if let Ok(socket) = std::env::var("DOCKER_SOCKET") {
            config.docker_socket = socket;
        }
        if let Ok(tag) = std::env::var("HARNESS_IMAGE_TAG") {
            config.image_tag = tag;
        }
        if let Ok(name) = std::env::var("HARNESS_CONTAINER_NAME") {
            config.container_name = name;
        }
        if let Ok(dir) = std::env::var("HARNESS_CONTEXT_DIR") {
            config.context_dir = dir;
        }
        if let Ok(port) = std::env::var("HARNESS_HOST_PORT") {
            config.host_port = port.parse()?;
        }

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: HarnessConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            docker_socket: std::env::var("DOCKER_SOCKET")
                .unwrap_or(defaults.docker_socket),
            image_tag: std::env::var("HARNESS_IMAGE_TAG").unwrap_or(defaults.image_tag),
            container_name: std::env::var("HARNESS_CONTAINER_NAME")
                .unwrap_or(defaults.container_name),
            context_dir: std::env::var("HARNESS_CONTEXT_DIR").unwrap_or(defaults.context_dir),
            host_port: std::env::var("HARNESS_HOST_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.host_port),
            stop_timeout_secs: std::env::var("HARNESS_STOP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.stop_timeout_secs),
            readiness: defaults.readiness,
        }
    }
}
