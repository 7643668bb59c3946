//! Appconf — read the subject application's active configuration out of a
//! running container.
//!
//! The path comes from the container's own environment; the field values
//! come from evaluating the configuration module in place and dumping its
//! scalar bindings as JSON. Both are read-only views into the subject
//! application's state, never reconstructed on the host side.

use serde::Deserialize;
use thiserror::Error;

use crate::docker::{DockerClient, DockerError};
use crate::scenario::GUNICORN_CONF_ENV;

/// Evaluates the module named by `GUNICORN_CONF` and prints its scalar
/// bindings as one JSON object on stdout.
const DUMP_CONF_PY: &str = concat!(
    "import json, os, runpy\n",
    "ns = runpy.run_path(os.environ[\"GUNICORN_CONF\"])\n",
    "print(json.dumps({k: v for k, v in ns.items()",
    " if not k.startswith(\"_\") and isinstance(v, (str, int, float))}))\n",
);

#[derive(Error, Debug)]
pub enum AppConfError {
    #[error("Docker error: {0}")]
    Docker(#[from] DockerError),
    #[error("Configuration dump is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// The configuration fields the subject application must surface. The dump
/// carries every scalar in the file; only these three are contractual.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    pub loglevel: String,
    pub workers: i64,
    pub bind: String,
}

impl AppConfig {
    /// Parse a JSON configuration dump, ignoring non-contractual fields.
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

/// The configuration file path the subject application is actually using,
/// as seen by its own process environment.
pub async fn active_conf_path(
    client: &DockerClient,
    container_id: &str,
) -> Result<String, AppConfError> {
    let output = client
        .exec_capture(
            container_id,
            vec!["printenv".to_string(), GUNICORN_CONF_ENV.to_string()],
        )
        .await?;
    Ok(output.stdout.trim().to_string())
}

/// Fetch and parse the active configuration fields from the container.
pub async fn fetch(client: &DockerClient, container_id: &str) -> Result<AppConfig, AppConfError> {
    let output = client
        .exec_capture(
            container_id,
            vec![
                "python".to_string(),
                "-c".to_string(),
                DUMP_CONF_PY.to_string(),
            ],
        )
        .await?;
    Ok(AppConfig::from_json(output.stdout.trim())?)
}
