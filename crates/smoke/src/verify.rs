//! Verify — the five-fact contract every scenario container must satisfy,
//! both on first start and again after a stop/start cycle.

use thiserror::Error;

use crate::appconf::{self, AppConfError, AppConfig};
use crate::docker::{DockerClient, DockerError};
use crate::probe::{Probe, ProbeError};
use crate::scenario::{
    CUSTOM_CONF_PATH, EXPECTED_BIND, EXPECTED_LOGLEVEL, EXPECTED_LOG_LINES, EXPECTED_WORKERS,
};

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Active config path is {actual:?}, expected {expected:?}")]
    ConfPath { expected: String, actual: String },
    #[error("Config field {field} is {actual:?}, expected {expected:?}")]
    ConfField {
        field: &'static str,
        expected: String,
        actual: String,
    },
    #[error("Log line {line:?} not found in container logs")]
    MissingLogLine { line: &'static str },
    #[error("Response body is {actual:?}, expected {expected:?}")]
    Body { expected: String, actual: String },
    #[error(transparent)]
    AppConf(#[from] AppConfError),
    #[error(transparent)]
    Docker(#[from] DockerError),
    #[error(transparent)]
    Probe(#[from] ProbeError),
}

/// Assert the five facts about a running container:
/// the injected config path is active, the three config fields hold their
/// expected values, the prestart log lines are present, and the HTTP root
/// body matches the scenario exactly.
pub async fn verify_container(
    client: &DockerClient,
    probe: &Probe,
    container_id: &str,
    expected_body: &str,
) -> Result<(), VerifyError> {
    let conf_path = appconf::active_conf_path(client, container_id).await?;
    check_conf_path(&conf_path)?;

    let config = appconf::fetch(client, container_id).await?;
    check_app_config(&config)?;

    let logs = client.collect_logs(container_id).await?;
    check_log_lines(&logs)?;

    let body = probe.body().await?;
    check_body(&body, expected_body)?;

    Ok(())
}

/// The active configuration file must be the injected override, not the
/// image default.
pub fn check_conf_path(actual: &str) -> Result<(), VerifyError> {
    if actual != CUSTOM_CONF_PATH {
        return Err(VerifyError::ConfPath {
            expected: CUSTOM_CONF_PATH.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

/// The three contractual config fields, compared one by one so a failure
/// names the diverging field.
pub fn check_app_config(config: &AppConfig) -> Result<(), VerifyError> {
    if config.loglevel != EXPECTED_LOGLEVEL {
        return Err(VerifyError::ConfField {
            field: "loglevel",
            expected: EXPECTED_LOGLEVEL.to_string(),
            actual: config.loglevel.clone(),
        });
    }
    if config.workers != EXPECTED_WORKERS {
        return Err(VerifyError::ConfField {
            field: "workers",
            expected: EXPECTED_WORKERS.to_string(),
            actual: config.workers.to_string(),
        });
    }
    if config.bind != EXPECTED_BIND {
        return Err(VerifyError::ConfField {
            field: "bind",
            expected: EXPECTED_BIND.to_string(),
            actual: config.bind.clone(),
        });
    }
    Ok(())
}

/// Every expected prestart line must appear somewhere in the combined logs.
pub fn check_log_lines(logs: &str) -> Result<(), VerifyError> {
    for line in EXPECTED_LOG_LINES {
        if !logs.contains(line) {
            return Err(VerifyError::MissingLogLine { line });
        }
    }
    Ok(())
}

/// Exact, literal body equality.
pub fn check_body(actual: &str, expected: &str) -> Result<(), VerifyError> {
    if actual != expected {
        return Err(VerifyError::Body {
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}
