//! Suite — end-to-end lifecycle of one scenario, and the full matrix run.
//!
//! A scenario owns its container from build to removal:
//! cleanup → build → run → wait → verify → stop → start → wait → re-verify
//! → stop → remove. Verification must hold identically before and after the
//! stop/start cycle.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::conf::HarnessConfig;
use crate::docker::container::RunSpec;
use crate::docker::{DockerClient, DockerError};
use crate::probe::{Probe, ProbeError};
use crate::scenario::{conf_env_assignment, Scenario, APP_PORT, SCENARIOS};
use crate::verify::{verify_container, VerifyError};

#[derive(Error, Debug)]
pub enum SuiteError {
    #[error(transparent)]
    Docker(#[from] DockerError),
    #[error(transparent)]
    Probe(#[from] ProbeError),
    #[error("Verification failed for {dockerfile}: {source}")]
    Verify {
        dockerfile: &'static str,
        #[source]
        source: VerifyError,
    },
}

/// Build, run, and verify one Dockerfile variant, including the restart
/// cycle, then tear the container down.
pub async fn run_scenario(
    client: &DockerClient,
    config: &HarnessConfig,
    scenario: &Scenario,
) -> Result<(), SuiteError> {
    info!(dockerfile = scenario.dockerfile, "Scenario start");

    client.remove_if_present(&config.container_name).await?;

    client
        .build_image(
            Path::new(&config.context_dir),
            scenario.dockerfile,
            &config.image_tag,
        )
        .await?;

    let spec = RunSpec {
        image: config.image_tag.clone(),
        name: config.container_name.clone(),
        env: vec![conf_env_assignment()],
        container_port: APP_PORT,
        host_port: config.host_port,
    };
    let container_id = client.run(&spec).await?;
    info!(container = %container_id, "Container running");

    let probe = Probe::new(config.host_port)?;
    let stop_timeout = Some(config.stop_timeout_secs);

    probe.wait_ready(&config.readiness).await?;
    verify(client, &probe, &container_id, scenario).await?;
    info!(dockerfile = scenario.dockerfile, "Verified on first start");

    // The same facts must hold after a stop/start cycle.
    client.stop_container(&container_id, stop_timeout).await?;
    client.start_container(&container_id).await?;
    probe.wait_ready(&config.readiness).await?;
    verify(client, &probe, &container_id, scenario).await?;
    info!(dockerfile = scenario.dockerfile, "Verified after restart");

    client.stop_container(&container_id, stop_timeout).await?;
    client.remove_container(&container_id, false).await?;
    info!(dockerfile = scenario.dockerfile, "Scenario done");

    Ok(())
}

/// Run all five scenarios in order, stopping at the first failure.
pub async fn run_suite(client: &DockerClient, config: &HarnessConfig) -> Result<(), SuiteError> {
    for scenario in &SCENARIOS {
        run_scenario(client, config, scenario).await?;
    }
    info!("All scenarios passed");
    Ok(())
}

async fn verify(
    client: &DockerClient,
    probe: &Probe,
    container_id: &str,
    scenario: &Scenario,
) -> Result<(), SuiteError> {
    verify_container(client, probe, container_id, scenario.expected_body)
        .await
        .map_err(|source| SuiteError::Verify {
            dockerfile: scenario.dockerfile,
            source,
        })
}
