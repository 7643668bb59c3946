//! End-to-end smoke test for the custom-configuration image variants.
//!
//! Each case builds one Dockerfile variant from the fixture context, runs it
//! with `GUNICORN_CONF` pointing at the injected override, and verifies the
//! config path, the three config fields, the prestart log lines, and the
//! exact HTTP body, both on first start and after a stop/start cycle.
//!
//! Requires a local Docker daemon; cases share one container name and one
//! host port, so they run serially. Run with `cargo test -- --ignored`.

use std::path::Path;

use anyhow::{Context, Result};
use serial_test::serial;
use yare::parameterized;

use smoke::conf::HarnessConfig;
use smoke::docker::DockerClient;
use smoke::scenario::Scenario;
use smoke::suite;

fn fixture_config() -> HarnessConfig {
    // Start from env so DOCKER_SOCKET / HARNESS_HOST_PORT still apply in CI,
    // but always build the fixture context shipped with this crate.
    let mut config = HarnessConfig::from_env();
    config.context_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("package_app_custom_config")
        .to_string_lossy()
        .into_owned();
    config
}

async fn run_case(scenario: Scenario) -> Result<()> {
    let config = fixture_config();
    config.validate().map_err(anyhow::Error::msg)?;

    let client =
        DockerClient::new(&config.docker_socket).context("Failed to connect to Docker daemon")?;

    suite::run_scenario(&client, &config, &scenario)
        .await
        .with_context(|| format!("Scenario {} failed", scenario.dockerfile))
}

#[parameterized(
    python3_6 = {
        "python3.6.dockerfile",
        "Test app. From Uvicorn with Gunicorn. Using Python 3.6",
    },
    python3_7 = {
        "python3.7.dockerfile",
        "Test app. From Uvicorn with Gunicorn. Using Python 3.7",
    },
    latest = {
        "latest.dockerfile",
        "Test app. From Uvicorn with Gunicorn. Using Python 3.7",
    },
    python3_6_alpine3_8 = {
        "python3.6-alpine3.8.dockerfile",
        "Test app. From Uvicorn with Gunicorn. Using Python 3.6",
    },
    python3_7_alpine3_8 = {
        "python3.7-alpine3.8.dockerfile",
        "Test app. From Uvicorn with Gunicorn. Using Python 3.7",
    },
)]
#[serial]
#[ignore = "requires a local Docker daemon"]
fn package_app_custom_config(dockerfile: &'static str, expected_body: &'static str) {
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    runtime
        .block_on(run_case(Scenario {
            dockerfile,
            expected_body,
        }))
        .expect("Container smoke test failed");
}
