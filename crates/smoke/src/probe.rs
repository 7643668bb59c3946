//! Probe — HTTP readiness polling and response-body retrieval against the
//! container's published port.

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

use crate::conf::ReadinessConfig;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("No successful response from {url} within {elapsed:?}")]
    NotReady { url: String, elapsed: Duration },
}

/// HTTP probe bound to one published container port on the local host.
#[derive(Debug, Clone)]
pub struct Probe {
    client: reqwest::Client,
    base_url: String,
}

impl Probe {
    pub fn new(host_port: u16) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("http://127.0.0.1:{}", host_port),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Wait until the subject application answers on its root path.
    ///
    /// Sleeps out the configured grace period first, then polls until a
    /// successful response or the deadline. Connection refusals and non-2xx
    /// answers both count as "not ready yet".
    pub async fn wait_ready(&self, readiness: &ReadinessConfig) -> Result<(), ProbeError> {
        tokio::time::sleep(Duration::from_millis(readiness.initial_delay_ms)).await;

        let started = Instant::now();
        let deadline = Duration::from_secs(readiness.timeout_secs);
        let interval = Duration::from_millis(readiness.poll_interval_ms);

        loop {
            match self.client.get(&self.base_url).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(url = %self.base_url, elapsed = ?started.elapsed(), "Container is ready");
                    return Ok(());
                }
                Ok(response) => {
                    debug!(status = %response.status(), "Probe answered but not ready");
                }
                Err(e) => {
                    debug!(error = %e, "Probe connection failed");
                }
            }

            if started.elapsed() >= deadline {
                return Err(ProbeError::NotReady {
                    url: self.base_url.clone(),
                    elapsed: started.elapsed(),
                });
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// GET the root path and return the full response body.
    pub async fn body(&self) -> Result<String, ProbeError> {
        let response = self.client.get(&self.base_url).send().await?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_targets_loopback_on_given_port() {
        let probe = Probe::new(8000).unwrap();
        assert_eq!(probe.base_url(), "http://127.0.0.1:8000");
    }

    #[tokio::test]
    async fn test_wait_ready_times_out_on_closed_port() {
        // Port 1 on loopback is virtually guaranteed closed; the probe must
        // report NotReady instead of hanging.
        let probe = Probe::new(1).unwrap();
        let readiness = ReadinessConfig {
            initial_delay_ms: 0,
            poll_interval_ms: 10,
            timeout_secs: 1,
        };
        match probe.wait_ready(&readiness).await {
            Err(ProbeError::NotReady { url, .. }) => {
                assert_eq!(url, "http://127.0.0.1:1");
            }
            other => panic!("expected NotReady, got {:?}", other),
        }
    }
}
