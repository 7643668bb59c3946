//! Container domain — run, lifecycle, cleanup, and log retrieval.

use std::collections::HashMap;

use bollard::container::LogOutput;
use bollard::models::{ContainerCreateBody, HostConfig, PortBinding};
use bollard::query_parameters::{
    CreateContainerOptions, LogsOptions, RemoveContainerOptions, StopContainerOptions,
};
use futures_util::stream::StreamExt;

use super::client::{map_not_found, DockerClient, DockerError};

/// What a container runs as: image, name, injected environment, and the
/// single published port (container side and host side).
#[derive(Debug, Clone)]
pub struct RunSpec {
    pub image: String,
    pub name: String,
    pub env: Vec<String>,
    pub container_port: u16,
    pub host_port: u16,
}

impl DockerClient {
    /// Create and start a detached container, returning its id.
    pub async fn run(&self, spec: &RunSpec) -> Result<String, DockerError> {
        let port_key = format!("{}/tcp", spec.container_port);

        let mut port_bindings = HashMap::new();
        port_bindings.insert(
            port_key.clone(),
            Some(vec![PortBinding {
                host_ip: Some("0.0.0.0".to_string()),
                host_port: Some(spec.host_port.to_string()),
            }]),
        );

        let exposed_ports = vec![port_key];

        let body = ContainerCreateBody {
            image: Some(spec.image.clone()),
            env: Some(spec.env.clone()),
            exposed_ports: Some(exposed_ports),
            host_config: Some(HostConfig {
                port_bindings: Some(port_bindings),
                ..Default::default()
            }),
            ..Default::default()
        };

        let options = CreateContainerOptions {
            name: Some(spec.name.clone()),
            ..Default::default()
        };

        let created = self.client.create_container(Some(options), body).await?;
        self.start_container(&created.id).await?;
        Ok(created.id)
    }

    /// Start a stopped container.
    pub async fn start_container(&self, container_id: &str) -> Result<(), DockerError> {
        self.client
            .start_container(container_id, None)
            .await
            .map_err(|e| map_not_found(container_id, e))
    }

    /// Stop a running container with an optional timeout (in seconds).
    pub async fn stop_container(
        &self,
        container_id: &str,
        timeout_secs: Option<u32>,
    ) -> Result<(), DockerError> {
        let options = timeout_secs.map(|t| StopContainerOptions {
            t: Some(t as i32),
            ..Default::default()
        });

        self.client
            .stop_container(container_id, options)
            .await
            .map_err(|e| map_not_found(container_id, e))
    }

    /// Remove a container. If `force` is true, the container will be killed first.
    pub async fn remove_container(
        &self,
        container_id: &str,
        force: bool,
    ) -> Result<(), DockerError> {
        let options = Some(RemoveContainerOptions {
            force,
            ..Default::default()
        });

        self.client
            .remove_container(container_id, options)
            .await
            .map_err(|e| map_not_found(container_id, e))
    }

    /// Stop and remove a leftover container by name. A container that does
    /// not exist is not an error; every run starts from a clean slate.
    pub async fn remove_if_present(&self, name: &str) -> Result<(), DockerError> {
        match self.client.inspect_container(name, None).await {
            Ok(_) => {
                tracing::info!(container = name, "Removing leftover container");
                // Stop may fail if the container already exited; removal is
                // forced either way.
                let _ = self.stop_container(name, Some(1)).await;
                self.remove_container(name, true).await
            }
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => Ok(()),
            Err(e) => Err(DockerError::BollardError(e)),
        }
    }

    /// Collect the container's entire stdout+stderr history as one string.
    pub async fn collect_logs(&self, container_id: &str) -> Result<String, DockerError> {
        let options = LogsOptions {
            follow: false,
            stdout: true,
            stderr: true,
            since: 0,
            until: 0,
            timestamps: false,
            tail: "all".to_string(),
        };

        let mut stream = self.client.logs(container_id, Some(options));
        let mut combined = String::new();

        while let Some(chunk) = stream.next().await {
            let output = chunk.map_err(|e| map_not_found(container_id, e))?;
            push_log_output(&mut combined, &output);
        }

        Ok(combined)
    }
}

/// Append one engine log chunk to the combined buffer. All four bollard
/// stream variants carry the line payload in `message`; non-UTF-8 bytes are
/// replaced rather than dropped.
pub(crate) fn push_log_output(buf: &mut String, output: &LogOutput) {
    let message = match output {
        LogOutput::StdOut { message }
        | LogOutput::StdErr { message }
        | LogOutput::StdIn { message }
        | LogOutput::Console { message } => message,
    };
    buf.push_str(&String::from_utf8_lossy(message));
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_push_log_output_concatenates_stdout_and_stderr() {
        let mut buf = String::new();
        push_log_output(
            &mut buf,
            &LogOutput::StdOut {
                message: Bytes::from("Checking for script in /app/prestart.sh\n"),
            },
        );
        push_log_output(
            &mut buf,
            &LogOutput::StdErr {
                message: Bytes::from("[warning] worker booted\n"),
            },
        );

        assert_eq!(
            buf,
            "Checking for script in /app/prestart.sh\n[warning] worker booted\n"
        );
    }

    #[test]
    fn test_push_log_output_invalid_utf8_is_replaced() {
        let mut buf = String::new();
        push_log_output(
            &mut buf,
            &LogOutput::StdOut {
                message: Bytes::from(&[0xFF, 0xFE, b'o', b'k'][..]),
            },
        );

        assert!(buf.ends_with("ok"));
        assert!(buf.contains('\u{FFFD}'));
    }

    #[test]
    fn test_push_log_output_empty_chunk() {
        let mut buf = String::from("prefix");
        push_log_output(&mut buf, &LogOutput::StdOut { message: Bytes::new() });
        assert_eq!(buf, "prefix");
    }

    #[test]
    fn test_run_spec_port_key_format() {
        let spec = RunSpec {
            image: "app-smoke-testimage".to_string(),
            name: "app-smoke-test".to_string(),
            env: vec!["GUNICORN_CONF=/app/custom_gunicorn_conf.py".to_string()],
            container_port: 8000,
            host_port: 8000,
        };
        assert_eq!(format!("{}/tcp", spec.container_port), "8000/tcp");
    }
}
