//! Exec domain — run a command inside a container and capture its output.

use bollard::container::LogOutput;
use bollard::exec::{StartExecOptions, StartExecResults};
use bollard::models::ExecConfig;
use futures_util::stream::StreamExt;

use super::client::{map_not_found, DockerClient, DockerError};

/// Captured output of a finished in-container command.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i64,
}

impl DockerClient {
    /// Run `cmd` inside the container, wait for it to finish, and capture
    /// stdout, stderr, and the exit code.
    pub async fn exec_capture(
        &self,
        container_id: &str,
        cmd: Vec<String>,
    ) -> Result<ExecOutput, DockerError> {
        let config = ExecConfig {
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            cmd: Some(cmd.clone()),
            ..Default::default()
        };

        let exec = self
            .client
            .create_exec(container_id, config)
            .await
            .map_err(|e| map_not_found(container_id, e))?;

        let options = Some(StartExecOptions {
            detach: false,
            ..Default::default()
        });

        let mut stdout = String::new();
        let mut stderr = String::new();

        if let StartExecResults::Attached { mut output, .. } =
            self.client.start_exec(&exec.id, options).await?
        {
            while let Some(chunk) = output.next().await {
                match chunk? {
                    LogOutput::StdOut { message } => {
                        stdout.push_str(&String::from_utf8_lossy(&message));
                    }
                    LogOutput::StdErr { message } => {
                        stderr.push_str(&String::from_utf8_lossy(&message));
                    }
                    _ => {}
                }
            }
        }

        let inspect = self.client.inspect_exec(&exec.id).await?;
        let exit_code = inspect.exit_code.unwrap_or(0);

        if exit_code != 0 {
            return Err(DockerError::ExecFailed {
                command: cmd,
                exit_code,
                stderr,
            });
        }

        Ok(ExecOutput {
            stdout,
            stderr,
            exit_code,
        })
    }
}
