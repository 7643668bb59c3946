//! Image domain — build from a Dockerfile variant in a context directory.

use std::path::Path;

use bollard::query_parameters::BuildImageOptionsBuilder;
use futures_util::stream::StreamExt;

use super::client::{DockerClient, DockerError};

impl DockerClient {
    /// Build `context_dir` with the named Dockerfile and tag the result.
    ///
    /// The whole context directory is tarred and streamed to the daemon;
    /// the daemon resolves `dockerfile` relative to the archive root.
    /// Returns once the build stream ends, failing on the first
    /// engine-reported build error.
    pub async fn build_image(
        &self,
        context_dir: &Path,
        dockerfile: &str,
        tag: &str,
    ) -> Result<(), DockerError> {
        let context = tar_context(context_dir)
            .map_err(|e| DockerError::BuildFailed(format!("archiving {:?}: {}", context_dir, e)))?;

        let options = BuildImageOptionsBuilder::default()
            .dockerfile(dockerfile)
            .t(tag)
            .rm(true)
            .build();

        let mut stream =
            self.client
                .build_image(options, None, Some(bollard::body_full(context.into())));

        while let Some(msg) = stream.next().await {
            let info = msg?;
            if let Some(output) = info.stream {
                tracing::debug!(dockerfile, "{}", output.trim_end());
            }
            if let Some(error_detail) = info.error_detail {
                return Err(DockerError::BuildFailed(
                    error_detail.message.unwrap_or_default(),
                ));
            }
        }

        tracing::info!(dockerfile, tag, "Image built");
        Ok(())
    }
}

/// Pack a build-context directory into an uncompressed tar archive in memory.
fn tar_context(context_dir: &Path) -> std::io::Result<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());
    builder.append_dir_all(".", context_dir)?;
    builder.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tar_context_missing_dir_errors() {
        let err = tar_context(Path::new("/nonexistent/build/context")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_tar_context_packs_files() {
        let dir = std::env::temp_dir().join(format!("smoke-tar-test-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("app")).unwrap();
        std::fs::write(dir.join("latest.dockerfile"), "FROM scratch\n").unwrap();
        std::fs::write(dir.join("app/main.py"), "print('x')\n").unwrap();

        let archive = tar_context(&dir).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        let mut found = Vec::new();
        let mut reader = tar::Archive::new(archive.as_slice());
        for entry in reader.entries().unwrap() {
            let entry = entry.unwrap();
            found.push(entry.path().unwrap().to_string_lossy().into_owned());
        }
        assert!(found.iter().any(|p| p.ends_with("latest.dockerfile")));
        assert!(found.iter().any(|p| p.ends_with("app/main.py")));
    }
}
