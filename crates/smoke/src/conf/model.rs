//! Model — HarnessConfig and related structs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub docker_socket: String,
    pub image_tag: String,
    pub container_name: String,
    pub context_dir: String,
    pub host_port: u16,
    pub stop_timeout_secs: u32,
    pub readiness: ReadinessConfig,
}

/// How long to wait before and while probing the container's HTTP port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Grace period before the first probe, matching the pace of a fresh
    /// worker boot.
    pub initial_delay_ms: u64,
    pub poll_interval_ms: u64,
    pub timeout_secs: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            docker_socket: "".to_string(),
            image_tag: "app-smoke-testimage".to_string(),
            container_name: "app-smoke-test".to_string(),
            context_dir: "fixtures/package_app_custom_config".to_string(),
            host_port: 8000,
            stop_timeout_secs: 5,
            readiness: ReadinessConfig::default(),
        }
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 1000,
            poll_interval_ms: 250,
            timeout_secs: 30,
        }
    }
}

impl HarnessConfig {
    /// Validate that configuration values are sane and the build context exists.
    pub fn validate(&self) -> Result<(), String> {
        if self.image_tag.is_empty() {
            return Err("image_tag must not be empty".to_string());
        }
        if self.container_name.is_empty() {
            return Err("container_name must not be empty".to_string());
        }
        if self.host_port == 0 {
            return Err("host_port must be > 0".to_string());
        }
        if !std::path::Path::new(&self.context_dir).is_dir() {
            return Err(format!("build context not found at: {}", self.context_dir));
        }
        self.readiness.validate()
    }
}

impl ReadinessConfig {
    /// Validate readiness timing values.
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("readiness.poll_interval_ms must be > 0".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("readiness.timeout_secs must be > 0".to_string());
        }
        Ok(())
    }
}
