//! Docker engine client — connection, image build, container lifecycle, exec.

pub mod client;
pub mod container;
pub mod exec;
pub mod image;

pub use client::{DockerClient, DockerError};
pub use exec::ExecOutput;
