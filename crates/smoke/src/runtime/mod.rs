//! Runtime module — harness lifecycle: logging init and boot.

pub mod boot;
