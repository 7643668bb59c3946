//! Conf module — harness configuration model and loading.

pub mod load;
pub mod model;

pub use model::{HarnessConfig, ReadinessConfig};
