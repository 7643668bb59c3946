// Domain-driven module structure for the image smoke harness.

// Core infrastructure
pub mod conf;
pub mod docker;

// Domain modules
pub mod appconf;
pub mod probe;
pub mod runtime;
pub mod scenario;
pub mod suite;
pub mod verify;
