//! Shared plumbing for the Inkstand binaries and integration tests.
//!
//! Currently this is only the `tracing` bootstrap in [`observability`].
pub mod observability;

pub use observability::{LogConfig, LogFormat, init_logging};
