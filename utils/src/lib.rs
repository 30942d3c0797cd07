//! Shared utilities for the identity verification workspace.

pub mod logging;
pub mod size;

pub use logging::{init_logging, LogFormat};
pub use size::format_bytes;
