//! Nullable infrastructure for deterministic testing.
//!
//! The verification pipeline's only external dependencies are the camera and
//! the identity oracle. This crate provides test-friendly stand-ins that:
//! - Return scripted values
//! - Record what they were asked to do
//! - Never touch the network
//!
//! Usage: swap `HttpOracle` for [`NullOracle`] in tests.

pub mod capture;
pub mod oracle;
pub mod responses;

pub use capture::NullCapture;
pub use oracle::{NullOracle, RecordedRequest};
pub use responses::{document_response, face_response};
