//! Identity Verification Oracle contract.
//!
//! The oracle is the remote service that performs OCR extraction, field
//! comparison against the expected identity, and face/liveness matching. The
//! pipeline treats it as an opaque decision source: this crate only defines
//! the request/response contract and ships an HTTP implementation.
//!
//! - [`IdentityOracle`]: the trait the verification stages call.
//! - [`HttpOracle`]: multipart upload client over `reqwest`.
//! - [`DocumentResponse`] / [`FaceResponse`]: the JSON bodies the oracle returns.

pub mod client;
pub mod config;
pub mod error;
pub mod response;

pub use client::HttpOracle;
pub use config::OracleConfig;
pub use error::OracleError;
pub use response::{ChecksPayload, DocumentResponse, ExtractedPayload, FaceResponse};

use kyc_types::{CapturedImage, ExpectedIdentity};
use std::future::Future;

/// The remote decision oracle.
///
/// Each call is a single atomic request: there is no server-side job to poll
/// or cancel, and implementations must not retry on their own.
pub trait IdentityOracle: Send + Sync {
    /// Submit the document front for OCR and comparison with `expected`.
    fn verify_document(
        &self,
        document: &CapturedImage,
        expected: &ExpectedIdentity,
    ) -> impl Future<Output = Result<DocumentResponse, OracleError>> + Send;

    /// Submit the accepted document front plus a selfie for face matching.
    fn verify_face(
        &self,
        document: &CapturedImage,
        selfie: &CapturedImage,
        expected: &ExpectedIdentity,
    ) -> impl Future<Output = Result<FaceResponse, OracleError>> + Send;

    /// Human-readable name of this oracle, used in logs.
    fn name(&self) -> &str;
}
