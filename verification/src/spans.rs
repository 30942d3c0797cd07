//! Pre-built [`tracing::Span`] constructors for stage submissions.

use tracing::{info_span, Span};

/// Span covering one document upload and its evaluation.
pub fn document_submit_span(oracle: &str, bytes: usize) -> Span {
    info_span!("document_submit", oracle = %oracle, bytes = bytes)
}

/// Span covering one face upload and its evaluation.
pub fn face_submit_span(oracle: &str, document_bytes: usize, selfie_bytes: usize) -> Span {
    info_span!(
        "face_submit",
        oracle = %oracle,
        document_bytes = document_bytes,
        selfie_bytes = selfie_bytes
    )
}
