//! Builders for scripted oracle responses.

use kyc_oracle::{ChecksPayload, DocumentResponse, ExtractedPayload, FaceResponse};

/// A document response with clean capture checks.
pub fn document_response(decision: Option<&str>, mismatches: &[&str]) -> DocumentResponse {
    DocumentResponse {
        extracted: ExtractedPayload {
            id_number: Some("A1234567".into()),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            full_name: Some("Ada Lovelace".into()),
            date_of_birth: Some("1815-12-10".into()),
            gender: Some("F".into()),
            ocr_confidence: Some(0.97),
        },
        checks: ChecksPayload {
            id_format_valid: true,
            ocr_confidence_ok: true,
            corners_ok: Some(true),
            blur_ok: Some(true),
            glare_ok: Some(true),
        },
        decision: decision.map(str::to_string),
        mismatches: Some(mismatches.iter().map(|s| s.to_string()).collect()),
    }
}

/// A face response with the given scores.
pub fn face_response(
    similarity: f64,
    threshold: f64,
    decision: Option<&str>,
    liveness_score: Option<f64>,
) -> FaceResponse {
    FaceResponse {
        similarity,
        threshold,
        decision: decision.map(str::to_string),
        liveness_score,
    }
}
