//! JSON bodies returned by the oracle.
//!
//! Only the top-level objects (`extracted`, `checks`) and the face scores
//! (`similarity`, `threshold`) are required; a body missing them fails to
//! deserialize and surfaces as [`OracleError::UnexpectedResponse`].
//!
//! [`OracleError::UnexpectedResponse`]: crate::OracleError::UnexpectedResponse

use serde::{Deserialize, Serialize};

/// Response to a document submission.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub extracted: ExtractedPayload,
    pub checks: ChecksPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
    /// Field names that disagree with the expected identity. `null` and a
    /// missing key both mean "none".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mismatches: Option<Vec<String>>,
}

/// The `extracted` object of a document response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedPayload {
    #[serde(default)]
    pub id_number: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub ocr_confidence: Option<f64>,
}

/// The `checks` object of a document response.
///
/// The capture-quality flags are optional extensions; when the oracle omits
/// them they are derived from `idFormatValid` / `ocrConfidenceOk`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecksPayload {
    #[serde(default)]
    pub id_format_valid: bool,
    #[serde(default)]
    pub ocr_confidence_ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corners_ok: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur_ok: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glare_ok: Option<bool>,
}

/// Response to a face verification submission.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceResponse {
    /// Similarity between document portrait and selfie [0.0, 1.0].
    pub similarity: f64,
    /// The oracle's own pass bar. Informational only.
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness_score: Option<f64>,
}
