//! Document verification stage.
//!
//! Uploads a gated document image, then maps the oracle's response into a
//! [`DocumentOutcome`]. The stage never touches the session; the flow records
//! the outcome and decides whether to advance.
//!
//! Decision resolution:
//! 1. A non-empty mismatch list blocks, whatever the decision says
//!    (see [`crate::mismatch`]).
//! 2. A recognized decision token is authoritative.
//! 3. Otherwise [`OcrResult::is_quality_ok`] stands in as pass/fail.

use crate::error::SubmissionError;
use crate::gate::Admitted;
use crate::mismatch::{self, Resolution};
use kyc_oracle::{DocumentResponse, IdentityOracle};
use kyc_types::{
    Decision, ExpectedIdentity, ExtractedFields, MismatchInfo, OcrResult, ResolvedDecision,
    Verdict,
};
use serde::{Deserialize, Serialize};

/// Shown in place of a mismatch entry the oracle left blank. The entry still
/// blocks.
pub const UNNAMED_FIELD: &str = "Unknown field";

/// Everything the oracle said about a document submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentOutcome {
    pub ocr: OcrResult,
    /// The raw decision token, if the oracle sent one.
    pub decision: Option<Decision>,
    pub mismatches: MismatchInfo,
    /// Decision after the token/quality fallback, ignoring mismatches.
    pub resolved: ResolvedDecision,
}

impl DocumentOutcome {
    pub fn from_response(response: DocumentResponse) -> Self {
        let checks = response.checks;
        let extracted = response.extracted;
        let ocr = OcrResult {
            fields: ExtractedFields {
                id_number: extracted.id_number,
                first_name: extracted.first_name,
                last_name: extracted.last_name,
                full_name: extracted.full_name,
                date_of_birth: extracted.date_of_birth,
                gender: extracted.gender,
                ocr_confidence: extracted.ocr_confidence,
            },
            corners_ok: checks.corners_ok.unwrap_or(checks.id_format_valid),
            blur_ok: checks.blur_ok.unwrap_or(checks.ocr_confidence_ok),
            glare_ok: checks.glare_ok.unwrap_or(checks.ocr_confidence_ok),
            id_format_valid: checks.id_format_valid,
            ocr_confidence_ok: checks.ocr_confidence_ok,
        };

        let decision = response.decision.map(Decision::from);
        let mismatches = MismatchInfo::new(
            response
                .mismatches
                .unwrap_or_default()
                .into_iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        UNNAMED_FIELD.to_string()
                    } else {
                        field
                    }
                })
                .collect(),
        );
        let resolved = ResolvedDecision::resolve(decision.as_ref(), ocr.is_quality_ok());

        Self {
            ocr,
            decision,
            mismatches,
            resolved,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(mismatch::resolve(self), Resolution::Blocked(_))
    }

    /// The stage verdict with mismatches taken into account: a blocked
    /// document is always `Fail`.
    pub fn verdict(&self) -> Verdict {
        if self.is_blocked() {
            Verdict::Fail
        } else {
            self.resolved.verdict
        }
    }

    /// Whether the session may leave the document step on this outcome.
    pub fn allows_advance(&self) -> bool {
        self.verdict().is_pass()
    }
}

/// Client for the oracle's document endpoint.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentStage;

impl DocumentStage {
    /// Upload `image` for OCR and comparison against `expected`.
    pub async fn submit<O: IdentityOracle>(
        &self,
        oracle: &O,
        image: &Admitted,
        expected: &ExpectedIdentity,
    ) -> Result<DocumentOutcome, SubmissionError> {
        let response = oracle
            .verify_document(image.image(), expected)
            .await
            .map_err(|e| SubmissionError::from_oracle(e, image.len()))?;
        Ok(DocumentOutcome::from_response(response))
    }
}
