//! Face verification stage.
//!
//! Uploads the accepted document image together with a gated selfie and maps
//! the oracle's similarity response into a [`FaceOutcome`]. A recognized
//! decision token wins; otherwise [`FaceMatchResult::passed`] decides.
//!
//! The oracle's `threshold` is carried through for display only and is never
//! compared against the similarity here.

use crate::error::SubmissionError;
use crate::gate::Admitted;
use crate::session::AcceptedDocument;
use kyc_oracle::{FaceResponse, IdentityOracle};
use kyc_types::{Decision, ExpectedIdentity, FaceMatchResult, ResolvedDecision, Verdict};
use serde::{Deserialize, Serialize};

/// Everything the oracle said about a face submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceOutcome {
    pub result: FaceMatchResult,
    /// The oracle's own pass bar.
    pub threshold: f64,
    pub decision: Option<Decision>,
    pub resolved: ResolvedDecision,
}

impl FaceOutcome {
    /// Map a response, rejecting scores outside `[0, 1]`.
    pub fn from_response(response: FaceResponse) -> Result<Self, SubmissionError> {
        check_unit("similarity", response.similarity)?;
        check_unit("threshold", response.threshold)?;
        if let Some(liveness) = response.liveness_score {
            check_unit("livenessScore", liveness)?;
        }

        let result = FaceMatchResult {
            match_score: response.similarity,
            liveness_score: response.liveness_score,
        };
        let decision = response.decision.map(Decision::from);
        let resolved = ResolvedDecision::resolve(decision.as_ref(), result.passed());

        Ok(Self {
            result,
            threshold: response.threshold,
            decision,
            resolved,
        })
    }

    pub fn verdict(&self) -> Verdict {
        self.resolved.verdict
    }
}

fn check_unit(field: &str, value: f64) -> Result<(), SubmissionError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SubmissionError::UnexpectedResponseShape(format!(
            "{field} {value} is outside [0, 1]"
        )))
    }
}

fn upload_len(document: &AcceptedDocument, selfie: &Admitted) -> usize {
    document.image().len() + selfie.len()
}

/// Client for the oracle's face endpoint.
#[derive(Clone, Copy, Debug, Default)]
pub struct FaceStage;

impl FaceStage {
    /// Upload the accepted document plus `selfie` for matching.
    ///
    /// Requiring an [`AcceptedDocument`] makes it impossible to call this
    /// before the document step passed without mismatches. An oracle 413 is
    /// reported with the combined length of both images, since either part
    /// may have tipped the request over the limit.
    pub async fn submit<O: IdentityOracle>(
        &self,
        oracle: &O,
        document: &AcceptedDocument,
        selfie: &Admitted,
        expected: &ExpectedIdentity,
    ) -> Result<FaceOutcome, SubmissionError> {
        let response = oracle
            .verify_face(document.image(), selfie.image(), expected)
            .await
            .map_err(|e| SubmissionError::from_oracle(e, upload_len(document, selfie)))?;
        FaceOutcome::from_response(response)
    }
}
