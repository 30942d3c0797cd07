//! Face-stage similarity and liveness scores.

use serde::{Deserialize, Serialize};

/// Minimum similarity for the local fallback heuristic to pass.
pub const MATCH_PASS_SCORE: f64 = 0.72;

/// Minimum liveness for the local fallback heuristic to pass.
pub const LIVENESS_PASS_SCORE: f64 = 0.60;

/// Similarity between the document portrait and the selfie.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceMatchResult {
    /// Similarity [0.0, 1.0].
    pub match_score: f64,
    /// Liveness [0.0, 1.0], when the oracle reported one.
    pub liveness_score: Option<f64>,
}

impl FaceMatchResult {
    /// Fallback pass heuristic, consulted only when the oracle gave no
    /// recognized decision. A missing liveness score counts as zero.
    pub fn passed(&self) -> bool {
        self.match_score >= MATCH_PASS_SCORE
            && self.liveness_score.unwrap_or(0.0) >= LIVENESS_PASS_SCORE
    }
}
