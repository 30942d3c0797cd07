//! What the caller renders after a submission.
//!
//! None of these are errors: mismatches, failed face matches and manual
//! review are expected, user-actionable states.

use kyc_types::{MismatchInfo, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal outcome of a completed session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationOutcome {
    /// Face stage auto-passed.
    Verified,
    /// Face stage passed pending human review. Not a failure.
    FlaggedForReview,
}

impl VerificationOutcome {
    /// `None` for `Fail`, which never completes a session.
    pub fn from_verdict(verdict: Verdict) -> Option<Self> {
        match verdict {
            Verdict::AutoPass => Some(Self::Verified),
            Verdict::ManualReview => Some(Self::FlaggedForReview),
            Verdict::Fail => None,
        }
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verified => f.write_str("verified"),
            Self::FlaggedForReview => f.write_str("flagged for review"),
        }
    }
}

/// Result of one stage submission, from the user's point of view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PolicyOutcome {
    /// Document passed; the session is now at the face step.
    DocumentAccepted { verdict: Verdict },
    /// Listed fields disagree with the expected identity. Show them and
    /// require a document retake.
    MismatchBlocked(MismatchInfo),
    /// Document failed without mismatches (explicit fail or poor capture
    /// quality). Retake the document.
    DocumentRetryRequired,
    /// Face match failed. Retake the selfie; the document stays accepted.
    FaceRetryRequired,
    /// Session reached `Done`.
    Completed(VerificationOutcome),
}
