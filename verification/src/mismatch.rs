//! Mismatch resolver.
//!
//! A non-empty mismatch list is a hard block on leaving the document step.
//! No decision token can override it: the user must see the listed fields
//! and capture a fresh document.

use crate::document::DocumentOutcome;
use kyc_types::MismatchInfo;

/// What the document step may do next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Fields disagree with the expected identity; retake required.
    Blocked(MismatchInfo),
    Proceed,
}

pub fn resolve(outcome: &DocumentOutcome) -> Resolution {
    if outcome.mismatches.is_empty() {
        Resolution::Proceed
    } else {
        Resolution::Blocked(outcome.mismatches.clone())
    }
}
