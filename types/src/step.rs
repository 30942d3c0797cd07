//! Session step and stage identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a verification session currently is.
///
/// Ordered: `Document < Face < Done`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Step {
    /// Capturing and verifying the identity document.
    Document,
    /// Capturing and matching the selfie.
    Face,
    /// Terminal.
    Done,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Face => "face",
            Self::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// The stage whose capture this step is waiting for, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Document => Some(Stage::Document),
            Self::Face => Some(Stage::Face),
            Self::Done => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two submission stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Document,
    Face,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Face => "face",
        }
    }

    /// The session step this stage belongs to.
    pub fn step(&self) -> Step {
        match self {
            Self::Document => Step::Document,
            Self::Face => Step::Face,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
