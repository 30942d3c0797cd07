//! Oracle decision tokens and their resolution into a stage verdict.
//!
//! The oracle returns a free-form decision string. It is parsed once into the
//! closed [`Decision`] variant; everything downstream matches on that instead
//! of comparing strings. Unrecognized or absent tokens take the heuristic
//! fallback path described on [`ResolvedDecision::resolve`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// A decision token as reported by the oracle.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Decision {
    /// `AUTO_PASS`: immediate pass.
    AutoPass,
    /// `MANUAL_REVIEW`: conditional pass, queued for human review.
    ManualReview,
    /// `FAIL`, `AUTO_FAIL`, `REJECT` or `REJECTED`: explicit failure.
    Fail,
    /// Any other token, kept verbatim.
    Unknown(String),
}

impl Decision {
    /// Parse a raw token. Matching ignores case and surrounding whitespace.
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_uppercase().as_str() {
            "AUTO_PASS" => Self::AutoPass,
            "MANUAL_REVIEW" => Self::ManualReview,
            "FAIL" | "AUTO_FAIL" | "REJECT" | "REJECTED" => Self::Fail,
            _ => Self::Unknown(token.to_string()),
        }
    }

    /// Whether the token is authoritative (anything but `Unknown`).
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// The canonical wire token.
    pub fn as_str(&self) -> &str {
        match self {
            Self::AutoPass => "AUTO_PASS",
            Self::ManualReview => "MANUAL_REVIEW",
            Self::Fail => "FAIL",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Decision {
    fn from(token: String) -> Self {
        Self::parse(&token)
    }
}

impl From<Decision> for String {
    fn from(decision: Decision) -> Self {
        decision.as_str().to_string()
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single outcome a stage resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    AutoPass,
    ManualReview,
    Fail,
}

impl Verdict {
    /// `AutoPass` and `ManualReview` both let the session move on.
    pub fn is_pass(&self) -> bool {
        !matches!(self, Self::Fail)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AutoPass => "auto_pass",
            Self::ManualReview => "manual_review",
            Self::Fail => "fail",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a verdict came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionSource {
    /// A recognized oracle token.
    Oracle,
    /// The local fallback heuristic.
    Heuristic,
}

/// A verdict together with its source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedDecision {
    pub verdict: Verdict,
    pub source: DecisionSource,
}

impl ResolvedDecision {
    /// Resolve a stage decision.
    ///
    /// A recognized token always wins. For `Unknown` or absent tokens the
    /// caller-computed `heuristic_pass` decides between `AutoPass` and `Fail`.
    pub fn resolve(decision: Option<&Decision>, heuristic_pass: bool) -> Self {
        let verdict = match decision {
            Some(Decision::AutoPass) => Verdict::AutoPass,
            Some(Decision::ManualReview) => Verdict::ManualReview,
            Some(Decision::Fail) => Verdict::Fail,
            Some(Decision::Unknown(_)) | None => {
                return Self {
                    verdict: if heuristic_pass {
                        Verdict::AutoPass
                    } else {
                        Verdict::Fail
                    },
                    source: DecisionSource::Heuristic,
                };
            }
        };
        Self {
            verdict,
            source: DecisionSource::Oracle,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.verdict.is_pass()
    }
}
