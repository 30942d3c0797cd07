//! Shared data model for the identity-verification (KYC) pipeline.
//!
//! This crate defines the types every other crate in the workspace passes
//! around: captured images, the caller's expected identity profile, the
//! per-stage results returned by the verification oracle, decision tokens,
//! and the session step enums.

pub mod decision;
pub mod face;
pub mod identity;
pub mod image;
pub mod ocr;
pub mod step;

pub use decision::{Decision, DecisionSource, ResolvedDecision, Verdict};
pub use face::{FaceMatchResult, LIVENESS_PASS_SCORE, MATCH_PASS_SCORE};
pub use identity::ExpectedIdentity;
pub use image::CapturedImage;
pub use ocr::{ExtractedFields, MismatchInfo, OcrResult};
pub use step::{Stage, Step};
