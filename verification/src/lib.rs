//! Identity verification (KYC) pipeline.
//!
//! Two decision-gated stages turn a captured document image and a captured
//! selfie into a verified or flagged identity outcome:
//! 1. **Document**: OCR plus comparison against the caller's expected
//!    identity. Any mismatched field blocks progress until the document is
//!    retaken.
//! 2. **Face**: similarity between the accepted document and a selfie.
//!    Manual review completes the session just like an auto pass.
//!
//! A local **quality gate** rejects unusable captures before any upload. The
//! remote oracle's decision is authoritative; local heuristics only fill in
//! when it sends no recognized decision.

pub mod config;
pub mod document;
pub mod error;
pub mod face;
pub mod flow;
pub mod gate;
pub mod guard;
pub mod mismatch;
pub mod outcome;
pub mod session;
pub mod spans;

pub use config::GateConfig;
pub use document::{DocumentOutcome, DocumentStage};
pub use error::{CaptureError, SessionError, SubmissionError, ValidationError};
pub use face::{FaceOutcome, FaceStage};
pub use flow::{FlowEvent, VerificationFlow};
pub use gate::{Admitted, QualityGate};
pub use guard::{InFlight, InFlightToken};
pub use mismatch::Resolution;
pub use outcome::{PolicyOutcome, VerificationOutcome};
pub use session::{AcceptedDocument, SessionEvent, Transition, VerificationSession};
