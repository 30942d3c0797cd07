//! Verification flow: connects the quality gate, both stages and the
//! session reducer into a single end-to-end workflow.
//!
//! A flow owns exactly one [`VerificationSession`]. It is not meant to be
//! shared between users or reused after [`finish`](VerificationFlow::finish);
//! dropping it abandons the attempt and discards the captured images.

use crate::document::DocumentStage;
use crate::error::{CaptureError, SessionError, SubmissionError};
use crate::face::FaceStage;
use crate::gate::{Admitted, QualityGate};
use crate::guard::InFlight;
use crate::mismatch::{self, Resolution};
use crate::outcome::{PolicyOutcome, VerificationOutcome};
use crate::session::{AcceptedDocument, SessionEvent, Transition, VerificationSession};
use crate::spans;
use kyc_oracle::IdentityOracle;
use kyc_types::{CapturedImage, Decision, ExpectedIdentity, Stage, Step};
use std::sync::{Mutex, MutexGuard};
use tracing::Instrument;

/// Events emitted by the flow for the caller to render.
#[derive(Clone, Debug, PartialEq)]
pub enum FlowEvent {
    StepChanged { from: Step, to: Step },
    /// Document blocked by mismatched identity fields.
    DocumentBlocked { fields: Vec<String> },
    /// Document failed without mismatches.
    DocumentRejected,
    FaceRetryRequired { similarity: f64, threshold: f64 },
    Completed(VerificationOutcome),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Drives one verification attempt against an oracle.
pub struct VerificationFlow<O> {
    oracle: O,
    gate: QualityGate,
    documents: DocumentStage,
    faces: FaceStage,
    session: Mutex<VerificationSession>,
    in_flight: InFlight,
    /// Pending events for the caller to drain.
    pending_events: Mutex<Vec<FlowEvent>>,
}

impl<O: IdentityOracle> VerificationFlow<O> {
    pub fn new(oracle: O, gate: QualityGate) -> Self {
        Self {
            oracle,
            gate,
            documents: DocumentStage,
            faces: FaceStage,
            session: Mutex::new(VerificationSession::new()),
            in_flight: InFlight::new(),
            pending_events: Mutex::new(Vec::new()),
        }
    }

    pub fn step(&self) -> Step {
        lock(&self.session).step()
    }

    /// A snapshot of the session.
    pub fn session(&self) -> VerificationSession {
        lock(&self.session).clone()
    }

    /// A document upload is in flight.
    pub fn is_uploading(&self) -> bool {
        self.in_flight.current() == Some(Stage::Document)
    }

    /// A face match is in flight.
    pub fn is_validating(&self) -> bool {
        self.in_flight.current() == Some(Stage::Face)
    }

    /// Take all events emitted since the last call.
    pub fn drain_events(&self) -> Vec<FlowEvent> {
        std::mem::take(&mut *lock(&self.pending_events))
    }

    /// Gate and store a document capture.
    pub fn capture_document(&self, image: CapturedImage) -> Result<(), CaptureError> {
        self.capture(Stage::Document, image)
    }

    /// Gate and store a selfie capture.
    pub fn capture_selfie(&self, image: CapturedImage) -> Result<(), CaptureError> {
        self.capture(Stage::Face, image)
    }

    fn capture(&self, stage: Stage, image: CapturedImage) -> Result<(), CaptureError> {
        let admitted = self.gate.admit(image).inspect_err(|e| {
            tracing::debug!(stage = %stage, error = %e, "capture rejected by quality gate");
        })?;
        let _token = self.in_flight.try_acquire(stage).map_err(SessionError::Busy)?;
        let event = match stage {
            Stage::Document => SessionEvent::DocumentCaptured(admitted),
            Stage::Face => SessionEvent::SelfieCaptured(admitted),
        };
        self.apply(event)?;
        Ok(())
    }

    /// Upload the captured document and record the oracle's verdict.
    ///
    /// Advances to the face step only when the document passes without
    /// mismatches. Remote errors are returned once; nothing is retried.
    pub async fn submit_document(
        &self,
        expected: &ExpectedIdentity,
    ) -> Result<PolicyOutcome, SubmissionError> {
        let _token = self
            .in_flight
            .try_acquire(Stage::Document)
            .map_err(SubmissionError::InProgress)?;
        let image = self.pending_document()?;

        let span = spans::document_submit_span(self.oracle.name(), image.len());
        let outcome = match self
            .documents
            .submit(&self.oracle, &image, expected)
            .instrument(span.clone())
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(parent: &span, error = %e, "document submission failed");
                return Err(e);
            }
        };

        tracing::info!(
            parent: &span,
            decision = outcome.decision.as_ref().map(Decision::as_str).unwrap_or("none"),
            verdict = %outcome.verdict(),
            mismatches = outcome.mismatches.len(),
            "document evaluated"
        );

        self.apply(SessionEvent::DocumentEvaluated(outcome.clone()))?;
        if self.apply(SessionEvent::Advance)?.is_some() {
            return Ok(PolicyOutcome::DocumentAccepted {
                verdict: outcome.verdict(),
            });
        }

        match mismatch::resolve(&outcome) {
            Resolution::Blocked(info) => {
                tracing::warn!(
                    parent: &span,
                    fields = ?info.fields(),
                    "document blocked by mismatch"
                );
                self.publish(FlowEvent::DocumentBlocked {
                    fields: info.fields().to_vec(),
                });
                Ok(PolicyOutcome::MismatchBlocked(info))
            }
            Resolution::Proceed => {
                tracing::warn!(parent: &span, "document rejected");
                self.publish(FlowEvent::DocumentRejected);
                Ok(PolicyOutcome::DocumentRetryRequired)
            }
        }
    }

    /// Upload the accepted document plus the captured selfie.
    ///
    /// Auto pass and manual review both complete the session; a failed match
    /// leaves it at the face step for a selfie retake.
    pub async fn submit_face(
        &self,
        expected: &ExpectedIdentity,
    ) -> Result<PolicyOutcome, SubmissionError> {
        let _token = self
            .in_flight
            .try_acquire(Stage::Face)
            .map_err(SubmissionError::InProgress)?;
        let (document, selfie) = self.pending_face()?;

        let span =
            spans::face_submit_span(self.oracle.name(), document.image().len(), selfie.len());
        let outcome = match self
            .faces
            .submit(&self.oracle, &document, &selfie, expected)
            .instrument(span.clone())
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(parent: &span, error = %e, "face submission failed");
                return Err(e);
            }
        };

        tracing::info!(
            parent: &span,
            similarity = outcome.result.match_score,
            threshold = outcome.threshold,
            verdict = %outcome.verdict(),
            source = ?outcome.resolved.source,
            "face evaluated"
        );

        self.apply(SessionEvent::FaceEvaluated(outcome.clone()))?;
        let completed = self
            .apply(SessionEvent::Advance)?
            .and_then(|_| VerificationOutcome::from_verdict(outcome.verdict()));

        match completed {
            Some(result) => {
                tracing::info!(parent: &span, outcome = %result, "verification complete");
                self.publish(FlowEvent::Completed(result));
                Ok(PolicyOutcome::Completed(result))
            }
            None => {
                tracing::warn!(parent: &span, "face match failed, selfie retake required");
                self.publish(FlowEvent::FaceRetryRequired {
                    similarity: outcome.result.match_score,
                    threshold: outcome.threshold,
                });
                Ok(PolicyOutcome::FaceRetryRequired)
            }
        }
    }

    /// Discard `stage`'s capture and result.
    ///
    /// Retaking the document from the face step returns the session to the
    /// document step.
    pub fn retake(&self, stage: Stage) -> Result<(), SessionError> {
        let _token = self.in_flight.try_acquire(stage).map_err(SessionError::Busy)?;
        self.apply(SessionEvent::Retake(stage))?;
        tracing::info!(stage = %stage, "retake");
        Ok(())
    }

    /// Start over from an empty document step.
    pub fn reset(&self) -> Result<(), SessionError> {
        let _token = self
            .in_flight
            .try_acquire(Stage::Document)
            .map_err(SessionError::Busy)?;
        self.apply(SessionEvent::Reset)?;
        Ok(())
    }

    /// End the flow, returning the terminal outcome if the session is `Done`.
    pub fn finish(self) -> Option<VerificationOutcome> {
        let session = self
            .session
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        session.outcome()
    }

    fn pending_document(&self) -> Result<Admitted, SessionError> {
        lock(&self.session).pending_document()
    }

    fn pending_face(&self) -> Result<(AcceptedDocument, Admitted), SessionError> {
        lock(&self.session).pending_face()
    }

    fn apply(&self, event: SessionEvent) -> Result<Option<Transition>, SessionError> {
        let change = lock(&self.session).apply(event)?;
        if let Some(Transition { from, to }) = change {
            tracing::info!(from = %from, to = %to, "step changed");
            self.publish(FlowEvent::StepChanged { from, to });
        }
        Ok(change)
    }

    fn publish(&self, event: FlowEvent) {
        lock(&self.pending_events).push(event);
    }
}
