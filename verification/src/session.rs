//! Verification session state and its transition function.
//!
//! [`VerificationSession::apply`] is the only way to mutate a session. It
//! validates an event against the current state before touching anything,
//! so a rejected event leaves the session exactly as it was.
//!
//! Transitions:
//! - `Document -> Face` when the document outcome has no mismatches and a
//!   passing verdict (auto pass, manual review, or heuristic pass).
//! - `Face -> Done` when the face verdict is auto pass or manual review.
//! - Retaking the document from `Face` returns to `Document` and clears the
//!   selfie and face result along with the document.
//!
//! Nothing else moves the step. A session in `Done` accepts no events.

use crate::document::DocumentOutcome;
use crate::error::SessionError;
use crate::face::FaceOutcome;
use crate::gate::Admitted;
use crate::outcome::VerificationOutcome;
use kyc_types::{CapturedImage, MismatchInfo, Stage, Step, Verdict};

/// A mutation request for a session.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    DocumentCaptured(Admitted),
    SelfieCaptured(Admitted),
    DocumentEvaluated(DocumentOutcome),
    FaceEvaluated(FaceOutcome),
    /// Move forward if the current stage's outcome allows it.
    Advance,
    /// Discard the given stage's capture and result.
    Retake(Stage),
    /// Start over from an empty document step.
    Reset,
}

/// A step change produced by an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: Step,
    pub to: Step,
}

/// Proof that the document step passed without mismatches.
///
/// Only [`VerificationSession::accepted_document`] hands these out.
#[derive(Clone, Debug)]
pub struct AcceptedDocument {
    image: Admitted,
}

impl AcceptedDocument {
    pub fn image(&self) -> &CapturedImage {
        self.image.image()
    }
}

/// One verification attempt.
#[derive(Clone, Debug)]
pub struct VerificationSession {
    step: Step,
    document_image: Option<Admitted>,
    selfie_image: Option<Admitted>,
    document_result: Option<DocumentOutcome>,
    mismatch: Option<MismatchInfo>,
    face_result: Option<FaceOutcome>,
}

impl Default for VerificationSession {
    fn default() -> Self {
        Self {
            step: Step::Document,
            document_image: None,
            selfie_image: None,
            document_result: None,
            mismatch: None,
            face_result: None,
        }
    }
}

impl VerificationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn document_image(&self) -> Option<&CapturedImage> {
        self.document_image.as_ref().map(Admitted::image)
    }

    pub fn selfie_image(&self) -> Option<&CapturedImage> {
        self.selfie_image.as_ref().map(Admitted::image)
    }

    pub fn document_result(&self) -> Option<&DocumentOutcome> {
        self.document_result.as_ref()
    }

    /// Present only while a mismatch blocks the document step.
    pub fn mismatch(&self) -> Option<&MismatchInfo> {
        self.mismatch.as_ref()
    }

    pub fn face_result(&self) -> Option<&FaceOutcome> {
        self.face_result.as_ref()
    }

    /// Current verdict of `stage`, `None` when it has no result yet.
    pub fn verdict(&self, stage: Stage) -> Option<Verdict> {
        match stage {
            Stage::Document => self.document_result.as_ref().map(DocumentOutcome::verdict),
            Stage::Face => self.face_result.as_ref().map(FaceOutcome::verdict),
        }
    }

    /// The terminal outcome, once the session is `Done`.
    pub fn outcome(&self) -> Option<VerificationOutcome> {
        if !self.step.is_terminal() {
            return None;
        }
        self.face_result
            .as_ref()
            .and_then(|face| VerificationOutcome::from_verdict(face.verdict()))
    }

    fn document_accepted(&self) -> bool {
        self.document_image.is_some()
            && self.mismatch.is_none()
            && self
                .document_result
                .as_ref()
                .is_some_and(DocumentOutcome::allows_advance)
    }

    /// The document image, if the document step passed.
    pub fn accepted_document(&self) -> Option<AcceptedDocument> {
        if !self.document_accepted() {
            return None;
        }
        self.document_image
            .clone()
            .map(|image| AcceptedDocument { image })
    }

    /// The captured document, if it is ready to be submitted.
    pub fn pending_document(&self) -> Result<Admitted, SessionError> {
        self.ensure_open()?;
        self.expect_step(Step::Document)?;
        if self.document_result.is_some() {
            return Err(SessionError::RetakeRequired(Stage::Document));
        }
        self.document_image
            .clone()
            .ok_or(SessionError::MissingImage(Stage::Document))
    }

    /// The accepted document and captured selfie, if the face stage is ready
    /// to be submitted.
    pub fn pending_face(&self) -> Result<(AcceptedDocument, Admitted), SessionError> {
        self.ensure_open()?;
        let document = self
            .accepted_document()
            .ok_or(SessionError::DocumentNotAccepted)?;
        self.expect_step(Step::Face)?;
        if self.face_result.is_some() {
            return Err(SessionError::RetakeRequired(Stage::Face));
        }
        let selfie = self
            .selfie_image
            .clone()
            .ok_or(SessionError::MissingImage(Stage::Face))?;
        Ok((document, selfie))
    }

    /// Apply `event`, returning the step change it caused, if any.
    pub fn apply(&mut self, event: SessionEvent) -> Result<Option<Transition>, SessionError> {
        self.ensure_open()?;

        match event {
            SessionEvent::DocumentCaptured(image) => {
                self.expect_step(Step::Document)?;
                if self.document_result.is_some() {
                    return Err(SessionError::RetakeRequired(Stage::Document));
                }
                self.document_image = Some(image);
                Ok(None)
            }
            SessionEvent::SelfieCaptured(image) => {
                self.expect_step(Step::Face)?;
                if self.face_result.is_some() {
                    return Err(SessionError::RetakeRequired(Stage::Face));
                }
                self.selfie_image = Some(image);
                Ok(None)
            }
            SessionEvent::DocumentEvaluated(outcome) => {
                self.expect_step(Step::Document)?;
                if self.document_image.is_none() {
                    return Err(SessionError::MissingImage(Stage::Document));
                }
                if self.document_result.is_some() {
                    return Err(SessionError::RetakeRequired(Stage::Document));
                }
                self.mismatch =
                    (!outcome.mismatches.is_empty()).then(|| outcome.mismatches.clone());
                self.document_result = Some(outcome);
                Ok(None)
            }
            SessionEvent::FaceEvaluated(outcome) => {
                self.expect_step(Step::Face)?;
                if self.selfie_image.is_none() {
                    return Err(SessionError::MissingImage(Stage::Face));
                }
                if self.face_result.is_some() {
                    return Err(SessionError::RetakeRequired(Stage::Face));
                }
                self.face_result = Some(outcome);
                Ok(None)
            }
            SessionEvent::Advance => Ok(self.advance()),
            SessionEvent::Retake(stage) => self.retake(stage),
            SessionEvent::Reset => {
                let from = self.step;
                *self = Self::new();
                Ok(transition(from, Step::Document))
            }
        }
    }

    fn advance(&mut self) -> Option<Transition> {
        let next = match self.step {
            Step::Document if self.document_accepted() => Step::Face,
            Step::Face
                if self
                    .face_result
                    .as_ref()
                    .is_some_and(|face| face.verdict().is_pass()) =>
            {
                Step::Done
            }
            _ => return None,
        };
        let from = self.step;
        self.step = next;
        transition(from, next)
    }

    fn retake(&mut self, stage: Stage) -> Result<Option<Transition>, SessionError> {
        match stage {
            Stage::Document => {
                // The identity claim changed, so anything matched against the
                // old document goes too.
                let from = self.step;
                self.document_image = None;
                self.document_result = None;
                self.mismatch = None;
                self.selfie_image = None;
                self.face_result = None;
                self.step = Step::Document;
                Ok(transition(from, Step::Document))
            }
            Stage::Face => {
                self.expect_step(Step::Face)?;
                self.selfie_image = None;
                self.face_result = None;
                Ok(None)
            }
        }
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.step.is_terminal() {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }

    fn expect_step(&self, expected: Step) -> Result<(), SessionError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(SessionError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }
}

fn transition(from: Step, to: Step) -> Option<Transition> {
    (from != to).then_some(Transition { from, to })
}
