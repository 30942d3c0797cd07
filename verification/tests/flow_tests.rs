//! End-to-end flow tests against the nullable oracle.
//!
//! These drive `VerificationFlow` through the same capture → gate → stage →
//! session path a caller uses, with scripted oracle responses.

use kyc_nullables::{document_response, face_response, NullCapture, NullOracle};
use kyc_oracle::OracleError;
use kyc_types::{ExpectedIdentity, Stage, Step, Verdict};
use kyc_verification::{
    CaptureError, FlowEvent, PolicyOutcome, QualityGate, SessionError, SubmissionError,
    ValidationError, VerificationFlow, VerificationOutcome,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn identity() -> ExpectedIdentity {
    ExpectedIdentity::new("Ada Lovelace", "1815-12-10", "A1234567", "F")
}

fn flow(oracle: &NullOracle) -> VerificationFlow<NullOracle> {
    VerificationFlow::new(oracle.clone(), QualityGate::default())
}

/// A flow that has passed the document step.
async fn flow_at_face(oracle: &NullOracle) -> VerificationFlow<NullOracle> {
    oracle.enqueue_document(Ok(document_response(Some("AUTO_PASS"), &[])));
    let flow = flow(oracle);
    flow.capture_document(NullCapture::kib(100)).unwrap();
    flow.submit_document(&identity()).await.unwrap();
    assert_eq!(flow.step(), Step::Face);
    flow.drain_events();
    flow
}

// ---------------------------------------------------------------------------
// 1. Document stage
// ---------------------------------------------------------------------------

#[tokio::test]
async fn auto_pass_document_moves_to_face() {
    let oracle = NullOracle::new();
    oracle.enqueue_document(Ok(document_response(Some("AUTO_PASS"), &[])));
    let flow = flow(&oracle);

    flow.capture_document(NullCapture::kib(100)).unwrap();
    let outcome = flow.submit_document(&identity()).await.unwrap();

    assert_eq!(
        outcome,
        PolicyOutcome::DocumentAccepted {
            verdict: Verdict::AutoPass
        }
    );
    assert_eq!(flow.step(), Step::Face);
    assert_eq!(
        flow.drain_events(),
        vec![FlowEvent::StepChanged {
            from: Step::Document,
            to: Step::Face
        }]
    );
    assert_eq!(oracle.request_count(), 1);
}

#[tokio::test]
async fn mismatch_blocks_and_lists_fields() {
    let oracle = NullOracle::new();
    oracle.enqueue_document(Ok(document_response(
        Some("AUTO_PASS"),
        &["Name", "Date of Birth"],
    )));
    let flow = flow(&oracle);

    flow.capture_document(NullCapture::kib(100)).unwrap();
    let outcome = flow.submit_document(&identity()).await.unwrap();

    match outcome {
        PolicyOutcome::MismatchBlocked(info) => {
            assert_eq!(info.fields(), ["Name", "Date of Birth"]);
        }
        other => panic!("expected mismatch block, got {other:?}"),
    }
    assert_eq!(flow.step(), Step::Document);
    assert_eq!(
        flow.drain_events(),
        vec![FlowEvent::DocumentBlocked {
            fields: vec!["Name".to_string(), "Date of Birth".to_string()]
        }]
    );

    // Resubmitting the same capture is refused locally.
    let err = flow.submit_document(&identity()).await.unwrap_err();
    assert!(matches!(
        err,
        SubmissionError::Session(SessionError::RetakeRequired(Stage::Document))
    ));
    assert_eq!(oracle.request_count(), 1);
}

#[tokio::test]
async fn blank_mismatch_entry_still_blocks() {
    let oracle = NullOracle::new();
    oracle.enqueue_document(Ok(document_response(Some("AUTO_PASS"), &[""])));
    let flow = flow(&oracle);

    flow.capture_document(NullCapture::kib(100)).unwrap();
    let outcome = flow.submit_document(&identity()).await.unwrap();

    match outcome {
        PolicyOutcome::MismatchBlocked(info) => {
            assert_eq!(info.fields(), [kyc_verification::document::UNNAMED_FIELD]);
        }
        other => panic!("expected mismatch block, got {other:?}"),
    }
    assert_eq!(flow.step(), Step::Document);
    assert!(flow.session().accepted_document().is_none());

    let err = flow.submit_face(&identity()).await.unwrap_err();
    assert!(matches!(
        err,
        SubmissionError::Session(SessionError::DocumentNotAccepted)
    ));
}

#[tokio::test]
async fn mismatch_resolved_by_retake() {
    let oracle = NullOracle::new();
    oracle.enqueue_document(Ok(document_response(Some("MANUAL_REVIEW"), &["Gender"])));
    oracle.enqueue_document(Ok(document_response(Some("MANUAL_REVIEW"), &[])));
    let flow = flow(&oracle);

    flow.capture_document(NullCapture::kib(100)).unwrap();
    flow.submit_document(&identity()).await.unwrap();
    assert!(flow.session().mismatch().is_some());

    flow.retake(Stage::Document).unwrap();
    assert!(flow.session().mismatch().is_none());
    flow.capture_document(NullCapture::kib(110)).unwrap();
    let outcome = flow.submit_document(&identity()).await.unwrap();

    assert_eq!(
        outcome,
        PolicyOutcome::DocumentAccepted {
            verdict: Verdict::ManualReview
        }
    );
    assert_eq!(flow.step(), Step::Face);
}

#[tokio::test]
async fn unknown_decision_uses_capture_quality() {
    let oracle = NullOracle::new();
    let mut poor = document_response(Some("PENDING"), &[]);
    poor.checks.blur_ok = Some(false);
    oracle.enqueue_document(Ok(poor));
    oracle.enqueue_document(Ok(document_response(None, &[])));
    let flow = flow(&oracle);

    flow.capture_document(NullCapture::kib(100)).unwrap();
    let outcome = flow.submit_document(&identity()).await.unwrap();
    assert_eq!(outcome, PolicyOutcome::DocumentRetryRequired);
    assert_eq!(flow.step(), Step::Document);

    flow.retake(Stage::Document).unwrap();
    flow.capture_document(NullCapture::kib(100)).unwrap();
    let outcome = flow.submit_document(&identity()).await.unwrap();
    assert!(matches!(outcome, PolicyOutcome::DocumentAccepted { .. }));
}

#[tokio::test]
async fn submit_without_capture_is_refused() {
    let oracle = NullOracle::new();
    let flow = flow(&oracle);
    let err = flow.submit_document(&identity()).await.unwrap_err();
    assert!(matches!(
        err,
        SubmissionError::Session(SessionError::MissingImage(Stage::Document))
    ));
    assert_eq!(oracle.request_count(), 0);
}

// ---------------------------------------------------------------------------
// 2. Face stage
// ---------------------------------------------------------------------------

#[tokio::test]
async fn auto_pass_face_completes_verified() {
    let oracle = NullOracle::new();
    let flow = flow_at_face(&oracle).await;
    oracle.enqueue_face(Ok(face_response(0.91, 0.85, Some("AUTO_PASS"), None)));

    flow.capture_selfie(NullCapture::kib(200)).unwrap();
    let outcome = flow.submit_face(&identity()).await.unwrap();

    assert_eq!(
        outcome,
        PolicyOutcome::Completed(VerificationOutcome::Verified)
    );
    assert_eq!(flow.step(), Step::Done);
    assert_eq!(
        flow.drain_events(),
        vec![
            FlowEvent::StepChanged {
                from: Step::Face,
                to: Step::Done
            },
            FlowEvent::Completed(VerificationOutcome::Verified),
        ]
    );
    assert_eq!(flow.finish(), Some(VerificationOutcome::Verified));
}

#[tokio::test]
async fn manual_review_face_is_terminal_success() {
    let oracle = NullOracle::new();
    let flow = flow_at_face(&oracle).await;
    oracle.enqueue_face(Ok(face_response(0.80, 0.85, Some("MANUAL_REVIEW"), None)));

    flow.capture_selfie(NullCapture::kib(200)).unwrap();
    let outcome = flow.submit_face(&identity()).await.unwrap();

    assert_eq!(
        outcome,
        PolicyOutcome::Completed(VerificationOutcome::FlaggedForReview)
    );
    assert_eq!(flow.step(), Step::Done);
    assert_eq!(flow.finish(), Some(VerificationOutcome::FlaggedForReview));
}

#[tokio::test]
async fn face_upload_carries_accepted_document() {
    let oracle = NullOracle::new();
    let flow = flow_at_face(&oracle).await;
    oracle.enqueue_face(Ok(face_response(0.91, 0.85, Some("AUTO_PASS"), None)));

    flow.capture_selfie(NullCapture::kib(200)).unwrap();
    flow.submit_face(&identity()).await.unwrap();

    let requests = oracle.requests();
    assert_eq!(
        requests.last(),
        Some(&kyc_nullables::RecordedRequest::Face {
            document_len: 100 * 1024,
            selfie_len: 200 * 1024,
            expected: identity(),
        })
    );
}

#[tokio::test]
async fn failed_face_allows_selfie_retake() {
    let oracle = NullOracle::new();
    let flow = flow_at_face(&oracle).await;
    oracle.enqueue_face(Ok(face_response(0.40, 0.85, Some("FAIL"), Some(0.9))));
    oracle.enqueue_face(Ok(face_response(0.93, 0.85, Some("AUTO_PASS"), Some(0.9))));

    flow.capture_selfie(NullCapture::kib(200)).unwrap();
    let outcome = flow.submit_face(&identity()).await.unwrap();
    assert_eq!(outcome, PolicyOutcome::FaceRetryRequired);
    assert_eq!(flow.step(), Step::Face);
    assert_eq!(
        flow.drain_events(),
        vec![FlowEvent::FaceRetryRequired {
            similarity: 0.40,
            threshold: 0.85
        }]
    );

    // A new selfie needs an explicit retake first.
    let err = flow.capture_selfie(NullCapture::kib(200)).unwrap_err();
    assert_eq!(
        err,
        CaptureError::Session(SessionError::RetakeRequired(Stage::Face))
    );

    flow.retake(Stage::Face).unwrap();
    assert_eq!(flow.step(), Step::Face);
    flow.capture_selfie(NullCapture::kib(210)).unwrap();
    let outcome = flow.submit_face(&identity()).await.unwrap();
    assert_eq!(
        outcome,
        PolicyOutcome::Completed(VerificationOutcome::Verified)
    );
}

#[tokio::test]
async fn heuristic_face_without_liveness_requires_retake() {
    let oracle = NullOracle::new();
    let flow = flow_at_face(&oracle).await;
    oracle.enqueue_face(Ok(face_response(0.99, 0.85, None, None)));

    flow.capture_selfie(NullCapture::kib(200)).unwrap();
    let outcome = flow.submit_face(&identity()).await.unwrap();
    assert_eq!(outcome, PolicyOutcome::FaceRetryRequired);
}

#[tokio::test]
async fn face_before_document_is_refused() {
    let oracle = NullOracle::new();
    let flow = flow(&oracle);

    let err = flow.submit_face(&identity()).await.unwrap_err();
    assert!(matches!(
        err,
        SubmissionError::Session(SessionError::DocumentNotAccepted)
    ));

    let err = flow.capture_selfie(NullCapture::kib(100)).unwrap_err();
    assert!(matches!(
        err,
        CaptureError::Session(SessionError::WrongStep { .. })
    ));
    assert_eq!(oracle.request_count(), 0);
}

#[tokio::test]
async fn face_after_mismatch_is_refused() {
    let oracle = NullOracle::new();
    oracle.enqueue_document(Ok(document_response(Some("AUTO_PASS"), &["ID Number"])));
    let flow = flow(&oracle);
    flow.capture_document(NullCapture::kib(100)).unwrap();
    flow.submit_document(&identity()).await.unwrap();

    let err = flow.submit_face(&identity()).await.unwrap_err();
    assert!(matches!(
        err,
        SubmissionError::Session(SessionError::DocumentNotAccepted)
    ));
    assert_eq!(oracle.request_count(), 1);
}

#[tokio::test]
async fn document_retake_from_face_clears_selfie() {
    let oracle = NullOracle::new();
    let flow = flow_at_face(&oracle).await;
    oracle.enqueue_face(Ok(face_response(0.5, 0.85, Some("FAIL"), None)));
    flow.capture_selfie(NullCapture::kib(200)).unwrap();
    flow.submit_face(&identity()).await.unwrap();
    flow.drain_events();

    flow.retake(Stage::Document).unwrap();

    let session = flow.session();
    assert_eq!(session.step(), Step::Document);
    assert!(session.document_image().is_none());
    assert!(session.selfie_image().is_none());
    assert!(session.face_result().is_none());
    assert_eq!(
        flow.drain_events(),
        vec![FlowEvent::StepChanged {
            from: Step::Face,
            to: Step::Document
        }]
    );
}

// ---------------------------------------------------------------------------
// 3. Quality gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn small_capture_never_reaches_oracle() {
    let oracle = NullOracle::new();
    let flow = flow(&oracle);

    let err = flow.capture_document(NullCapture::kib(50)).unwrap_err();
    assert_eq!(
        err,
        CaptureError::Validation(ValidationError::ImageTooSmall {
            len: 50 * 1024,
            min: 60 * 1024
        })
    );
    assert!(flow.session().document_image().is_none());
    assert!(flow.submit_document(&identity()).await.is_err());
    assert_eq!(oracle.request_count(), 0);
}

#[tokio::test]
async fn large_capture_never_reaches_oracle() {
    let oracle = NullOracle::new();
    let flow = flow(&oracle);

    let err = flow.capture_document(NullCapture::mib(9)).unwrap_err();
    assert!(matches!(
        err,
        CaptureError::Validation(ValidationError::ImageTooLarge { .. })
    ));
    assert_eq!(oracle.request_count(), 0);
}

// ---------------------------------------------------------------------------
// 4. Remote failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn oracle_413_is_image_too_large() {
    let oracle = NullOracle::new();
    oracle.enqueue_document(Err(OracleError::PayloadTooLarge));
    oracle.enqueue_document(Ok(document_response(Some("AUTO_PASS"), &[])));
    let flow = flow(&oracle);
    flow.capture_document(NullCapture::kib(100)).unwrap();

    let err = flow.submit_document(&identity()).await.unwrap_err();
    assert!(err.is_image_too_large());
    assert_eq!(flow.step(), Step::Document);
    assert!(flow.session().document_result().is_none());

    // Nothing was recorded, so the same capture may be submitted again.
    let outcome = flow.submit_document(&identity()).await.unwrap();
    assert!(matches!(outcome, PolicyOutcome::DocumentAccepted { .. }));
}

#[tokio::test]
async fn oracle_413_on_face_reports_both_images() {
    let oracle = NullOracle::new();
    let flow = flow_at_face(&oracle).await;
    oracle.enqueue_face(Err(OracleError::PayloadTooLarge));
    oracle.enqueue_face(Ok(face_response(0.91, 0.85, Some("AUTO_PASS"), None)));
    flow.capture_selfie(NullCapture::kib(200)).unwrap();

    let err = flow.submit_face(&identity()).await.unwrap_err();
    assert!(err.is_image_too_large());
    assert_eq!(err.status(), Some(413));
    assert!(matches!(
        err,
        SubmissionError::Validation(ValidationError::ImageTooLarge {
            len,
            max: None,
        }) if len == 300 * 1024
    ));
    assert_eq!(flow.step(), Step::Face);
    assert!(flow.session().face_result().is_none());
    assert!(!flow.is_validating());

    // Nothing was recorded, so the same selfie may be submitted again.
    let outcome = flow.submit_face(&identity()).await.unwrap();
    assert_eq!(
        outcome,
        PolicyOutcome::Completed(VerificationOutcome::Verified)
    );
}

#[tokio::test]
async fn server_error_is_surfaced_once() {
    let oracle = NullOracle::new();
    oracle.enqueue_document(Err(OracleError::Server {
        status: 500,
        message: Some("ocr engine down".into()),
    }));
    let flow = flow(&oracle);
    flow.capture_document(NullCapture::kib(100)).unwrap();

    let err = flow.submit_document(&identity()).await.unwrap_err();
    match err {
        SubmissionError::ServerError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message.as_deref(), Some("ocr engine down"));
        }
        other => panic!("expected server error, got {other:?}"),
    }
    assert_eq!(oracle.request_count(), 1);
    assert!(!flow.is_uploading());
}

#[tokio::test]
async fn transport_failure_on_face() {
    let oracle = NullOracle::new();
    let flow = flow_at_face(&oracle).await;
    oracle.enqueue_face(Err(OracleError::Transport("request timed out".into())));
    flow.capture_selfie(NullCapture::kib(200)).unwrap();

    let err = flow.submit_face(&identity()).await.unwrap_err();
    assert!(matches!(err, SubmissionError::TransportFailure(_)));
    assert_eq!(flow.step(), Step::Face);
    assert!(!flow.is_validating());
}

// ---------------------------------------------------------------------------
// 5. Concurrency and lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concurrent_submission_is_rejected() {
    let oracle = NullOracle::held();
    oracle.enqueue_document(Ok(document_response(Some("AUTO_PASS"), &[])));
    let flow = flow(&oracle);
    flow.capture_document(NullCapture::kib(100)).unwrap();
    let identity = identity();

    let (first, (second, face, retake)) = tokio::join!(flow.submit_document(&identity), async {
        while !flow.is_uploading() {
            tokio::task::yield_now().await;
        }
        let second = flow.submit_document(&identity).await;
        let face = flow.submit_face(&identity).await;
        let retake = flow.retake(Stage::Document);
        oracle.release();
        (second, face, retake)
    });

    assert!(matches!(
        second,
        Err(SubmissionError::InProgress(Stage::Document))
    ));
    assert!(matches!(
        face,
        Err(SubmissionError::InProgress(Stage::Document))
    ));
    assert_eq!(retake, Err(SessionError::Busy(Stage::Document)));
    assert!(matches!(first, Ok(PolicyOutcome::DocumentAccepted { .. })));
    assert_eq!(oracle.request_count(), 1);
    assert!(!flow.is_uploading());
}

#[tokio::test]
async fn completed_flow_rejects_further_use() {
    let oracle = NullOracle::new();
    let flow = flow_at_face(&oracle).await;
    oracle.enqueue_face(Ok(face_response(0.91, 0.85, Some("AUTO_PASS"), None)));
    flow.capture_selfie(NullCapture::kib(200)).unwrap();
    flow.submit_face(&identity()).await.unwrap();

    assert_eq!(flow.retake(Stage::Face), Err(SessionError::Closed));
    assert_eq!(flow.reset(), Err(SessionError::Closed));
    assert!(matches!(
        flow.submit_face(&identity()).await,
        Err(SubmissionError::Session(SessionError::Closed))
    ));
    assert_eq!(flow.step(), Step::Done);
}

#[tokio::test]
async fn reset_starts_over() {
    let oracle = NullOracle::new();
    let flow = flow_at_face(&oracle).await;
    flow.reset().unwrap();
    assert_eq!(flow.step(), Step::Document);
    assert!(flow.session().document_result().is_none());
    assert_eq!(flow.finish(), None);
}
