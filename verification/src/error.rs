use kyc_oracle::OracleError;
use kyc_types::{Stage, Step};
use thiserror::Error;

/// Local validation failures. Raised before any network call, or mapped from
/// an oracle 413.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("image too small: {len} bytes, minimum {min}")]
    ImageTooSmall { len: usize, min: usize },

    /// `max` is `None` when the oracle rejected the upload and its limit is unknown.
    #[error(
        "image too large: {len} bytes{}",
        .max.map(|m| format!(", maximum {m}")).unwrap_or_default()
    )]
    ImageTooLarge { len: usize, max: Option<usize> },
}

impl ValidationError {
    /// Capture guidance to show the user.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::ImageTooSmall { .. } => {
                "The photo is too low quality. Retake it a little closer, in good light."
            }
            Self::ImageTooLarge { .. } => {
                "The photo is too large. Retake it a little farther away."
            }
        }
    }
}

/// Invalid session transitions.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session is at step {actual}, expected {expected}")]
    WrongStep { expected: Step, actual: Step },

    #[error("no {0} image captured")]
    MissingImage(Stage),

    #[error("{0} already evaluated; retake before capturing or submitting again")]
    RetakeRequired(Stage),

    #[error("document has not been accepted")]
    DocumentNotAccepted,

    #[error("a {0} submission is in flight")]
    Busy(Stage),

    #[error("verification session is complete")]
    Closed,
}

/// Failures while capturing an image into the session.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Failures of a stage submission.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("transport failure: {0}")]
    TransportFailure(String),

    #[error(
        "oracle error (HTTP {status}): {}",
        .message.as_deref().unwrap_or("no message")
    )]
    ServerError { status: u16, message: Option<String> },

    #[error("unexpected response shape: {0}")]
    UnexpectedResponseShape(String),

    #[error("a {0} submission is already in flight")]
    InProgress(Stage),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl SubmissionError {
    /// Map an oracle failure for an upload of `len` bytes.
    pub fn from_oracle(err: OracleError, len: usize) -> Self {
        match err {
            OracleError::PayloadTooLarge => {
                Self::Validation(ValidationError::ImageTooLarge { len, max: None })
            }
            OracleError::Transport(msg) | OracleError::Config(msg) => Self::TransportFailure(msg),
            OracleError::Server { status, message } => Self::ServerError { status, message },
            OracleError::UnexpectedResponse(msg) => Self::UnexpectedResponseShape(msg),
        }
    }

    /// Whether the image itself was the problem (local gate or oracle 413).
    pub fn is_image_too_large(&self) -> bool {
        matches!(
            self,
            Self::Validation(ValidationError::ImageTooLarge { .. })
        )
    }

    /// HTTP status behind a server error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerError { status, .. } => Some(*status),
            Self::Validation(ValidationError::ImageTooLarge { max: None, .. }) => Some(413),
            _ => None,
        }
    }
}
