use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    /// HTTP 413 from the oracle.
    #[error("image rejected by the oracle as too large")]
    PayloadTooLarge,

    #[error("oracle unreachable: {0}")]
    Transport(String),

    #[error(
        "oracle returned HTTP {status}: {}",
        .message.as_deref().unwrap_or("no message")
    )]
    Server { status: u16, message: Option<String> },

    #[error("unexpected response from oracle: {0}")]
    UnexpectedResponse(String),

    #[error("invalid oracle configuration: {0}")]
    Config(String),
}

impl OracleError {
    /// The HTTP status behind this error, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::PayloadTooLarge => Some(413),
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_renders_message() {
        let err = OracleError::Server {
            status: 422,
            message: Some("document expired".into()),
        };
        assert_eq!(err.to_string(), "oracle returned HTTP 422: document expired");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn server_error_without_message() {
        let err = OracleError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "oracle returned HTTP 500: no message");
        assert_eq!(OracleError::PayloadTooLarge.status(), Some(413));
        assert_eq!(OracleError::Transport("down".into()).status(), None);
    }
}
