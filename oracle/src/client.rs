//! HTTP client for the oracle's multipart upload endpoints.

use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::response::{DocumentResponse, FaceResponse};
use crate::IdentityOracle;

use kyc_types::{CapturedImage, ExpectedIdentity};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Multipart field carrying the document front.
pub const DOCUMENT_FIELD: &str = "documentFront";

/// Multipart field carrying the selfie-with-document.
pub const SELFIE_FIELD: &str = "selfieWithDocument";

/// Longest raw body echoed back as a server message.
const MAX_RAW_MESSAGE_LEN: usize = 200;

/// Client for the oracle's two upload endpoints.
///
/// Sends `POST {document_url}` with one image part and `POST {face_url}` with
/// two, each carrying the expected identity as text parts.
pub struct HttpOracle {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    document_url: String,
    face_url: String,
    auth_token: Option<String>,
}

impl HttpOracle {
    /// Create a client for `base_url` with default paths and timeouts.
    pub fn new(base_url: &str) -> Result<Self, OracleError> {
        Self::from_config(&OracleConfig::with_base_url(base_url))
    }

    pub fn from_config(config: &OracleConfig) -> Result<Self, OracleError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| OracleError::Config(e.to_string()))?;
        Ok(Self {
            http_client,
            document_url: config.document_url(),
            face_url: config.face_url(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// POST a multipart form and decode a successful JSON body.
    async fn post_form<T: DeserializeOwned>(
        &self,
        url: &str,
        form: Form,
    ) -> Result<T, OracleError> {
        let mut request = self.http_client.post(url).multipart(form);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(classify_transport)?;
        let status = response.status();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            return Err(OracleError::PayloadTooLarge);
        }

        let body = response.text().await.map_err(classify_transport)?;
        if !status.is_success() {
            return Err(OracleError::Server {
                status: status.as_u16(),
                message: server_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            OracleError::UnexpectedResponse(format!("failed to parse response from {url}: {e}"))
        })
    }
}

impl IdentityOracle for HttpOracle {
    async fn verify_document(
        &self,
        document: &CapturedImage,
        expected: &ExpectedIdentity,
    ) -> Result<DocumentResponse, OracleError> {
        let form = identity_form(expected).part(DOCUMENT_FIELD, image_part(document, "document"));
        tracing::debug!(url = %self.document_url, bytes = document.len(), "uploading document");
        self.post_form(&self.document_url, form).await
    }

    async fn verify_face(
        &self,
        document: &CapturedImage,
        selfie: &CapturedImage,
        expected: &ExpectedIdentity,
    ) -> Result<FaceResponse, OracleError> {
        let form = identity_form(expected)
            .part(DOCUMENT_FIELD, image_part(document, "document"))
            .part(SELFIE_FIELD, image_part(selfie, "selfie"));
        tracing::debug!(
            url = %self.face_url,
            document_bytes = document.len(),
            selfie_bytes = selfie.len(),
            "uploading face match"
        );
        self.post_form(&self.face_url, form).await
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn identity_form(expected: &ExpectedIdentity) -> Form {
    Form::new()
        .text("fullName", expected.full_name.clone())
        .text("dateOfBirth", expected.date_of_birth.clone())
        .text("idNumber", expected.id_number.clone())
        .text("gender", expected.gender.clone())
}

fn image_part(image: &CapturedImage, stem: &str) -> Part {
    let file_name = format!("{stem}.{}", image.extension());
    let part = Part::bytes(image.bytes().to_vec()).file_name(file_name.clone());
    match part.mime_str(image.mime_type()) {
        Ok(part) => part,
        Err(_) => {
            tracing::debug!(
                mime = image.mime_type(),
                "unparseable MIME type, sending untyped part"
            );
            Part::bytes(image.bytes().to_vec()).file_name(file_name)
        }
    }
}

fn classify_transport(e: reqwest::Error) -> OracleError {
    if e.is_timeout() {
        OracleError::Transport(format!("request timed out: {e}"))
    } else if e.is_connect() {
        OracleError::Transport(format!("connection failed: {e}"))
    } else if e.is_decode() || e.is_body() {
        OracleError::UnexpectedResponse(e.to_string())
    } else {
        OracleError::Transport(e.to_string())
    }
}

/// Pull a human-readable message out of an error body.
///
/// Looks for `message`, `detail` or `error` in a JSON object; falls back to
/// the raw body when it is short plain text.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(trimmed) {
        for key in ["message", "detail", "error"] {
            match map.get(key) {
                Some(serde_json::Value::String(s)) if !s.is_empty() => return Some(s.clone()),
                Some(serde_json::Value::Null) | Some(serde_json::Value::String(_)) | None => {}
                Some(other) => return Some(other.to_string()),
            }
        }
        return None;
    }

    if trimmed.len() <= MAX_RAW_MESSAGE_LEN && !trimmed.starts_with('<') {
        Some(trimmed.to_string())
    } else {
        None
    }
}
