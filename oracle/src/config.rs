//! Oracle endpoint configuration.

use serde::{Deserialize, Serialize};

/// Where and how to reach the oracle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Base URL, e.g. `https://kyc.example.com`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the document verification endpoint.
    #[serde(default = "default_document_path")]
    pub document_path: String,

    /// Path of the face verification endpoint.
    #[serde(default = "default_face_path")]
    pub face_path: String,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Bearer token identifying the caller; the oracle uses it to look up
    /// the account being verified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_document_path() -> String {
    "/kyc/verify-id".to_string()
}

fn default_face_path() -> String {
    "/kyc/verify-face".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

// ── Impl ───────────────────────────────────────────────────────────────

impl OracleConfig {
    /// Config pointing at `base_url` with default paths and timeouts.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn document_url(&self) -> String {
        join_url(&self.base_url, &self.document_path)
    }

    pub fn face_url(&self) -> String {
        join_url(&self.base_url, &self.face_path)
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            document_path: default_document_path(),
            face_path: default_face_path(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            auth_token: None,
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
