//! Nullable oracle with scripted responses and recorded requests.

use kyc_oracle::{DocumentResponse, FaceResponse, IdentityOracle, OracleError};
use kyc_types::{CapturedImage, ExpectedIdentity};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Semaphore;

/// A request the oracle received.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedRequest {
    Document {
        document_len: usize,
        expected: ExpectedIdentity,
    },
    Face {
        document_len: usize,
        selfie_len: usize,
        expected: ExpectedIdentity,
    },
}

/// A test oracle that replays scripted responses instead of calling out.
///
/// Clones share state, so a test can keep one handle for scripting and
/// assertions while the flow under test owns another.
#[derive(Clone, Default)]
pub struct NullOracle {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    documents: Mutex<VecDeque<Result<DocumentResponse, OracleError>>>,
    faces: Mutex<VecDeque<Result<FaceResponse, OracleError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    /// When set, each call waits for one permit before answering.
    hold: Option<Semaphore>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl NullOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// An oracle whose calls block until [`release`](Self::release) is called.
    pub fn held() -> Self {
        Self {
            inner: Arc::new(Inner {
                hold: Some(Semaphore::new(0)),
                ..Inner::default()
            }),
        }
    }

    /// Let one held call answer.
    pub fn release(&self) {
        if let Some(gate) = &self.inner.hold {
            gate.add_permits(1);
        }
    }

    /// Queue the next document response.
    pub fn enqueue_document(&self, response: Result<DocumentResponse, OracleError>) {
        lock(&self.inner.documents).push_back(response);
    }

    /// Queue the next face response.
    pub fn enqueue_face(&self, response: Result<FaceResponse, OracleError>) {
        lock(&self.inner.faces).push_back(response);
    }

    /// All requests received so far (for assertions).
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.inner.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.inner.requests).len()
    }

    /// Clear all state.
    pub fn reset(&self) {
        lock(&self.inner.documents).clear();
        lock(&self.inner.faces).clear();
        lock(&self.inner.requests).clear();
    }

    async fn wait_for_release(&self) {
        if let Some(gate) = &self.inner.hold {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
    }
}

impl IdentityOracle for NullOracle {
    async fn verify_document(
        &self,
        document: &CapturedImage,
        expected: &ExpectedIdentity,
    ) -> Result<DocumentResponse, OracleError> {
        lock(&self.inner.requests).push(RecordedRequest::Document {
            document_len: document.len(),
            expected: expected.clone(),
        });
        self.wait_for_release().await;
        lock(&self.inner.documents)
            .pop_front()
            .unwrap_or_else(|| Err(OracleError::Transport("no scripted document response".into())))
    }

    async fn verify_face(
        &self,
        document: &CapturedImage,
        selfie: &CapturedImage,
        expected: &ExpectedIdentity,
    ) -> Result<FaceResponse, OracleError> {
        lock(&self.inner.requests).push(RecordedRequest::Face {
            document_len: document.len(),
            selfie_len: selfie.len(),
            expected: expected.clone(),
        });
        self.wait_for_release().await;
        lock(&self.inner.faces)
            .pop_front()
            .unwrap_or_else(|| Err(OracleError::Transport("no scripted face response".into())))
    }

    fn name(&self) -> &str {
        "null"
    }
}
