//! Quality gate: local pre-submission size check.
//!
//! Pure and synchronous: a rejected image never reaches the oracle.

use crate::config::GateConfig;
use crate::error::ValidationError;
use kyc_types::CapturedImage;
use std::ops::Deref;

/// An image that passed the gate.
///
/// Only [`QualityGate::admit`] constructs this, so every image stored in a
/// session or uploaded by a stage has been size-checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Admitted(CapturedImage);

impl Admitted {
    pub fn image(&self) -> &CapturedImage {
        &self.0
    }
}

impl Deref for Admitted {
    type Target = CapturedImage;

    fn deref(&self) -> &CapturedImage {
        &self.0
    }
}

/// Byte-length bounds check on captured images.
#[derive(Clone, Debug)]
pub struct QualityGate {
    min_bytes: usize,
    max_bytes: usize,
}

impl QualityGate {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            min_bytes: config.min_bytes,
            max_bytes: config.max_bytes,
        }
    }

    pub fn min_bytes(&self) -> usize {
        self.min_bytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Admit `image` if its length is within `[min_bytes, max_bytes]`.
    pub fn admit(&self, image: CapturedImage) -> Result<Admitted, ValidationError> {
        let len = image.len();
        if len < self.min_bytes {
            tracing::debug!(bytes = len, min = self.min_bytes, "image below minimum size");
            return Err(ValidationError::ImageTooSmall {
                len,
                min: self.min_bytes,
            });
        }
        if len > self.max_bytes {
            tracing::debug!(bytes = len, max = self.max_bytes, "image above maximum size");
            return Err(ValidationError::ImageTooLarge {
                len,
                max: Some(self.max_bytes),
            });
        }
        Ok(Admitted(image))
    }
}

impl Default for QualityGate {
    fn default() -> Self {
        Self::new(&GateConfig::default())
    }
}
