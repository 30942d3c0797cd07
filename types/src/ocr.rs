//! Document-stage results: extracted fields, quality flags, and mismatches.

use serde::{Deserialize, Serialize};

/// Identity fields the oracle extracted from the document image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub id_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    /// OCR engine confidence [0.0, 1.0].
    pub ocr_confidence: Option<f64>,
}

impl ExtractedFields {
    /// The best available display name: `full_name`, else `first last`.
    pub fn display_name(&self) -> Option<String> {
        if let Some(full) = self.full_name.as_deref().filter(|s| !s.trim().is_empty()) {
            return Some(full.to_string());
        }
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// OCR output for a document capture.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    pub fields: ExtractedFields,
    /// All four document corners were visible.
    pub corners_ok: bool,
    /// The capture was sharp enough to read.
    pub blur_ok: bool,
    /// No glare obscured the printed fields.
    pub glare_ok: bool,
    /// The extracted ID number has a valid format.
    pub id_format_valid: bool,
    /// OCR confidence cleared the oracle's bar.
    pub ocr_confidence_ok: bool,
}

impl OcrResult {
    /// `true` when every capture-quality flag holds.
    pub fn is_quality_ok(&self) -> bool {
        self.corners_ok && self.blur_ok && self.glare_ok
    }
}

/// Field names that disagree between the document and the expected identity.
///
/// Order is preserved exactly as the oracle reported it, since callers
/// display the list verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchInfo {
    fields: Vec<String>,
}

impl MismatchInfo {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}
