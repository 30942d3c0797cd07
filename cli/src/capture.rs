//! Loading captures from disk.

use anyhow::Context;
use kyc_types::CapturedImage;
use std::path::Path;

/// MIME type for an image path, from its extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

/// Read an image file into a capture.
pub fn read_image(path: &Path) -> anyhow::Result<CapturedImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read image {}", path.display()))?;
    Ok(CapturedImage::new(bytes, mime_for(path)))
}
