//! Nullable capture provider producing images of an exact byte size.

use kyc_types::CapturedImage;

/// Produces synthetic JPEG captures.
pub struct NullCapture;

impl NullCapture {
    /// A JPEG capture of exactly `len` bytes.
    pub fn image(len: usize) -> CapturedImage {
        let mut bytes = vec![0u8; len];
        // SOI marker, so the buffer at least looks like a JPEG.
        if len >= 2 {
            bytes[0] = 0xFF;
            bytes[1] = 0xD8;
        }
        CapturedImage::jpeg(bytes)
    }

    /// A JPEG capture of `kib` kibibytes.
    pub fn kib(kib: usize) -> CapturedImage {
        Self::image(kib * 1024)
    }

    /// A JPEG capture of `mib` mebibytes.
    pub fn mib(mib: usize) -> CapturedImage {
        Self::image(mib * 1024 * 1024)
    }
}
