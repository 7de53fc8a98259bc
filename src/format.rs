use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// The container format of an image file, detected from its magic bytes.
///
/// Detection never trusts the file extension. Anything that is neither PNG
/// nor JPEG classifies as [`ImageFormat::Unsupported`]; callers must check
/// for that variant before dispatching to a codec.
///
/// # Example
///
/// ```rust
/// use shinobooru_meta::ImageFormat;
///
/// let header = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
/// assert_eq!(ImageFormat::from_bytes(&header), ImageFormat::Png);
/// assert_eq!(ImageFormat::from_bytes(b"GIF89a"), ImageFormat::Unsupported);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Unsupported,
}

impl ImageFormat {
    /// Detect the format of the file at `path` by reading its signature
    /// header. No more than the first 8 bytes are read.
    pub fn detect(path: &Path) -> Result<Self> {
        let mut header = Vec::with_capacity(PNG_SIGNATURE.len());
        File::open(path)?
            .take(PNG_SIGNATURE.len() as u64)
            .read_to_end(&mut header)?;
        Ok(Self::from_bytes(&header))
    }

    /// Classify raw bytes by their signature. Short or unknown byte patterns
    /// yield [`ImageFormat::Unsupported`] rather than an error.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.starts_with(&PNG_SIGNATURE) {
            Self::Png
        } else if bytes.starts_with(&JPEG_SOI) {
            Self::Jpeg
        } else {
            Self::Unsupported
        }
    }
}
