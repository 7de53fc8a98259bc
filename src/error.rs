use thiserror::Error;

/// Failure kinds surfaced by the codecs and the read/write entry points.
///
/// The codecs report the specific kind; the entry points add only
/// [`Error::UnsupportedFormat`] for files matching neither container and
/// never reclassify a codec failure.
#[derive(Debug, Error)]
pub enum Error {
    /// The file signature matches neither PNG nor JPEG.
    #[error("unsupported image format")]
    UnsupportedFormat,

    /// A mandatory post field is absent on read, or blank on write.
    #[error("image does not contain post metadata: {0}")]
    MissingMetadata(String),

    /// The reserved metadata field is present but cannot be parsed.
    #[error("post metadata is malformed: {0}")]
    MalformedMetadata(String),

    /// The container framing itself could not be parsed. A truncated PNG or
    /// JPEG lands here, not under [`Error::UnsupportedFormat`], since its
    /// signature already matched.
    #[error("invalid image container: {0}")]
    Container(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<img_parts::Error> for Error {
    fn from(e: img_parts::Error) -> Self {
        Error::Container(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::MalformedMetadata(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
