//! Embedding and extraction of post records in image metadata.
//!
//! This module provides the two entry points:
//!
//! - [`write_post_to_image`] — embed a [`Post`] into a PNG or JPEG, leaving
//!   the pixel data and all unrelated metadata untouched
//! - [`read_post_from_image`] — read the embedded record back, with strict
//!   validation of the mandatory fields
//!
//! PNG stores one `tEXt` entry per field under the reserved `shinobooru-*`
//! keywords. JPEG stores the whole record as a JSON blob in the EXIF
//! `UserComment` field; only the APP1 segment of the file is rewritten.

mod reader;
mod writer;

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::format::ImageFormat;
use crate::post::Post;

pub(crate) const KEY_BOARD: &str = "shinobooru-board";
pub(crate) const KEY_ID: &str = "shinobooru-id";
pub(crate) const KEY_AUTHOR: &str = "shinobooru-author";
pub(crate) const KEY_SOURCE: &str = "shinobooru-source";
pub(crate) const KEY_RATING: &str = "shinobooru-rating";
pub(crate) const KEY_TAGS: &str = "shinobooru-tags";

/// The text-chunk keywords this crate owns, in write order.
pub(crate) const RESERVED_KEYS: [&str; 6] = [
    KEY_BOARD, KEY_ID, KEY_AUTHOR, KEY_SOURCE, KEY_RATING, KEY_TAGS,
];

pub(crate) const CHUNK_TEXT: [u8; 4] = *b"tEXt";
pub(crate) const CHUNK_IEND: [u8; 4] = *b"IEND";

/// Split a `tEXt` chunk into its keyword and text, which are separated by
/// the first NUL byte. A chunk with no separator yields an empty text.
pub(crate) fn split_text_entry(contents: &[u8]) -> (String, String) {
    match contents.iter().position(|&b| b == 0) {
        Some(nul) => (
            String::from_utf8_lossy(&contents[..nul]).into_owned(),
            String::from_utf8_lossy(&contents[nul + 1..]).into_owned(),
        ),
        None => (String::from_utf8_lossy(contents).into_owned(), String::new()),
    }
}

/// Embed `post` into the image at `source`, writing the result to
/// `destination`.
///
/// The container is detected from the file signature. A write replaces all
/// six reserved fields as a unit and preserves every metadata entry the
/// crate does not own; the pixel data is copied through without re-encoding.
///
/// When `destination` equals `source` the new bytes go to a temporary file
/// in the same directory first and are moved into place with an atomic
/// rename, so no reader ever observes a partially written file and the
/// source stays intact until the replace succeeds. Writing to a distinct
/// `destination` is a plain write; on failure the source is untouched but
/// the destination may be partial.
pub fn write_post_to_image(post: &Post, source: &Path, destination: &Path) -> Result<()> {
    if !post.has_identity() {
        return Err(Error::MissingMetadata(
            "post board and id must be non-blank".into(),
        ));
    }

    let format = ImageFormat::detect(source)?;
    if format == ImageFormat::Unsupported {
        return Err(Error::UnsupportedFormat);
    }

    let source_bytes = fs::read(source)?;
    let output = writer::write_post(post, format, &source_bytes)?;

    if source == destination {
        let dir = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&output)?;
        tmp.persist(destination).map_err(|e| Error::Io(e.error))?;
        log::debug!("replaced {} atomically", destination.display());
    } else {
        fs::write(destination, &output)?;
    }

    Ok(())
}

/// Read the embedded post record from the image at `path`.
///
/// Fails with [`Error::UnsupportedFormat`] for files matching neither
/// container, [`Error::MissingMetadata`] when the reserved fields are
/// absent (for PNG: when `board` or `id` is absent or blank), and
/// [`Error::MalformedMetadata`] when the JPEG record is present but does
/// not decode into all six fields.
pub fn read_post_from_image(path: &Path) -> Result<Post> {
    let format = ImageFormat::detect(path)?;
    if format == ImageFormat::Unsupported {
        return Err(Error::UnsupportedFormat);
    }

    let bytes = fs::read(path)?;
    reader::read_post(format, &bytes)
}
