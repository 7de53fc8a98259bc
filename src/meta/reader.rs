use std::collections::HashMap;
use std::io::Cursor;

use img_parts::Bytes;
use img_parts::png::Png;
use nom_exif::{Exif, ExifIter, ExifTag, MediaParser, MediaSource};

use crate::error::{Error, Result};
use crate::format::ImageFormat;
use crate::post::Post;

use super::{
    CHUNK_TEXT, KEY_AUTHOR, KEY_BOARD, KEY_ID, KEY_RATING, KEY_SOURCE, KEY_TAGS, split_text_entry,
};

/// Extract the embedded post record from container bytes, dispatching on
/// the detected format.
pub(crate) fn read_post(format: ImageFormat, bytes: &[u8]) -> Result<Post> {
    match format {
        ImageFormat::Png => read_png(bytes),
        ImageFormat::Jpeg => read_jpeg(bytes),
        ImageFormat::Unsupported => Err(Error::UnsupportedFormat),
    }
}

/// Look up the six reserved keywords among a PNG's `tEXt` entries.
///
/// `board` and `id` are mandatory; the other fields default to the empty
/// string when their entry is absent. A keyword that somehow appears twice
/// resolves to its last occurrence, matching the replace semantics of the
/// writer.
fn read_png(bytes: &[u8]) -> Result<Post> {
    let png = Png::from_bytes(Bytes::copy_from_slice(bytes))?;

    let mut entries: HashMap<String, String> = HashMap::new();
    for chunk in png.chunks() {
        if chunk.kind() != CHUNK_TEXT {
            continue;
        }
        let (keyword, text) = split_text_entry(chunk.contents());
        entries.insert(keyword, text);
    }

    let lookup = |key: &str| entries.get(key).cloned().unwrap_or_default();

    let board = lookup(KEY_BOARD);
    let id = lookup(KEY_ID);
    if board.trim().is_empty() || id.trim().is_empty() {
        return Err(Error::MissingMetadata(
            "no board/id text entries in image".into(),
        ));
    }

    Ok(Post {
        board,
        id,
        author: lookup(KEY_AUTHOR),
        source: lookup(KEY_SOURCE),
        rating: lookup(KEY_RATING),
        tags: lookup(KEY_TAGS),
    })
}

/// Deserialize the post record from a JPEG's EXIF `UserComment` field.
///
/// Unlike the PNG side there is no per-field defaulting: the JSON blob is
/// self-describing and must decode into all six fields.
fn read_jpeg(bytes: &[u8]) -> Result<Post> {
    let mut parser = MediaParser::new();
    let ms = MediaSource::seekable(Cursor::new(bytes.to_vec()))
        .map_err(|e| Error::Container(e.to_string()))?;

    let iter: ExifIter = parser
        .parse(ms)
        .map_err(|_| Error::MissingMetadata("no EXIF directory in image".into()))?;
    let exif: Exif = iter.into();

    let entry = exif
        .get(ExifTag::UserComment)
        .ok_or_else(|| Error::MissingMetadata("no user comment field in EXIF".into()))?;

    let text = comment_text(&entry.to_string());
    Ok(serde_json::from_str(&text)?)
}

/// Strip what the EXIF rendering may leave around the comment payload:
/// surrounding quotes, a leftover character-code prefix, stray NULs.
fn comment_text(raw: &str) -> String {
    let s = raw.trim().trim_matches('"');
    let s = s.strip_prefix("ASCII").unwrap_or(s);
    let s = s.strip_prefix("UNICODE").unwrap_or(s);
    s.trim_matches('\0').trim().to_string()
}
