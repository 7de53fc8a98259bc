use img_parts::jpeg::Jpeg;
use img_parts::png::{Png, PngChunk};
use img_parts::{Bytes, ImageEXIF};
use little_exif::exif_tag::ExifTag;
use little_exif::filetype::FileExtension;
use little_exif::metadata::Metadata;

use crate::error::{Error, Result};
use crate::format::ImageFormat;
use crate::post::Post;

use super::{
    CHUNK_IEND, CHUNK_TEXT, KEY_AUTHOR, KEY_BOARD, KEY_ID, KEY_RATING, KEY_SOURCE, KEY_TAGS,
    RESERVED_KEYS, split_text_entry,
};

// little_exif as_u8_vec(JPEG) returns: [APP1 marker 2B][length 2B][Exif\0\0 6B][TIFF data]
// img-parts set_exif() expects just the TIFF data (after Exif\0\0)
const JPEG_EXIF_OVERHEAD: usize = 10; // 2 + 2 + 6

/// Transform `source` container bytes so they carry `post`, dispatching on
/// the detected format.
pub(crate) fn write_post(post: &Post, format: ImageFormat, source: &[u8]) -> Result<Vec<u8>> {
    match format {
        ImageFormat::Png => write_png(post, source),
        ImageFormat::Jpeg => write_jpeg(post, source),
        ImageFormat::Unsupported => Err(Error::UnsupportedFormat),
    }
}

/// Write the six reserved `tEXt` entries into a PNG.
///
/// Chunk-level passthrough: every chunk except reserved-keyword `tEXt`
/// entries is copied through verbatim, so IDAT stays bit-identical. A
/// reserved keyword that already exists is replaced, never duplicated.
fn write_png(post: &Post, source: &[u8]) -> Result<Vec<u8>> {
    let mut png = Png::from_bytes(Bytes::copy_from_slice(source))?;

    let chunks = png.chunks_mut();
    let before = chunks.len();
    chunks.retain(|chunk| {
        if chunk.kind() != CHUNK_TEXT {
            return true;
        }
        let (keyword, _) = split_text_entry(chunk.contents());
        !RESERVED_KEYS.contains(&keyword.as_str())
    });
    if before != chunks.len() {
        log::debug!("replacing {} reserved text entries", before - chunks.len());
    }

    let entries = [
        (KEY_BOARD, post.board.as_str()),
        (KEY_ID, post.id.as_str()),
        (KEY_AUTHOR, post.author.as_str()),
        (KEY_SOURCE, post.source.as_str()),
        (KEY_RATING, post.rating.as_str()),
        (KEY_TAGS, post.tags.as_str()),
    ];

    // Text entries go after the image data, right before IEND.
    let insert_at = chunks
        .iter()
        .position(|c| c.kind() == CHUNK_IEND)
        .unwrap_or(chunks.len());
    for (offset, (keyword, text)) in entries.iter().enumerate() {
        chunks.insert(insert_at + offset, text_chunk(keyword, text));
    }

    Ok(png.encoder().bytes().to_vec())
}

/// Build a `tEXt` chunk: keyword, NUL separator, text.
fn text_chunk(keyword: &str, text: &str) -> PngChunk {
    let mut contents = Vec::with_capacity(keyword.len() + 1 + text.len());
    contents.extend_from_slice(keyword.as_bytes());
    contents.push(0);
    contents.extend_from_slice(text.as_bytes());
    PngChunk::new(CHUNK_TEXT, Bytes::from(contents))
}

/// Write the post record into a JPEG's EXIF `UserComment` field.
///
/// The surrounding container is rewritten losslessly: img-parts keeps every
/// segment, including the entropy-coded scan data, byte-identical; only the
/// APP1 EXIF payload changes. Existing directory entries other than
/// `UserComment` survive the rewrite (their offsets are rebuilt to fit the
/// new field size).
fn write_jpeg(post: &Post, source: &[u8]) -> Result<Vec<u8>> {
    let mut jpeg = Jpeg::from_bytes(Bytes::copy_from_slice(source))?;

    let orig_exif_pos = find_exif_segment_pos(&jpeg);
    let had_exif = !jpeg.exif().unwrap_or_default().is_empty();

    let mut metadata = match load_existing_metadata(source) {
        Some(m) => m,
        None if had_exif => {
            // an APP1 EXIF block exists but the directory is unreadable;
            // refusing beats silently dropping the entries we cannot keep
            return Err(Error::MalformedMetadata(
                "existing EXIF directory could not be parsed".into(),
            ));
        }
        None => Metadata::new(),
    };

    let payload = serde_json::to_string(post)?;
    // EXIF UserComment layout: 8-byte character code, then the text
    let mut comment = b"ASCII\0\0\0".to_vec();
    comment.extend_from_slice(payload.as_bytes());
    metadata.set_tag(ExifTag::UserComment(comment));

    let exif_bytes = metadata.as_u8_vec(FileExtension::JPEG);
    if exif_bytes.len() <= JPEG_EXIF_OVERHEAD {
        return Err(Error::Container("serialized EXIF directory is empty".into()));
    }
    jpeg.set_exif(Some(Bytes::copy_from_slice(&exif_bytes[JPEG_EXIF_OVERHEAD..])));

    // set_exif() inserts at a fixed position; move the segment back so the
    // rest of the segment order stays untouched.
    if let Some(new_pos) = find_exif_segment_pos(&jpeg) {
        let target_pos = orig_exif_pos.unwrap_or(1); // default: right after APP0
        if new_pos != target_pos && target_pos < new_pos {
            let segments = jpeg.segments_mut();
            let seg = segments.remove(new_pos);
            segments.insert(target_pos, seg);
        }
    }

    Ok(jpeg.encoder().bytes().to_vec())
}

/// Load the existing EXIF directory, if little_exif can parse one.
/// Returns None both when there is no EXIF and when it is unreadable;
/// the caller distinguishes the two cases.
fn load_existing_metadata(source: &[u8]) -> Option<Metadata> {
    let bytes = source.to_vec();
    // little_exif can panic on exotic directories; treat that as unparsable
    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));
    let result =
        std::panic::catch_unwind(move || Metadata::new_from_vec(&bytes, FileExtension::JPEG));
    std::panic::set_hook(prev_hook);

    match result {
        Ok(Ok(m)) if !m.data().is_empty() => {
            log::debug!("loaded {} existing EXIF tags", m.data().len());
            Some(m)
        }
        Ok(Ok(_)) => None,
        Ok(Err(e)) => {
            log::debug!("could not parse existing EXIF: {e}");
            None
        }
        Err(_) => {
            log::debug!("EXIF parser panicked, treating directory as unparsable");
            None
        }
    }
}

/// Find the position of the EXIF APP1 segment in a JPEG.
/// EXIF segments have marker 0xE1 (APP1) and contents starting with "Exif\0\0".
fn find_exif_segment_pos(jpeg: &Jpeg) -> Option<usize> {
    const EXIF_PREFIX: &[u8] = b"Exif\0\0";
    jpeg.segments()
        .iter()
        .position(|s| s.marker() == 0xE1 && s.contents().starts_with(EXIF_PREFIX))
}
