use serde::{Deserialize, Serialize};

/// A booru post record as embedded in an image file.
///
/// `board` and `id` identify the post and must be non-blank for a write to
/// proceed; the remaining fields may be empty strings. All six field names
/// are part of the on-disk contract: PNG stores one `shinobooru-*` text
/// entry per field, JPEG stores the whole record as one JSON blob in the
/// EXIF `UserComment` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub board: String,
    pub id: String,
    pub author: String,
    pub source: String,
    pub rating: String,
    pub tags: String,
}

impl Post {
    pub fn new(
        board: impl Into<String>,
        id: impl Into<String>,
        author: impl Into<String>,
        source: impl Into<String>,
        rating: impl Into<String>,
        tags: impl Into<String>,
    ) -> Self {
        Self {
            board: board.into(),
            id: id.into(),
            author: author.into(),
            source: source.into(),
            rating: rating.into(),
            tags: tags.into(),
        }
    }

    /// Whether the mandatory fields are non-blank.
    pub(crate) fn has_identity(&self) -> bool {
        !self.board.trim().is_empty() && !self.id.trim().is_empty()
    }
}
