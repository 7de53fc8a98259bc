//! # shinobooru-meta
//!
//! Embed a small booru post record (origin board, post id, author, source
//! URL, rating, tag string) into an image file's native metadata area and
//! read it back, without re-encoding the pixel data.
//!
//! Two containers are supported, detected by file signature rather than
//! extension:
//!
//! | Format | Metadata area | Write strategy |
//! |--------|---------------|----------------|
//! | PNG    | `tEXt` chunks, six reserved `shinobooru-*` keywords | chunk-level passthrough |
//! | JPEG   | EXIF `UserComment` holding a JSON record | lossless APP1 rewrite |
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use shinobooru_meta::{Post, read_post_from_image, write_post_to_image};
//! use std::path::Path;
//!
//! fn main() -> shinobooru_meta::Result<()> {
//!     let post = Post::new(
//!         "yande.re",
//!         "385402",
//!         "",
//!         "",
//!         "s",
//!         "cleavage nanaroba_hana thighhighs",
//!     );
//!     let image = Path::new("385402.png");
//!
//!     // Same source and destination: the file is replaced atomically.
//!     write_post_to_image(&post, image, image)?;
//!
//!     let roundtrip = read_post_from_image(image)?;
//!     assert_eq!(roundtrip, post);
//!     Ok(())
//! }
//! ```
//!
//! Writes preserve every metadata entry this crate does not own: unrelated
//! `tEXt` chunks and all other PNG chunks are copied through verbatim, and
//! a JPEG rewrite touches only the APP1 EXIF segment. Each call is
//! independent and stateless; concurrent use on different files is safe,
//! while concurrent writes to the same path are left uncoordinated beyond
//! the last-writer-wins guarantee of the atomic replace.
//!
//! ## Modules
//!
//! - [`format`] — container detection from magic bytes
//! - [`meta`] — the per-container codecs and the read/write entry points
//! - [`post`] — the [`Post`] record
//! - [`error`] — failure kinds

pub mod error;
pub mod format;
pub mod meta;
pub mod post;

pub use error::{Error, Result};
pub use format::ImageFormat;
pub use meta::{read_post_from_image, write_post_to_image};
pub use post::Post;
