//! Filler text generator for non-key VarChar fields.
//!
//! Every value is a fresh UUID followed by a fixed sentence, cut to the
//! field's `max_length`. The length therefore depends only on `max_length`,
//! which keeps the size model's per-row estimate honest.

use super::uuid::generate_uuid_v4;
use rand::Rng;

/// Sentence appended after the UUID.
pub const FILLER_TEXT: &str = "Vector databases are specialized systems designed for managing \
and retrieving unstructured data through vector embeddings and numerical representations \
that capture the essence of data items like images, audio, videos";

/// Generate filler text no longer than `max_length` bytes.
pub fn generate_text<R: Rng>(rng: &mut R, max_length: u32) -> String {
    let mut text = format!("{} {FILLER_TEXT}", generate_uuid_v4(rng));
    // Template is ASCII, so any byte offset is a char boundary
    text.truncate(max_length as usize);
    text
}
