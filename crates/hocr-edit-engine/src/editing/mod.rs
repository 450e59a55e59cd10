/*!
 * # Editing Core
 *
 * Edits never rewrite the document. A loaded [`Document`] keeps the exact
 * input bytes, and every change is a [`Replacement`]: a byte range of that
 * buffer plus the bytes to put there.
 *
 * ## Flow
 *
 * 1. [`Document::load`] parses the bytes and extracts words, each carrying
 *    the ranges of its `id` value, `title` value and text content.
 * 2. Functions in [`edits`] validate a semantic change against one word and
 *    return the replacement it implies. A title edit only rewrites the
 *    values it changes; separators and unrelated properties stay as written.
 * 3. [`Document::commit`] splices the replacements in one pass and loads the
 *    result as a new document under a new [`Revision`](crate::models::Revision).
 *
 * Bytes outside every replaced range are copied unchanged, so an empty
 * commit reproduces the input byte for byte.
 *
 * [`Session`] sits on top for callers that stage several edits before
 * committing.
 */

pub mod document;
pub mod edits;
pub mod replacement;
pub mod serializer;
pub mod session;

pub use document::{Document, LoadError, LoadOptions, ParseError};
pub use edits::{EditError, MetadataEdit};
pub use replacement::Replacement;
pub use serializer::{CommitError, apply};
pub use session::Session;
