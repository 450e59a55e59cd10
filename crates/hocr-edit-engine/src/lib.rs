//! Byte-exact editing of hOCR documents.
//!
//! [`Document::load`] reads an hOCR buffer in either dialect, [`edits`]
//! turns word changes into [`Replacement`]s, and [`Document::commit`]
//! splices them in so that only the edited bytes differ.

pub mod editing;
pub mod io;
pub mod metadata;
pub mod models;
pub mod parsing;


// Re-export key types for easier usage
pub use editing::{
    CommitError, Document, EditError, LoadError, LoadOptions, MetadataEdit, ParseError,
    Replacement, Session, edits,
};
pub use hocr_edit_syntax::Dialect;
pub use io::*;
pub use metadata::{GeometryRecord, MetadataError};
pub use models::{AttributeQuote, BBox, Page, Revision, Word};
pub use parsing::{ExtractOptions, SkippedWord};
