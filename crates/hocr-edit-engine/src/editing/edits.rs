//! Semantic edits against a [`Word`].
//!
//! Each function validates the edit and returns the [`Replacement`] it
//! implies; nothing is applied until the replacements are committed.

use crate::editing::Replacement;
use crate::metadata::encode;
use crate::models::{BBox, Word};

/// An edit rejected before it could touch the document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("invalid text: {0}")]
    InvalidText(String),
    #[error("word has no id attribute to change")]
    MissingId,
    #[error("no word at index {0}")]
    NoSuchWord(usize),
}

/// Bbox and confidence changes applied to one title in a single replacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetadataEdit {
    pub bbox: Option<BBox>,
    pub confidence: Option<u32>,
}

/// Highest `x_wconf` hOCR allows.
pub const MAX_CONFIDENCE: u32 = 100;

/// Replace the word's text content.
///
/// `&`, `<` and `>` are escaped; characters the document's dialect cannot
/// carry are rejected.
pub fn set_text(word: &Word, new_text: &str) -> Result<Replacement, EditError> {
    let range = word.text_range.clone().ok_or_else(|| {
        EditError::InvalidText(format!("word {} is an empty element", word.id))
    })?;
    validate_chars(word, new_text)?;

    let escaped = html_escape::encode_text(new_text);
    Ok(Replacement::new(word.revision, range, escaped.as_bytes()))
}

/// Replace the word's bounding box, leaving other title properties as written.
pub fn set_bbox(word: &Word, bbox: BBox) -> Result<Replacement, EditError> {
    set_metadata(
        word,
        &MetadataEdit {
            bbox: Some(bbox),
            confidence: None,
        },
    )
}

/// Replace the word's `x_wconf`, adding it when absent.
pub fn set_confidence(word: &Word, confidence: u32) -> Result<Replacement, EditError> {
    set_metadata(
        word,
        &MetadataEdit {
            bbox: None,
            confidence: Some(confidence),
        },
    )
}

pub fn set_metadata(word: &Word, edit: &MetadataEdit) -> Result<Replacement, EditError> {
    let mut geometry = word.geometry.clone();

    if let Some(bbox) = edit.bbox {
        if !bbox.is_ordered() {
            return Err(EditError::InvalidGeometry(format!(
                "bbox {bbox} has left > right or top > bottom"
            )));
        }
        geometry.set_bbox(bbox);
    }
    if let Some(confidence) = edit.confidence {
        if confidence > MAX_CONFIDENCE {
            return Err(EditError::InvalidGeometry(format!(
                "confidence {confidence} is above {MAX_CONFIDENCE}"
            )));
        }
        geometry.set_confidence(confidence);
    }

    let title = encode(&geometry, &word.metadata);
    Ok(Replacement::new(
        word.revision,
        word.metadata_range.clone(),
        title.into_bytes(),
    ))
}

/// Replace the value of the word's declared `id`.
pub fn set_id(word: &Word, new_id: &str) -> Result<Replacement, EditError> {
    let range = word.id_range.clone().ok_or(EditError::MissingId)?;
    if new_id.is_empty() {
        return Err(EditError::InvalidText("id is empty".to_string()));
    }
    if new_id.chars().any(char::is_whitespace) {
        return Err(EditError::InvalidText(format!(
            "id {new_id:?} contains whitespace"
        )));
    }
    validate_chars(word, new_id)?;

    let escaped = word.id_quote.escape(new_id);
    Ok(Replacement::new(word.revision, range, escaped.as_bytes()))
}

fn validate_chars(word: &Word, text: &str) -> Result<(), EditError> {
    match text.chars().find(|&c| !word.dialect.is_valid_char(c)) {
        Some(c) => Err(EditError::InvalidText(format!(
            "U+{:04X} cannot appear in a {} document",
            u32::from(c),
            word.dialect
        ))),
        None => Ok(()),
    }
}
