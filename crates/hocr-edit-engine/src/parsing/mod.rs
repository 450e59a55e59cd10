//! # Word Extraction
//!
//! Walks a parsed document in pre-order and turns every element whose class
//! lists the word marker (`ocrx_word` by default) into a [`Word`], recording
//! the byte ranges an edit may later replace:
//!
//! - the `id` value, when declared
//! - the `title` value (quotes excluded), which holds the geometry
//! - the text content (see [`text::text_range`])
//!
//! A word whose title is missing or unreadable is skipped with a warning;
//! the rest of the document still loads.

pub mod element;
pub mod text;

use std::ops::Range;

use hocr_edit_syntax::{Dialect, Parse, SyntaxKind, SyntaxNode};

use crate::metadata::{self, GeometryRecord};
use crate::models::{AttributeQuote, Page, Revision, Word};
use element::{attribute, has_class, node_range};

/// Class tokens that mark word and page elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub word_class: String,
    pub page_class: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            word_class: "ocrx_word".to_string(),
            page_class: "ocr_page".to_string(),
        }
    }
}

/// A word element that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedWord {
    pub element_range: Range<usize>,
    pub id: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub words: Vec<Word>,
    pub skipped: Vec<SkippedWord>,
}

/// Extract words in document order.
pub fn extract(
    parse: &Parse,
    source: &str,
    options: &ExtractOptions,
    revision: Revision,
) -> Vec<Word> {
    extract_with_report(parse, source, options, revision).words
}

/// Extract words, also reporting the word elements that were skipped.
pub fn extract_with_report(
    parse: &Parse,
    source: &str,
    options: &ExtractOptions,
    revision: Revision,
) -> Extraction {
    let dialect = parse.dialect();
    let mut extraction = Extraction::default();

    for element in elements(parse) {
        if !has_class(&element, &options.word_class, dialect) {
            continue;
        }
        match read_word(&element, source, dialect, revision) {
            Ok(word) => extraction.words.push(word),
            Err(skipped) => {
                log::warn!(
                    "skipping word {} at byte {}: {}",
                    skipped.id.as_deref().unwrap_or("without id"),
                    skipped.element_range.start,
                    skipped.reason
                );
                extraction.skipped.push(skipped);
            }
        }
    }

    extraction
}

/// Extract page elements in document order.
pub fn extract_pages(parse: &Parse, options: &ExtractOptions) -> Vec<Page> {
    let dialect = parse.dialect();

    elements(parse)
        .filter(|element| has_class(element, &options.page_class, dialect))
        .map(|element| {
            let element_range = node_range(&element);
            let geometry = attribute(&element, "title", dialect).and_then(|title| {
                GeometryRecord::parse(&title.value)
                    .inspect_err(|e| {
                        log::warn!("page at byte {}: {e}", element_range.start);
                    })
                    .ok()
            });

            Page {
                id: attribute(&element, "id", dialect).map(|a| a.decoded_value()),
                bbox: geometry.as_ref().and_then(GeometryRecord::bbox),
                image: geometry.as_ref().and_then(GeometryRecord::image),
                ppageno: geometry.as_ref().and_then(GeometryRecord::ppageno),
                element_range,
            }
        })
        .collect()
}

fn elements(parse: &Parse) -> impl Iterator<Item = SyntaxNode> {
    parse
        .syntax_node()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::ELEMENT)
}

fn read_word(
    element: &SyntaxNode,
    source: &str,
    dialect: Dialect,
    revision: Revision,
) -> Result<Word, SkippedWord> {
    let element_range = node_range(element);
    let id = attribute(element, "id", dialect);
    let skip = |reason: String| SkippedWord {
        element_range: element_range.clone(),
        id: id.as_ref().map(|a| a.decoded_value()),
        reason,
    };

    let title = attribute(element, "title", dialect)
        .ok_or_else(|| skip("missing title attribute".to_string()))?;
    let geometry = metadata::decode(&title.value).map_err(|e| skip(e.to_string()))?;
    let bbox = geometry
        .bbox()
        .ok_or_else(|| skip("missing bbox".to_string()))?;

    let (id, id_range, id_quote) = match id {
        Some(attribute) => (
            attribute.decoded_value(),
            Some(attribute.value_range),
            attribute.quote,
        ),
        None => {
            let placeholder = format!("@{}", element_range.start);
            log::warn!(
                "word at byte {} has no id, using {placeholder}",
                element_range.start
            );
            (placeholder, None, AttributeQuote::default())
        }
    };

    let text_range = text::text_range(element, dialect);
    let text = text_range
        .as_ref()
        .map(|range| text::decode_text(&source[range.clone()]))
        .unwrap_or_default();

    Ok(Word {
        id,
        id_range,
        id_quote,
        bbox,
        confidence: geometry.confidence(),
        text,
        text_range,
        metadata: title.value,
        metadata_range: title.value_range,
        geometry,
        element_range,
        dialect,
        revision,
    })
}
