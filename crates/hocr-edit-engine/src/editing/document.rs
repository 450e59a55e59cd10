use hocr_edit_syntax::{Dialect, Parse, SyntaxError, SyntaxNode, parse};

use crate::editing::Replacement;
use crate::editing::serializer::{CommitError, apply};
use crate::models::{Page, Revision, Word};
use crate::parsing::{ExtractOptions, SkippedWord, extract_pages, extract_with_report};

/// Input that cannot be represented as a lossless tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("syntax tree does not reproduce the input")]
    Lossy,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// How to read a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Dialect to parse with; sniffed from the prolog when `None`
    pub dialect: Option<Dialect>,
    pub extract: ExtractOptions,
}

/// A loaded hOCR document: the original bytes, their syntax tree, and the
/// words and pages found in it.
///
/// A document never changes. [`Document::commit`] builds a new one from the
/// spliced bytes under a fresh [`Revision`], so every [`Word`] range stays
/// valid against the document it came from.
///
/// ```
/// use hocr_edit_engine::{Document, edits};
///
/// let doc = Document::load(
///     b"<span class='ocrx_word' id='w1' title='bbox 1 2 3 4'>teh</span>",
/// )
/// .unwrap();
/// let fix = edits::set_text(&doc.words()[0], "the").unwrap();
/// let fixed = doc.commit(&[fix]).unwrap();
///
/// assert_eq!(
///     fixed.as_bytes(),
///     b"<span class='ocrx_word' id='w1' title='bbox 1 2 3 4'>the</span>"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    buffer: Vec<u8>,
    parse: Parse,
    revision: Revision,
    options: ExtractOptions,
    words: Vec<Word>,
    skipped: Vec<SkippedWord>,
    pages: Vec<Page>,
}

impl Document {
    /// Load with the dialect sniffed from the prolog and default word class.
    pub fn load(bytes: &[u8]) -> Result<Self, LoadError> {
        Self::load_with(bytes, &LoadOptions::default())
    }

    pub fn load_with(bytes: &[u8], options: &LoadOptions) -> Result<Self, LoadError> {
        let text = std::str::from_utf8(bytes).map_err(ParseError::from)?;
        let dialect = options.dialect.unwrap_or_else(|| Dialect::detect(bytes));

        let parse = parse(text, dialect);
        if parse.syntax_node().text() != text {
            return Err(ParseError::Lossy.into());
        }
        for error in parse.errors() {
            log::debug!("{dialect}: {error}");
        }

        let revision = Revision::new();
        let extraction = extract_with_report(&parse, text, &options.extract, revision);
        let pages = extract_pages(&parse, &options.extract);
        log::debug!(
            "loaded {} words ({} skipped) and {} pages as {dialect}, revision {revision}",
            extraction.words.len(),
            extraction.skipped.len(),
            pages.len()
        );

        Ok(Self {
            buffer: bytes.to_vec(),
            parse,
            revision,
            options: options.extract.clone(),
            words: extraction.words,
            skipped: extraction.skipped,
            pages,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn text(&self) -> &str {
        // Checked at load
        std::str::from_utf8(&self.buffer).unwrap_or_default()
    }

    pub fn dialect(&self) -> Dialect {
        self.parse.dialect()
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Word elements that were found but could not be read.
    pub fn skipped_words(&self) -> &[SkippedWord] {
        &self.skipped
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn syntax(&self) -> SyntaxNode {
        self.parse.syntax_node()
    }

    pub fn syntax_errors(&self) -> &[SyntaxError] {
        self.parse.errors()
    }

    /// First word with this id.
    pub fn word_by_id(&self, id: &str) -> Option<&Word> {
        self.words.iter().find(|w| w.id == id)
    }

    /// Index of the first word with this id.
    pub fn word_index(&self, id: &str) -> Option<usize> {
        self.words.iter().position(|w| w.id == id)
    }

    /// The innermost word whose element contains `offset`.
    pub fn word_at_offset(&self, offset: usize) -> Option<&Word> {
        self.words
            .iter()
            .filter(|w| w.contains_offset(offset))
            .min_by_key(|w| w.element_range.len())
    }

    /// The page whose element contains `offset`.
    pub fn page_at_offset(&self, offset: usize) -> Option<&Page> {
        self.pages
            .iter()
            .filter(|p| p.contains_offset(offset))
            .min_by_key(|p| p.element_range.len())
    }

    /// Apply `replacements` and load the result as a new document.
    ///
    /// Replacements must come from this revision. The result is parsed with
    /// this document's dialect and options and must yield the same number of
    /// words; on any failure nothing is produced.
    pub fn commit(&self, replacements: &[Replacement]) -> Result<Document, CommitError> {
        if let Some(stale) = replacements.iter().find(|r| r.revision != self.revision) {
            return Err(CommitError::StaleReplacement {
                range: stale.range.clone(),
                expected: self.revision,
                found: stale.revision,
            });
        }

        let bytes = apply(&self.buffer, replacements)?;
        let options = LoadOptions {
            dialect: Some(self.dialect()),
            extract: self.options.clone(),
        };
        let committed = Document::load_with(&bytes, &options)?;

        if committed.words.len() != self.words.len() {
            return Err(CommitError::Verification {
                before: self.words.len(),
                after: committed.words.len(),
            });
        }

        log::debug!(
            "committed {} replacements: revision {} -> {}",
            replacements.len(),
            self.revision,
            committed.revision
        );
        Ok(committed)
    }
}
