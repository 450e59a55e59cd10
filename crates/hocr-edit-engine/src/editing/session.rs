use std::collections::BTreeMap;

use crate::editing::edits::{self, EditError, MetadataEdit};
use crate::editing::serializer::CommitError;
use crate::editing::{Document, Replacement};
use crate::models::{BBox, Word};

/// Edits staged against one word. At most one replacement per span.
#[derive(Debug, Clone, Default)]
struct PendingEdit {
    text: Option<Replacement>,
    metadata: Option<(MetadataEdit, Replacement)>,
    id: Option<Replacement>,
}

impl PendingEdit {
    fn replacements(&self) -> impl Iterator<Item = &Replacement> {
        self.id
            .iter()
            .chain(self.metadata.iter().map(|(_, r)| r))
            .chain(self.text.iter())
    }
}

/// Stages word edits against a [`Document`] and commits them together.
///
/// A later edit of the same span replaces the earlier one; a bbox edit and a
/// confidence edit of the same word merge into one title replacement. Edits
/// are validated when staged, so a commit only fails on problems that need
/// the whole buffer to see.
#[derive(Debug)]
pub struct Session {
    document: Document,
    pending: BTreeMap<usize, PendingEdit>,
}

impl Session {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            pending: BTreeMap::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn words(&self) -> &[Word] {
        self.document.words()
    }

    pub fn edit_text(&mut self, index: usize, text: &str) -> Result<(), EditError> {
        let replacement = edits::set_text(self.word(index)?, text)?;
        self.pending.entry(index).or_default().text = Some(replacement);
        Ok(())
    }

    pub fn edit_bbox(&mut self, index: usize, bbox: BBox) -> Result<(), EditError> {
        self.edit_metadata(index, |edit| edit.bbox = Some(bbox))
    }

    pub fn edit_confidence(&mut self, index: usize, confidence: u32) -> Result<(), EditError> {
        self.edit_metadata(index, |edit| edit.confidence = Some(confidence))
    }

    pub fn edit_id(&mut self, index: usize, id: &str) -> Result<(), EditError> {
        let replacement = edits::set_id(self.word(index)?, id)?;
        self.pending.entry(index).or_default().id = Some(replacement);
        Ok(())
    }

    fn edit_metadata(
        &mut self,
        index: usize,
        update: impl FnOnce(&mut MetadataEdit),
    ) -> Result<(), EditError> {
        let word = self.word(index)?;
        let mut edit = self
            .pending
            .get(&index)
            .and_then(|p| p.metadata.as_ref())
            .map(|(edit, _)| *edit)
            .unwrap_or_default();
        update(&mut edit);

        let replacement = edits::set_metadata(word, &edit)?;
        self.pending.entry(index).or_default().metadata = Some((edit, replacement));
        Ok(())
    }

    fn word(&self, index: usize) -> Result<&Word, EditError> {
        self.document
            .words()
            .get(index)
            .ok_or(EditError::NoSuchWord(index))
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Staged replacements in document order.
    pub fn pending(&self) -> Vec<Replacement> {
        let mut replacements: Vec<Replacement> = self
            .pending
            .values()
            .flat_map(PendingEdit::replacements)
            .cloned()
            .collect();
        replacements.sort_by_key(|r| (r.range.start, r.range.end));
        replacements
    }

    pub fn discard(&mut self) {
        self.pending.clear();
    }

    /// Commit staged edits, returning how many replacements were applied.
    ///
    /// On failure the document and the staged edits are left as they were.
    pub fn commit(&mut self) -> Result<usize, CommitError> {
        let replacements = self.pending();
        let committed = self.document.commit(&replacements)?;
        self.document = committed;
        self.pending.clear();
        Ok(replacements.len())
    }
}
