//! Splicing replacements into the original buffer.

use std::ops::Range;

use crate::editing::Replacement;
use crate::editing::document::LoadError;
use crate::models::Revision;

/// A commit that was refused; the document is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommitError {
    #[error("replacements at {first:?} and {second:?} overlap")]
    OverlappingEdit {
        first: Range<usize>,
        second: Range<usize>,
    },
    #[error("replacement at {range:?} is outside the {len}-byte buffer")]
    OutOfBounds { range: Range<usize>, len: usize },
    #[error("replacement at {range:?} was made for revision {found}, not {expected}")]
    StaleReplacement {
        range: Range<usize>,
        expected: Revision,
        found: Revision,
    },
    #[error("committed document has {after} words, expected {before}")]
    Verification { before: usize, after: usize },
    #[error("committed document failed to load: {0}")]
    Load(#[from] LoadError),
}

/// Apply `replacements` to `buffer` in one pass.
///
/// Replacements are ordered by `(start, end)`, keeping the given order for
/// equal keys. Bytes outside every replaced range are copied unchanged.
/// Fails without output if two replacements share a byte, replace the same
/// empty range, or reach past the buffer.
pub fn apply(buffer: &[u8], replacements: &[Replacement]) -> Result<Vec<u8>, CommitError> {
    let mut ordered: Vec<&Replacement> = replacements.iter().collect();
    ordered.sort_by_key(|r| (r.range.start, r.range.end));

    let mut capacity = buffer.len();
    let mut previous: Option<&Range<usize>> = None;
    for replacement in &ordered {
        let range = &replacement.range;
        if range.start > range.end || range.end > buffer.len() {
            return Err(CommitError::OutOfBounds {
                range: range.clone(),
                len: buffer.len(),
            });
        }
        if let Some(previous) = previous
            && (range.start < previous.end || range == previous)
        {
            return Err(CommitError::OverlappingEdit {
                first: previous.clone(),
                second: range.clone(),
            });
        }
        capacity = (capacity + replacement.new_bytes.len()).saturating_sub(range.len());
        previous = Some(range);
    }

    let mut out = Vec::with_capacity(capacity);
    let mut cursor = 0;
    for replacement in ordered {
        log::debug!(
            "replacing {:?} with {} bytes",
            replacement.range,
            replacement.new_bytes.len()
        );
        out.extend_from_slice(&buffer[cursor..replacement.range.start]);
        out.extend_from_slice(&replacement.new_bytes);
        cursor = replacement.range.end;
    }
    out.extend_from_slice(&buffer[cursor..]);

    Ok(out)
}
