use std::ops::Range;

use crate::models::Revision;

/// A pending splice: replace `range` of the buffer at `revision` with
/// `new_bytes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub revision: Revision,
    pub range: Range<usize>,
    pub new_bytes: Vec<u8>,
}

impl Replacement {
    pub fn new(revision: Revision, range: Range<usize>, new_bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            revision,
            range,
            new_bytes: new_bytes.into(),
        }
    }

    /// Change in buffer length once applied.
    pub fn len_delta(&self) -> isize {
        self.new_bytes.len() as isize - self.range.len() as isize
    }

    /// Whether applying this would leave the buffer as it is.
    pub fn is_noop(&self, buffer: &[u8]) -> bool {
        buffer.get(self.range.clone()) == Some(self.new_bytes.as_slice())
    }
}
