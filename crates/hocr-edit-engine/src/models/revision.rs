use std::fmt;

use uuid::Uuid;

/// Identifies one loaded buffer.
///
/// Byte ranges are only meaningful against the buffer they were taken from,
/// so every [`Word`](super::Word) and
/// [`Replacement`](crate::editing::Replacement) carries the revision of that
/// buffer and a commit refuses anything from another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Revision(Uuid);

impl Revision {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Revision {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
