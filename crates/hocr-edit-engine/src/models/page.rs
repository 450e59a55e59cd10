use std::ops::Range;

use super::BBox;

/// An `ocr_page` element: where a presentation layer finds the page image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: Option<String>,
    pub bbox: Option<BBox>,
    /// Image path from the `image` property, unquoted
    pub image: Option<String>,
    /// Physical page number from the `ppageno` property
    pub ppageno: Option<u32>,
    pub element_range: Range<usize>,
}

impl Page {
    /// Whether this page's element contains the byte at `offset`.
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.element_range.contains(&offset)
    }
}
