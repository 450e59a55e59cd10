use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use hocr_edit_syntax::Dialect;

use super::Revision;
use crate::metadata::GeometryRecord;

/// A pixel rectangle as hOCR writes it: `bbox left top right bottom`.
///
/// Kept exactly as decoded; a reversed box is not corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BBox {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// `left <= right` and `top <= bottom`.
    pub fn is_ordered(&self) -> bool {
        self.left <= self.right && self.top <= self.bottom
    }

    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        (self.left..=self.right).contains(&x) && (self.top..=self.bottom).contains(&y)
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.left, self.top, self.right, self.bottom)
    }
}

/// How an attribute value is delimited in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeQuote {
    #[default]
    Double,
    Single,
    Unquoted,
}

impl AttributeQuote {
    /// Escape `value` so it can replace the text between these delimiters.
    pub fn escape<'a>(&self, value: &'a str) -> Cow<'a, str> {
        match self {
            AttributeQuote::Double => html_escape::encode_double_quoted_attribute(value),
            AttributeQuote::Single => html_escape::encode_single_quoted_attribute(value),
            AttributeQuote::Unquoted => html_escape::encode_unquoted_attribute(value),
        }
    }
}

/// One word element, as extracted from a specific buffer revision.
///
/// All ranges are byte offsets into that buffer and are only valid against
/// it; see [`Revision`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// Declared `id`, or `@<element start>` when the element has none
    pub id: String,
    /// Value span of the `id` attribute, quotes excluded
    pub id_range: Option<Range<usize>>,
    pub id_quote: AttributeQuote,
    pub bbox: BBox,
    /// `x_wconf`, when present and a non-negative integer
    pub confidence: Option<u32>,
    /// Character content with references and CDATA decoded
    pub text: String,
    /// Editable text span, surrounding whitespace excluded. `None` for
    /// self-closing and void elements.
    pub text_range: Option<Range<usize>>,
    /// Raw `title` value
    pub metadata: String,
    /// Value span of the `title` attribute, quotes excluded
    pub metadata_range: Range<usize>,
    pub geometry: GeometryRecord,
    pub element_range: Range<usize>,
    pub dialect: Dialect,
    pub revision: Revision,
}

impl Word {
    /// Whether `id` was declared rather than synthesized.
    pub fn has_declared_id(&self) -> bool {
        self.id_range.is_some()
    }

    pub fn can_hold_text(&self) -> bool {
        self.text_range.is_some()
    }

    pub fn contains_offset(&self, offset: usize) -> bool {
        self.element_range.contains(&offset)
    }
}
