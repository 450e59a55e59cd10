//! # hOCR Properties
//!
//! hOCR packs per-element metadata into the `title` attribute as
//! `;`-separated properties, each a key followed by values:
//!
//! ```text
//! bbox 306 245 486 334; x_wconf 92; baseline 0.002 -9
//! ```
//!
//! [`decode`] reads a word's title into a [`GeometryRecord`]. [`encode`]
//! writes a record back against the title it came from, touching only the
//! values that changed so unrelated properties keep their exact bytes.
//!
//! Both work on the raw attribute text (entities still encoded) so the result
//! can be spliced straight into the document.

pub mod lexer;

use std::ops::Range;

use crate::models::BBox;
use lexer::{Segment, segments};

/// Title values that cannot be read as word geometry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    #[error("malformed metadata: {0}")]
    Malformed(String),
}

/// One `key value...` property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub values: Vec<String>,
}

impl Property {
    pub fn new(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    fn is(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }
}

/// The ordered properties of a title value.
///
/// Keys compare ASCII case-insensitively; when a key repeats, the first
/// occurrence is the one read and written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryRecord {
    properties: Vec<Property>,
}

impl GeometryRecord {
    /// Read properties without requiring any particular key.
    pub fn parse(title: &str) -> Result<Self, MetadataError> {
        let mut properties = Vec::new();
        for segment in segments(title) {
            let Some((key, values)) = segment.items.split_first() else {
                continue;
            };
            if key.quoted {
                return Err(MetadataError::Malformed(format!(
                    "expected a property name, found {}",
                    &title[key.range.clone()]
                )));
            }
            properties.push(Property {
                key: title[key.range.clone()].to_string(),
                values: values
                    .iter()
                    .map(|v| title[v.range.clone()].to_string())
                    .collect(),
            });
        }
        Ok(Self { properties })
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.properties
            .iter()
            .find(|p| p.is(key))
            .map(|p| p.values.as_slice())
    }

    /// Replace the values of `key`, appending the property if it is new.
    pub fn set(&mut self, key: &str, values: Vec<String>) {
        match self.properties.iter_mut().find(|p| p.is(key)) {
            Some(property) => property.values = values,
            None => self.properties.push(Property::new(key, values)),
        }
    }

    /// Remove the first property named `key`. Returns whether one existed.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.properties.iter().position(|p| p.is(key)) {
            Some(index) => {
                self.properties.remove(index);
                true
            }
            None => false,
        }
    }

    /// `bbox` as four integers, if present and well-formed.
    pub fn bbox(&self) -> Option<BBox> {
        let values = self.get("bbox")?;
        let [left, top, right, bottom] = values else {
            return None;
        };
        Some(BBox::new(
            left.parse().ok()?,
            top.parse().ok()?,
            right.parse().ok()?,
            bottom.parse().ok()?,
        ))
    }

    pub fn set_bbox(&mut self, bbox: BBox) {
        self.set(
            "bbox",
            [bbox.left, bbox.top, bbox.right, bbox.bottom]
                .iter()
                .map(i32::to_string)
                .collect(),
        );
    }

    /// `x_wconf` when it is a single non-negative integer.
    pub fn confidence(&self) -> Option<u32> {
        match self.get("x_wconf")? {
            [value] => value.parse().ok(),
            _ => None,
        }
    }

    pub fn set_confidence(&mut self, confidence: u32) {
        self.set("x_wconf", vec![confidence.to_string()]);
    }

    /// Page image path, unquoted and with entities decoded.
    pub fn image(&self) -> Option<String> {
        let joined = self.get("image")?.join(" ");
        let decoded = html_escape::decode_html_entities(&joined);
        let path = decoded
            .strip_prefix('"')
            .map(|rest| rest.strip_suffix('"').unwrap_or(rest))
            .unwrap_or(&*decoded);
        Some(path.to_string())
    }

    pub fn ppageno(&self) -> Option<u32> {
        match self.get("ppageno")? {
            [value] => value.parse().ok(),
            _ => None,
        }
    }
}

/// Read a word's title value.
///
/// Fails unless `bbox` is present with exactly four integers. Other
/// properties are kept as they are; an `x_wconf` that is not a non-negative
/// integer is kept but yields no confidence.
pub fn decode(title: &str) -> Result<GeometryRecord, MetadataError> {
    let record = GeometryRecord::parse(title)?;

    match record.get("bbox") {
        None => return Err(MetadataError::Malformed("missing bbox".to_string())),
        Some(values) if values.len() != 4 => {
            return Err(MetadataError::Malformed(format!(
                "bbox needs 4 values, found {}",
                values.len()
            )));
        }
        Some(_) if record.bbox().is_none() => {
            return Err(MetadataError::Malformed(format!(
                "bbox values are not integers: {}",
                record.get("bbox").unwrap_or_default().join(" ")
            )));
        }
        Some(_) => {}
    }

    if let Some(values) = record.get("x_wconf")
        && record.confidence().is_none()
    {
        log::debug!("ignoring x_wconf {:?}: not a non-negative integer", values.join(" "));
    }

    Ok(record)
}

/// Write `record` back against the title text it was decoded from.
///
/// Unchanged properties keep their original bytes, changed ones have only
/// their value span rewritten (values joined by one space), new ones are
/// appended as `; key values`, and removed ones are cut together with a
/// separator.
pub fn encode(record: &GeometryRecord, original: &str) -> String {
    let segments = segments(original);

    // Pair each property with the first unclaimed segment of the same key
    let mut claimed: Vec<Option<&Property>> = vec![None; segments.len()];
    let mut appended = Vec::new();
    for property in &record.properties {
        let slot = segments.iter().enumerate().position(|(i, segment)| {
            claimed[i].is_none()
                && segment
                    .items
                    .first()
                    .is_some_and(|key| property.is(&original[key.range.clone()]))
        });
        match slot {
            Some(i) => claimed[i] = Some(property),
            None => appended.push(property),
        }
    }

    let kept: Vec<usize> = (0..segments.len())
        .filter(|&i| segments[i].is_empty() || claimed[i].is_some())
        .collect();

    let mut out = String::with_capacity(original.len());
    for (n, &i) in kept.iter().enumerate() {
        let segment = &segments[i];
        let text = match claimed[i] {
            Some(property) => render(original, segment, property),
            None => original[segment.range.clone()].to_string(),
        };
        if n == 0 && i != 0 {
            out.push_str(text.trim_start());
        } else {
            out.push_str(&text);
        }
        if n + 1 < kept.len()
            && let Some(separator) = &segment.separator
        {
            out.push_str(&original[separator.clone()]);
        }
    }

    for property in appended {
        if out.trim().is_empty() {
            out.clear();
        } else if out.trim_end().ends_with(';') {
            out.push(' ');
        } else {
            out.push_str("; ");
        }
        out.push_str(&property.key);
        for value in &property.values {
            out.push(' ');
            out.push_str(value);
        }
    }

    out
}

/// A segment's text with its values replaced by `property`'s.
fn render(original: &str, segment: &Segment, property: &Property) -> String {
    let text = &original[segment.range.clone()];
    let (key, values) = match segment.items.split_first() {
        Some(split) => split,
        None => return text.to_string(),
    };

    let unchanged = values.len() == property.values.len()
        && values
            .iter()
            .zip(&property.values)
            .all(|(item, value)| &original[item.range.clone()] == value);
    if unchanged {
        return text.to_string();
    }

    let local = |range: &Range<usize>| range.start - segment.range.start..range.end - segment.range.start;
    let joined = property.values.join(" ");
    let key_end = local(&key.range).end;

    let mut out = String::with_capacity(text.len() + joined.len());
    match (values.first(), values.last()) {
        (Some(first), Some(last)) if !joined.is_empty() => {
            out.push_str(&text[..local(&first.range).start]);
            out.push_str(&joined);
            out.push_str(&text[local(&last.range).end..]);
        }
        (Some(_), Some(last)) => {
            out.push_str(&text[..key_end]);
            out.push_str(&text[local(&last.range).end..]);
        }
        _ => {
            out.push_str(&text[..key_end]);
            if !joined.is_empty() {
                out.push(' ');
                out.push_str(&joined);
            }
            out.push_str(&text[key_end..]);
        }
    }
    out
}
