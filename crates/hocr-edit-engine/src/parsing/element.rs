//! Reading elements and attributes out of the syntax tree.

use std::ops::Range;

use hocr_edit_syntax::{Dialect, SyntaxKind, SyntaxNode, SyntaxToken};

use crate::models::AttributeQuote;

/// An attribute with a value, located in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Value as written, delimiters excluded, references not decoded
    pub value: String,
    /// Byte span of `value`
    pub value_range: Range<usize>,
    pub quote: AttributeQuote,
}

impl Attribute {
    /// Value with character references decoded.
    pub fn decoded_value(&self) -> String {
        html_escape::decode_html_entities(&self.value).into_owned()
    }
}

pub(crate) fn node_range(node: &SyntaxNode) -> Range<usize> {
    let range = node.text_range();
    usize::from(range.start())..usize::from(range.end())
}

pub(crate) fn token_range(token: &SyntaxToken) -> Range<usize> {
    let range = token.text_range();
    usize::from(range.start())..usize::from(range.end())
}

pub fn start_tag(element: &SyntaxNode) -> Option<SyntaxNode> {
    element.children().find(|n| n.kind() == SyntaxKind::START_TAG)
}

pub fn end_tag(element: &SyntaxNode) -> Option<SyntaxNode> {
    element.children().find(|n| n.kind() == SyntaxKind::END_TAG)
}

pub fn element_name(element: &SyntaxNode) -> Option<String> {
    start_tag(element)?
        .children_with_tokens()
        .filter_map(|t| t.into_token())
        .find(|t| t.kind() == SyntaxKind::NAME)
        .map(|t| t.text().to_string())
}

/// Whether the element cannot have content: `<x/>` or a void element.
pub fn is_empty_element(element: &SyntaxNode, dialect: Dialect) -> bool {
    let self_closing = start_tag(element).is_some_and(|tag| {
        tag.children_with_tokens()
            .filter_map(|t| t.into_token())
            .any(|t| t.kind() == SyntaxKind::SLASH_R_ANGLE)
    });
    self_closing || element_name(element).is_some_and(|name| dialect.is_void_element(&name))
}

/// Attributes that carry a value, in source order.
pub fn attributes(element: &SyntaxNode) -> Vec<Attribute> {
    start_tag(element)
        .map(|tag| {
            tag.children()
                .filter(|n| n.kind() == SyntaxKind::ATTRIBUTE)
                .filter_map(|n| read_attribute(&n))
                .collect()
        })
        .unwrap_or_default()
}

/// The first attribute named `name`, compared under the dialect's rules.
pub fn attribute(element: &SyntaxNode, name: &str, dialect: Dialect) -> Option<Attribute> {
    attributes(element)
        .into_iter()
        .find(|a| dialect.names_match(&a.name, name))
}

/// Whether the element's `class` attribute lists `class` as one of its tokens.
pub fn has_class(element: &SyntaxNode, class: &str, dialect: Dialect) -> bool {
    attribute(element, "class", dialect)
        .is_some_and(|a| a.decoded_value().split_ascii_whitespace().any(|token| token == class))
}

fn read_attribute(node: &SyntaxNode) -> Option<Attribute> {
    // Unquoted values in the strict dialect sit inside an ERROR node
    let mut tokens = node
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() != SyntaxKind::WHITESPACE);

    let name = tokens.next().filter(|t| t.kind() == SyntaxKind::NAME)?;
    tokens.next().filter(|t| t.kind() == SyntaxKind::EQ)?;
    let value = tokens
        .next()
        .filter(|t| matches!(t.kind(), SyntaxKind::STRING | SyntaxKind::NAME))?;

    let range = token_range(&value);
    let text = value.text();
    let (quote, value_range) = match text.chars().next() {
        Some(delimiter @ ('"' | '\'')) => {
            let terminated = text.len() >= 2 && text.ends_with(delimiter);
            let end = if terminated { range.end - 1 } else { range.end };
            let quote = if delimiter == '"' {
                AttributeQuote::Double
            } else {
                AttributeQuote::Single
            };
            (quote, range.start + 1..end)
        }
        _ => (AttributeQuote::Unquoted, range.clone()),
    };
    let local = value_range.start - range.start..value_range.end - range.start;

    Some(Attribute {
        name: name.text().to_string(),
        value: text[local].to_string(),
        value_range,
        quote,
    })
}
