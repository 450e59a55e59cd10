//! Locating and decoding a word's text content.

use std::ops::Range;

use hocr_edit_syntax::{Dialect, SyntaxKind, SyntaxNode, SyntaxToken};
use rowan::NodeOrToken;

use super::element::{end_tag, is_empty_element, node_range, token_range};

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// The editable text span of an element, or `None` when it cannot hold text.
///
/// Prefers the first run of direct character data with non-whitespace
/// content, trimmed. Without one, an element with a single child element
/// (a `<strong>` wrapper, say) is searched instead. Otherwise the span is
/// empty and sits just before the end tag.
pub fn text_range(element: &SyntaxNode, dialect: Dialect) -> Option<Range<usize>> {
    if is_empty_element(element, dialect) {
        return None;
    }

    if let Some(run) = first_text_run(element) {
        return Some(run);
    }

    let mut children = element.children().filter(|n| n.kind() == SyntaxKind::ELEMENT);
    if let (Some(only), None) = (children.next(), children.next())
        && let Some(range) = text_range(&only, dialect)
    {
        return Some(range);
    }

    let at = end_tag(element)
        .map(|tag| node_range(&tag).start)
        .unwrap_or_else(|| node_range(element).end);
    Some(at..at)
}

fn first_text_run(element: &SyntaxNode) -> Option<Range<usize>> {
    let mut run: Option<Range<usize>> = None;

    for child in element.children_with_tokens() {
        match child {
            NodeOrToken::Token(token) if token.kind().is_character_data() => {
                if let Some(content) = content_span(&token) {
                    run = Some(match run {
                        Some(run) => run.start..content.end,
                        None => content,
                    });
                }
            }
            _ if run.is_some() => return run,
            _ => {}
        }
    }

    run
}

/// The non-whitespace part of a character data token.
fn content_span(token: &SyntaxToken) -> Option<Range<usize>> {
    let range = token_range(token);
    let text = token.text();

    match token.kind() {
        SyntaxKind::TEXT => {
            let trimmed_start = text.trim_start_matches(is_markup_whitespace);
            if trimmed_start.is_empty() {
                return None;
            }
            let start = range.start + (text.len() - trimmed_start.len());
            let end = range.start + text.trim_end_matches(is_markup_whitespace).len();
            Some(start..end)
        }
        SyntaxKind::CDATA => {
            let body = text
                .strip_prefix(CDATA_OPEN)
                .map(|rest| rest.strip_suffix(CDATA_CLOSE).unwrap_or(rest))
                .unwrap_or(text);
            (!body.trim_matches(is_markup_whitespace).is_empty()).then_some(range)
        }
        _ => Some(range),
    }
}

/// Markup whitespace is ASCII only; U+00A0 and friends are content.
fn is_markup_whitespace(c: char) -> bool {
    c.is_ascii_whitespace()
}

/// Decode character data as written in the source: references are resolved
/// and CDATA sections unwrapped.
pub fn decode_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find(CDATA_OPEN) {
        out.push_str(&html_escape::decode_html_entities(&rest[..start]));
        let body = &rest[start + CDATA_OPEN.len()..];
        match body.find(CDATA_CLOSE) {
            Some(end) => {
                out.push_str(&body[..end]);
                rest = &body[end + CDATA_CLOSE.len()..];
            }
            None => {
                out.push_str(body);
                rest = "";
            }
        }
    }
    out.push_str(&html_escape::decode_html_entities(rest));
    out
}
