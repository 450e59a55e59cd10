//! # Dialects - Which Grammar Parses a Document
//!
//! hOCR comes in two concrete syntaxes: tag-soup HTML (as written by many OCR
//! front-ends and hand edits) and XHTML (as written by Tesseract). Both are
//! parsed into the same [`SyntaxKind`] tree, but the rules differ in a few
//! well-defined places:
//!
//! | Rule                         | `TagSoup`              | `StrictXml`        |
//! |------------------------------|------------------------|--------------------|
//! | Name comparison              | ASCII case-insensitive | exact              |
//! | Void elements (`br`, `img`)  | no end tag expected    | none               |
//! | Raw text (`script`, `style`) | one `RAW_TEXT` token   | none               |
//! | Implied end tags (`p`, `li`) | closed by siblings     | none               |
//! | Unquoted attribute values    | accepted               | `ERROR` node       |
//! | `<![CDATA[ ]]>`              | bogus declaration      | `CDATA` token      |
//!
//! The dialect is picked once per document by [`Dialect::detect`] and then
//! threaded through the lexer and the parser.
//!
//! [`SyntaxKind`]: crate::syntax_kind::SyntaxKind

use std::sync::LazyLock;

use regex::bytes::Regex;

/// How many bytes of the document head are inspected during detection.
const SNIFF_LEN: usize = 2048;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

static XHTML_DOCTYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<!DOCTYPE\s+html\s+PUBLIC\s+"-//W3C//DTD\s+XHTML"#)
        .expect("XHTML doctype pattern is valid")
});

static XHTML_NAMESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"xmlns\s*=\s*["']http://www\.w3\.org/1999/xhtml["']"#)
        .expect("XHTML namespace pattern is valid")
});

/// One of the two concrete grammars a document can be parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// Error-tolerant HTML: case-insensitive names, void and raw-text
    /// elements, implied end tags, unquoted attribute values.
    #[default]
    TagSoup,
    /// XHTML read as XML: exact names, every element explicitly closed.
    StrictXml,
}

impl Dialect {
    /// Sniff the dialect from the document prolog.
    ///
    /// An XML declaration, an XHTML doctype or the XHTML namespace in the
    /// first couple of kilobytes selects [`Dialect::StrictXml`]; anything
    /// else, including undecodable input, falls back to [`Dialect::TagSoup`].
    pub fn detect(bytes: &[u8]) -> Self {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let start = bytes
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(bytes.len());
        let head = &bytes[start..bytes.len().min(start + SNIFF_LEN)];

        if head.starts_with(b"<?xml") {
            return Dialect::StrictXml;
        }
        if XHTML_DOCTYPE.is_match(head) || XHTML_NAMESPACE.is_match(head) {
            return Dialect::StrictXml;
        }
        Dialect::TagSoup
    }

    /// Compare two tag or attribute names under this dialect's rules.
    pub fn names_match(self, a: &str, b: &str) -> bool {
        match self {
            Dialect::TagSoup => a.eq_ignore_ascii_case(b),
            Dialect::StrictXml => a == b,
        }
    }

    /// Elements that never have content or an end tag.
    pub fn is_void_element(self, name: &str) -> bool {
        match self {
            Dialect::TagSoup => [
                "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
                "param", "source", "track", "wbr",
            ]
            .iter()
            .any(|void| void.eq_ignore_ascii_case(name)),
            Dialect::StrictXml => false,
        }
    }

    /// Elements whose content is not markup and runs to the matching end tag.
    pub fn is_raw_text_element(self, name: &str) -> bool {
        match self {
            Dialect::TagSoup => {
                name.eq_ignore_ascii_case("script") || name.eq_ignore_ascii_case("style")
            }
            Dialect::StrictXml => false,
        }
    }

    /// Whether a start tag named `incoming` implicitly closes an open
    /// element named `open`.
    pub fn implies_end(self, open: &str, incoming: &str) -> bool {
        if self == Dialect::StrictXml {
            return false;
        }
        let is = |name: &str, set: &[&str]| set.iter().any(|s| s.eq_ignore_ascii_case(name));

        if is(open, &["p"]) {
            return is(
                incoming,
                &[
                    "address", "article", "aside", "blockquote", "div", "dl", "fieldset",
                    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "main",
                    "nav", "ol", "p", "pre", "section", "table", "ul",
                ],
            );
        }
        if is(open, &["li"]) {
            return is(incoming, &["li"]);
        }
        if is(open, &["dt", "dd"]) {
            return is(incoming, &["dt", "dd"]);
        }
        if is(open, &["option"]) {
            return is(incoming, &["option", "optgroup"]);
        }
        if is(open, &["td", "th"]) {
            return is(incoming, &["td", "th", "tr"]);
        }
        if is(open, &["tr"]) {
            return is(incoming, &["tr"]);
        }
        false
    }

    /// Whether unquoted attribute values (`title=foo`) are well-formed.
    pub fn allows_unquoted_attributes(self) -> bool {
        self == Dialect::TagSoup
    }

    /// Whether `<![CDATA[ ... ]]>` is a character data section.
    pub fn has_cdata_sections(self) -> bool {
        self == Dialect::StrictXml
    }

    /// Whether this dialect can carry `c` as character data.
    ///
    /// XML 1.0 forbids C0 controls other than tab, line feed and carriage
    /// return; HTML only forbids NUL.
    pub fn is_valid_char(self, c: char) -> bool {
        match self {
            Dialect::TagSoup => c != '\0',
            Dialect::StrictXml => {
                !matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
            }
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::TagSoup => f.write_str("tag-soup"),
            Dialect::StrictXml => f.write_str("strict-xml"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect {0:?}, expected \"tag-soup\" or \"strict-xml\"")]
pub struct UnknownDialect(pub String);

impl std::str::FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tag-soup" | "html" => Ok(Dialect::TagSoup),
            "strict-xml" | "xhtml" => Ok(Dialect::StrictXml),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}
