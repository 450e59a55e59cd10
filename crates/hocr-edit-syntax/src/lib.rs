//! # hocr-edit-syntax
//!
//! A lossless syntax tree for hOCR documents (HTML or XHTML) using [Rowan] +
//! [Logos], following the [rust-analyzer] architecture model.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## Why Lossless?
//!
//! Editing an OCR result must not touch bytes the user did not edit. A
//! Concrete Syntax Tree keeps every byte of the source (whitespace, quote
//! style, entity spelling, stray garbage) so any node's text range maps
//! exactly onto the original buffer and edits can be spliced in place.
//!
//! ## Two Dialects
//!
//! hOCR is produced both as tag-soup HTML and as well-formed XHTML. The two
//! read the same bytes differently (`<br>` is empty in HTML but opens an
//! element in XML; `<![CDATA[` is a bogus comment in HTML). [`Dialect`]
//! selects which rules apply; [`Dialect::detect`] sniffs the input.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!               (Logos)          (Grammar)        (GreenNodeBuilder)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! Two Logos machines, one for content and one for the inside of a tag,
//! tokenize the input. Every byte becomes part of some token.
//!
//! ```text
//! "<b>x</b>" → [L_ANGLE, NAME, R_ANGLE, TEXT, L_ANGLE_SLASH, NAME, R_ANGLE]
//! ```
//!
//! ### 2. Parser ([`parser`] module)
//!
//! The parser consumes tokens and emits **events** (Start, Token, Finish),
//! recovering from malformed markup and recording [`SyntaxError`]s.
//!
//! ### 3. Sink ([`parser::sink`] module)
//!
//! The sink consumes events and builds a Rowan green tree.
//!
//! ## Module Structure
//!
//! ```text
//! hocr-edit-syntax/
//! ├── lib.rs           # This file - public API and integration tests
//! ├── dialect.rs       # Tag-soup vs strict XML rules and detection
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── lexer.rs         # Logos-based tokenizer
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system, public parse() function
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs      # Converts events to Rowan GreenNode
//!     └── grammar/
//!         ├── mod.rs     # Root document parsing
//!         └── element.rs # Elements, tags, attributes
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use hocr_edit_syntax::{Dialect, SyntaxKind, parse};
//!
//! let input = "<span class='ocrx_word' title='bbox 1 2 3 4'>Hi</span>";
//! let parse = parse(input, Dialect::detect(input.as_bytes()));
//! let tree = parse.syntax_node();
//!
//! // The tree preserves all text
//! assert_eq!(tree.text().to_string(), input);
//!
//! // Navigate the tree structure
//! assert_eq!(tree.kind(), SyntaxKind::ROOT);
//! let element = tree.children().next().unwrap();
//! assert_eq!(element.kind(), SyntaxKind::ELEMENT);
//! ```

pub mod dialect;
pub mod lexer;
pub mod parser;
pub mod syntax_kind;

pub use dialect::{Dialect, UnknownDialect};
pub use parser::{MAX_DEPTH, Parse, SyntaxError, parse};
pub use syntax_kind::{MarkupLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    /// Helper to format a syntax tree for snapshot testing.
    fn format_tree(node: &SyntaxNode, indent: usize) -> String {
        let mut result = String::new();
        let prefix = "  ".repeat(indent);

        result.push_str(&format!(
            "{}{:?}@{:?}\n",
            prefix,
            node.kind(),
            node.text_range()
        ));

        for child in node.children_with_tokens() {
            match child {
                rowan::NodeOrToken::Node(n) => {
                    result.push_str(&format_tree(&n, indent + 1));
                }
                rowan::NodeOrToken::Token(t) => {
                    let text = t.text().replace('\n', "\\n");
                    result.push_str(&format!(
                        "{}  {:?}@{:?} {:?}\n",
                        prefix,
                        t.kind(),
                        t.text_range(),
                        text
                    ));
                }
            }
        }

        result
    }

    /// Parse a file from `src/fixtures/` in its detected dialect and check
    /// that the tree reproduces it byte for byte in both dialects.
    ///
    /// Fixtures named `broken_*` are expected to produce errors in their
    /// detected dialect; all others must parse cleanly.
    fn fixture_roundtrip(file_name: &str) {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("src/fixtures")
            .join(file_name);
        let input = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));

        let detected = Dialect::detect(input.as_bytes());
        let parse = parse(&input, detected);
        assert_eq!(parse.syntax_node().text().to_string(), input);

        if file_name.starts_with("broken_") {
            assert!(
                !parse.errors().is_empty(),
                "{file_name} parsed without errors as {detected}"
            );
        } else {
            assert!(
                parse.errors().is_empty(),
                "{file_name} as {detected}: {:?}",
                parse.errors()
            );
        }

        for dialect in [Dialect::TagSoup, Dialect::StrictXml] {
            let tree = parse_in(&input, dialect);
            assert_eq!(tree.text().to_string(), input, "{file_name} as {dialect}");
        }
    }

    fn parse_in(input: &str, dialect: Dialect) -> SyntaxNode {
        parse(input, dialect).syntax_node()
    }

    include!(concat!(env!("OUT_DIR"), "/fixture_tests.rs"));

    #[test]
    fn snapshot_word_span() {
        let tree = parse_in("<b class=x>y</b>", Dialect::TagSoup);
        assert_snapshot!(format_tree(&tree, 0), @r#"
        ROOT@0..16
          ELEMENT@0..16
            START_TAG@0..11
              L_ANGLE@0..1 "<"
              NAME@1..2 "b"
              WHITESPACE@2..3 " "
              ATTRIBUTE@3..10
                NAME@3..8 "class"
                EQ@8..9 "="
                NAME@9..10 "x"
              R_ANGLE@10..11 ">"
            TEXT@11..12 "y"
            END_TAG@12..16
              L_ANGLE_SLASH@12..14 "</"
              NAME@14..15 "b"
              R_ANGLE@15..16 ">"
        "#);
    }

    #[test]
    fn snapshot_stray_end_tag() {
        let tree = parse_in("a</p>", Dialect::StrictXml);
        assert_snapshot!(format_tree(&tree, 0), @r#"
        ROOT@0..5
          TEXT@0..1 "a"
          ERROR@1..5
            END_TAG@1..5
              L_ANGLE_SLASH@1..3 "</"
              NAME@3..4 "p"
              R_ANGLE@4..5 ">"
        "#);
    }

    #[test]
    fn snapshot_self_closing_with_char_ref() {
        let tree = parse_in("<p>&amp;<br/></p>", Dialect::StrictXml);
        assert_snapshot!(format_tree(&tree, 0), @r#"
        ROOT@0..17
          ELEMENT@0..17
            START_TAG@0..3
              L_ANGLE@0..1 "<"
              NAME@1..2 "p"
              R_ANGLE@2..3 ">"
            CHAR_REF@3..8 "&amp;"
            ELEMENT@8..13
              START_TAG@8..13
                L_ANGLE@8..9 "<"
                NAME@9..11 "br"
                SLASH_R_ANGLE@11..13 "/>"
            END_TAG@13..17
              L_ANGLE_SLASH@13..15 "</"
              NAME@15..16 "p"
              R_ANGLE@16..17 ">"
        "#);
    }

    #[test]
    fn messy_input_keeps_every_byte() {
        // Half-edited OCR output: unclosed tags, stray end tags, junk in tags
        let input = r#"<div class='ocr_page' title="image x.png; bbox 0 0 10 10">
<span class=ocrx_word title='bbox 1 1 2 2; x_wconf 9'>a &amp b</i>
<span class="ocrx_word" title="bbox 3 3 4 4" / bogus = >c
</p></span><!-- unterminated comment
"#;
        for dialect in [Dialect::TagSoup, Dialect::StrictXml] {
            let parse = parse(input, dialect);
            assert_eq!(parse.syntax_node().text().to_string(), input);
            assert!(!parse.errors().is_empty());
        }
    }

    #[test]
    fn roundtrip_preserves_text() {
        let inputs = [
            "",
            "plain text",
            "<p>unclosed",
            "</stray>",
            "< not a tag",
            "<a href=x>b</A>",
            "<?xml version='1.0'?><html/>",
            "<!DOCTYPE html><p>a<p>b",
            "<script>if (a < b) {}</script>",
            "<p title=\"unterminated",
            "<![CDATA[ x ]]>",
            "a & b &#38; &#x26; &nbsp;",
            "<br><br/><br />",
        ];

        for input in inputs {
            for dialect in [Dialect::TagSoup, Dialect::StrictXml] {
                let tree = parse_in(input, dialect);
                assert_eq!(
                    tree.text().to_string(),
                    input,
                    "Roundtrip failed for: {:?} as {}",
                    input,
                    dialect
                );
            }
        }
    }
}
