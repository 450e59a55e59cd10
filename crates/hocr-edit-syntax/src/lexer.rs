//! # Lexer - Tokenizing Markup Source
//!
//! This module provides the first stage of parsing: breaking source text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! The most important property of this lexer is that **every byte in the input
//! appears in exactly one token**. We never skip or discard characters. This
//! is what makes byte-exact re-serialization possible:
//!
//! ```
//! use hocr_edit_syntax::{Dialect, lexer::lex};
//!
//! let input = "<span class='ocrx_word'>Hello &amp; bye</span>\n";
//! let tokens = lex(input, Dialect::TagSoup);
//!
//! // Concatenating all token texts gives back the original
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Two Modes
//!
//! Markup is not context-free at the token level: `title` is a name inside a
//! tag but plain text between tags. The lexer therefore runs two Logos
//! machines and switches between them with [`logos::Lexer::morph`]:
//!
//! - [`ContentToken`] between tags: text, character references, comments,
//!   declarations, and the `<` / `</` that open a tag;
//! - [`TagToken`] inside a tag: names, `=`, quoted values, whitespace, and
//!   the `>` / `/>` that return to content mode.
//!
//! A `<` that is not followed by a name start is ordinary text, and a `<`
//! inside an unterminated tag ends that tag without being consumed, so the
//! parser can recover.
//!
//! The body of a raw-text element (`<script>`, `<style>` in tag soup) is
//! emitted as a single `RAW_TEXT` token.

use std::ops::Range;

use logos::Logos;

use crate::dialect::Dialect;
use crate::syntax_kind::SyntaxKind;

/// Token kinds produced between tags.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(extras = Dialect)]
pub enum ContentToken {
    /// `<!-- ... -->`, running to end of input when unterminated
    #[token("<!--", comment)]
    Comment,

    /// `<![CDATA[ ... ]]>`
    #[token("<![CDATA[", cdata)]
    CData,

    /// `<!DOCTYPE ...>` and other markup declarations
    #[token("<!", declaration)]
    Declaration,

    /// `<? ... ?>`
    #[token("<?", processing_instruction)]
    ProcessingInstruction,

    /// `</`
    #[token("</")]
    LAngleSlash,

    /// `<`
    #[token("<")]
    LAngle,

    /// Named or numeric character reference
    #[regex(r"&[A-Za-z][A-Za-z0-9]*;|&#[0-9]+;|&#[xX][0-9A-Fa-f]+;")]
    CharRef,

    /// Plain character data
    #[regex(r"[^<&]+")]
    Text,
}

/// Token kinds produced inside a tag.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(extras = Dialect)]
pub enum TagToken {
    #[regex(r"[ \t\r\n\x0C]+")]
    Whitespace,

    #[regex(r#"[^ \t\r\n\x0C"'<>/=]+"#)]
    Name,

    #[token("=")]
    Eq,

    /// Quoted value; the closing quote is missing only at end of input
    #[regex(r#""[^"]*"?"#)]
    #[regex(r#"'[^']*'?"#)]
    String,

    #[token(">")]
    RAngle,

    #[token("/>")]
    SlashRAngle,

    #[token("/")]
    Slash,
}

fn comment(lex: &mut logos::Lexer<ContentToken>) {
    bump_past(lex, "-->");
}

fn cdata(lex: &mut logos::Lexer<ContentToken>) {
    match lex.extras {
        Dialect::StrictXml => bump_past(lex, "]]>"),
        // HTML reads CDATA outside foreign content as a bogus comment
        Dialect::TagSoup => bump_past(lex, ">"),
    }
}

fn declaration(lex: &mut logos::Lexer<ContentToken>) {
    bump_past(lex, ">");
}

fn processing_instruction(lex: &mut logos::Lexer<ContentToken>) {
    let terminator = match lex.extras {
        Dialect::StrictXml => "?>",
        Dialect::TagSoup => ">",
    };
    bump_past(lex, terminator);
}

/// Extend the current token through `terminator`, or to end of input.
fn bump_past(lex: &mut logos::Lexer<ContentToken>, terminator: &str) {
    let rest = lex.remainder();
    let len = rest
        .find(terminator)
        .map(|i| i + terminator.len())
        .unwrap_or(rest.len());
    lex.bump(len);
}

impl ContentToken {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self, dialect: Dialect) -> SyntaxKind {
        match self {
            ContentToken::Comment => SyntaxKind::COMMENT,
            ContentToken::CData if dialect.has_cdata_sections() => SyntaxKind::CDATA,
            ContentToken::CData | ContentToken::Declaration => SyntaxKind::DOCTYPE,
            ContentToken::ProcessingInstruction => SyntaxKind::PROCESSING_INSTRUCTION,
            ContentToken::LAngleSlash => SyntaxKind::L_ANGLE_SLASH,
            ContentToken::LAngle => SyntaxKind::L_ANGLE,
            ContentToken::CharRef => SyntaxKind::CHAR_REF,
            ContentToken::Text => SyntaxKind::TEXT,
        }
    }
}

impl TagToken {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TagToken::Whitespace => SyntaxKind::WHITESPACE,
            TagToken::Name => SyntaxKind::NAME,
            TagToken::Eq => SyntaxKind::EQ,
            TagToken::String => SyntaxKind::STRING,
            TagToken::RAngle => SyntaxKind::R_ANGLE,
            TagToken::SlashRAngle => SyntaxKind::SLASH_R_ANGLE,
            TagToken::Slash => SyntaxKind::SLASH,
        }
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

type Spanned<'a> = (Token<'a>, Range<usize>);

/// What the lexer knows about the tag it is currently inside.
#[derive(Debug, Clone, Copy)]
struct TagState<'a> {
    closing: bool,
    name: Option<&'a str>,
}

enum Mode<'a> {
    Content(logos::Lexer<'a, ContentToken>),
    Tag(logos::Lexer<'a, TagToken>, TagState<'a>),
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str, dialect: Dialect) -> Vec<Token<'_>> {
    lex_with_spans(input, dialect)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str, dialect: Dialect) -> Vec<Spanned<'_>> {
    let mut tokens = Vec::new();
    let mut mode = Some(Mode::Content(ContentToken::lexer_with_extras(
        input, dialect,
    )));

    while let Some(current) = mode.take() {
        mode = match current {
            Mode::Content(lexer) => content_step(lexer, &mut tokens),
            Mode::Tag(lexer, state) => tag_step(lexer, state, &mut tokens),
        };
    }

    tokens
}

fn content_step<'a>(
    mut lexer: logos::Lexer<'a, ContentToken>,
    out: &mut Vec<Spanned<'a>>,
) -> Option<Mode<'a>> {
    let result = lexer.next()?;
    let span = lexer.span();
    let kind = match result {
        Ok(ContentToken::LAngle | ContentToken::LAngleSlash)
            if !starts_name(lexer.remainder()) =>
        {
            // `a < b` and `</ >` are text, not tags
            SyntaxKind::TEXT
        }
        Ok(token) => token.to_syntax_kind(lexer.extras),
        // A lone `&` or similar: keep it as text
        Err(()) => SyntaxKind::TEXT,
    };
    out.push(spanned(lexer.source(), kind, span));

    match kind {
        SyntaxKind::L_ANGLE => Some(Mode::Tag(
            lexer.morph(),
            TagState {
                closing: false,
                name: None,
            },
        )),
        SyntaxKind::L_ANGLE_SLASH => Some(Mode::Tag(
            lexer.morph(),
            TagState {
                closing: true,
                name: None,
            },
        )),
        _ => Some(Mode::Content(lexer)),
    }
}

fn tag_step<'a>(
    mut lexer: logos::Lexer<'a, TagToken>,
    mut state: TagState<'a>,
    out: &mut Vec<Spanned<'a>>,
) -> Option<Mode<'a>> {
    // An unterminated tag ends where the next one begins
    if lexer.remainder().starts_with('<') {
        return Some(Mode::Content(lexer.morph()));
    }

    let result = lexer.next()?;
    let span = lexer.span();
    let kind = match result {
        Ok(token) => token.to_syntax_kind(),
        Err(()) => SyntaxKind::JUNK,
    };
    let text = &lexer.source()[span.clone()];
    out.push(spanned(lexer.source(), kind, span));

    match kind {
        SyntaxKind::NAME if state.name.is_none() => {
            state.name = Some(text);
            Some(Mode::Tag(lexer, state))
        }
        SyntaxKind::R_ANGLE => {
            let mut content: logos::Lexer<'a, ContentToken> = lexer.morph();
            if let Some(name) = state.name
                && !state.closing
                && content.extras.is_raw_text_element(name)
            {
                let len = raw_text_len(content.remainder(), name);
                if len > 0 {
                    let start = content.span().end;
                    out.push(spanned(
                        content.source(),
                        SyntaxKind::RAW_TEXT,
                        start..start + len,
                    ));
                    content.bump(len);
                }
            }
            Some(Mode::Content(content))
        }
        SyntaxKind::SLASH_R_ANGLE => Some(Mode::Content(lexer.morph())),
        _ => Some(Mode::Tag(lexer, state)),
    }
}

fn spanned(source: &str, kind: SyntaxKind, span: Range<usize>) -> Spanned<'_> {
    (
        Token {
            kind,
            text: &source[span.clone()],
        },
        span,
    )
}

/// Whether `rest` begins with a character that can start a tag name.
fn starts_name(rest: &str) -> bool {
    rest.chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == ':')
}

/// Length of a raw-text body: everything up to `</name` followed by a
/// delimiter, compared case-insensitively.
fn raw_text_len(rest: &str, name: &str) -> usize {
    for (i, _) in rest.match_indices("</") {
        let after = &rest[i + 2..];
        let Some(candidate) = after.get(..name.len()) else {
            continue;
        };
        let delimited = after[name.len()..]
            .chars()
            .next()
            .is_none_or(|c| c.is_ascii_whitespace() || c == '/' || c == '>');
        if candidate.eq_ignore_ascii_case(name) && delimited {
            return i;
        }
    }
    rest.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn token(kind: SyntaxKind, text: &str) -> Token<'_> {
        Token { kind, text }
    }

    fn kinds(input: &str, dialect: Dialect) -> Vec<SyntaxKind> {
        lex(input, dialect).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex("", Dialect::TagSoup), vec![]);
    }

    #[test]
    fn lex_plain_text() {
        let tokens = lex("hello world\n", Dialect::TagSoup);
        assert_eq!(tokens, vec![token(SyntaxKind::TEXT, "hello world\n")]);
    }

    #[test]
    fn lex_word_element() {
        let tokens = lex(
            "<span class='ocrx_word' title=\"bbox 1 2 3 4\">Hi</span>",
            Dialect::TagSoup,
        );
        assert_eq!(
            tokens,
            vec![
                token(SyntaxKind::L_ANGLE, "<"),
                token(SyntaxKind::NAME, "span"),
                token(SyntaxKind::WHITESPACE, " "),
                token(SyntaxKind::NAME, "class"),
                token(SyntaxKind::EQ, "="),
                token(SyntaxKind::STRING, "'ocrx_word'"),
                token(SyntaxKind::WHITESPACE, " "),
                token(SyntaxKind::NAME, "title"),
                token(SyntaxKind::EQ, "="),
                token(SyntaxKind::STRING, "\"bbox 1 2 3 4\""),
                token(SyntaxKind::R_ANGLE, ">"),
                token(SyntaxKind::TEXT, "Hi"),
                token(SyntaxKind::L_ANGLE_SLASH, "</"),
                token(SyntaxKind::NAME, "span"),
                token(SyntaxKind::R_ANGLE, ">"),
            ]
        );
    }

    #[test]
    fn lex_character_references() {
        let tokens = lex("a&amp;b&#38;&#x26;&", Dialect::TagSoup);
        assert_eq!(
            tokens,
            vec![
                token(SyntaxKind::TEXT, "a"),
                token(SyntaxKind::CHAR_REF, "&amp;"),
                token(SyntaxKind::TEXT, "b"),
                token(SyntaxKind::CHAR_REF, "&#38;"),
                token(SyntaxKind::CHAR_REF, "&#x26;"),
                token(SyntaxKind::TEXT, "&"),
            ]
        );
    }

    #[test]
    fn lex_prolog() {
        let input = "<?xml version=\"1.0\"?>\n<!DOCTYPE html>\n<!-- a > b -->";
        assert_eq!(
            kinds(input, Dialect::StrictXml),
            vec![
                SyntaxKind::PROCESSING_INSTRUCTION,
                SyntaxKind::TEXT,
                SyntaxKind::DOCTYPE,
                SyntaxKind::TEXT,
                SyntaxKind::COMMENT,
            ]
        );
    }

    #[test]
    fn lex_unterminated_comment_runs_to_end() {
        let tokens = lex("<!-- never closed <span>", Dialect::TagSoup);
        assert_eq!(
            tokens,
            vec![token(SyntaxKind::COMMENT, "<!-- never closed <span>")]
        );
    }

    #[test]
    fn cdata_depends_on_dialect() {
        let input = "<![CDATA[x > y]]>";
        assert_eq!(kinds(input, Dialect::StrictXml), vec![SyntaxKind::CDATA]);
        assert_eq!(
            kinds(input, Dialect::TagSoup),
            vec![SyntaxKind::DOCTYPE, SyntaxKind::TEXT]
        );
    }

    #[test]
    fn lone_angle_bracket_is_text() {
        assert_eq!(
            kinds("1 < 2 </ 3", Dialect::TagSoup),
            vec![
                SyntaxKind::TEXT,
                SyntaxKind::TEXT,
                SyntaxKind::TEXT,
                SyntaxKind::TEXT,
                SyntaxKind::TEXT,
            ]
        );
    }

    #[test]
    fn unterminated_tag_ends_at_next_tag() {
        assert_eq!(
            kinds("<b <i>", Dialect::TagSoup),
            vec![
                SyntaxKind::L_ANGLE,
                SyntaxKind::NAME,
                SyntaxKind::WHITESPACE,
                SyntaxKind::L_ANGLE,
                SyntaxKind::NAME,
                SyntaxKind::R_ANGLE,
            ]
        );
    }

    #[test]
    fn raw_text_element_body_is_one_token() {
        let tokens = lex(
            "<script>if (a < b) { x = '</span>'; }</SCRIPT>",
            Dialect::TagSoup,
        );
        assert_eq!(
            tokens[3],
            token(SyntaxKind::RAW_TEXT, "if (a < b) { x = '</span>'; }")
        );
        assert_eq!(tokens[4], token(SyntaxKind::L_ANGLE_SLASH, "</"));
    }

    #[test]
    fn script_is_markup_in_strict_dialect() {
        let kinds = kinds("<script>a<b/></script>", Dialect::StrictXml);
        assert!(!kinds.contains(&SyntaxKind::RAW_TEXT));
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        let tokens = lex("<a title=\"bbox 1 2", Dialect::TagSoup);
        assert_eq!(
            tokens.last(),
            Some(&token(SyntaxKind::STRING, "\"bbox 1 2"))
        );
    }

    #[test]
    fn all_bytes_preserved() {
        let input = "<?xml version=\"1.0\"?>\n<html>\n <body class=ocr_page>\n  <p>x &lt; y<br/>é</p>\n  <script>a<b</script>\n </body>\n</html>\n";
        for dialect in [Dialect::TagSoup, Dialect::StrictXml] {
            let tokens = lex(input, dialect);
            let reconstructed: String = tokens.iter().map(|t| t.text).collect();
            assert_eq!(input, reconstructed);
        }
    }

    #[test]
    fn spans_are_correct() {
        let input = "<span id='a'>hello</span> world";
        let tokens = lex_with_spans(input, Dialect::TagSoup);
        let mut expected_start = 0;
        for (token, span) in &tokens {
            assert_eq!(token.text, &input[span.clone()]);
            assert_eq!(span.start, expected_start);
            expected_start = span.end;
        }
        assert_eq!(expected_start, input.len());
    }

    #[test]
    fn raw_text_length_requires_delimiter() {
        assert_eq!(raw_text_len("x</scripts></script>", "script"), 11);
        assert_eq!(raw_text_len("no end", "script"), 6);
        assert_eq!(raw_text_len("</style >", "style"), 0);
    }
}
