use std::ops::Range;

use logos::Logos;

/// Tokens of an hOCR `title` value such as `bbox 1 2 3 4; x_wconf 90`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleToken {
    #[token(";")]
    Separator,

    #[regex(r"[ \t\r\n\x0C]+")]
    Whitespace,

    /// `"..."`; may contain spaces and `;`
    #[regex(r#""[^"]*"?"#)]
    Quoted,

    /// A bare key or value; entity references such as `&quot;` stay inside
    #[regex(r#"([^ \t\r\n\x0C;"&]|&[A-Za-z][A-Za-z0-9]*;|&#[0-9]+;|&#[xX][0-9A-Fa-f]+;|&)+"#)]
    Word,
}

/// One `;`-delimited part of a title value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Bytes between the surrounding separators (or input ends).
    pub range: Range<usize>,
    /// The `;` that ends this segment, absent for the last one.
    pub separator: Option<Range<usize>>,
    /// Key then values: every non-whitespace token in the segment.
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub range: Range<usize>,
    pub quoted: bool,
}

impl Segment {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Split a title value into segments. Every byte of `input` lies in exactly
/// one segment range or separator range.
pub fn segments(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut items = Vec::new();

    let mut lexer = TitleToken::lexer(input);
    while let Some(token) = lexer.next() {
        let span = lexer.span();
        match token {
            Ok(TitleToken::Separator) => {
                segments.push(Segment {
                    range: start..span.start,
                    separator: Some(span.clone()),
                    items: std::mem::take(&mut items),
                });
                start = span.end;
            }
            Ok(TitleToken::Whitespace) => {}
            Ok(TitleToken::Quoted) => items.push(Item {
                range: span,
                quoted: true,
            }),
            // Anything else reads as part of a bare word
            Ok(TitleToken::Word) | Err(()) => match items.last_mut() {
                Some(last) if !last.quoted && last.range.end == span.start => {
                    last.range.end = span.end;
                }
                _ => items.push(Item {
                    range: span,
                    quoted: false,
                }),
            },
        }
    }

    segments.push(Segment {
        range: start..input.len(),
        separator: None,
        items,
    });
    segments
}
