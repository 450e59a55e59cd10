//! # Grammar Rules
//!
//! This module contains the grammar rules that drive parsing. Each function
//! takes a `&mut Parser` and uses its methods to:
//!
//! 1. Inspect the current token (`p.current()`, `p.at()`, `p.nth()`)
//! 2. Consume tokens (`p.bump()`, `p.eat()`)
//! 3. Build tree structure (`p.start()` → marker → `complete()`/`abandon()`)
//!
//! Both dialects share these rules; where they differ the rule asks
//! `p.dialect()` (void elements, implied end tags, unquoted values).
//!
//! ## Error Recovery
//!
//! Grammar functions are lenient - they produce a tree for any input:
//!
//! - An end tag naming an open ancestor closes the elements in between
//! - An end tag naming nothing open becomes an ERROR node
//! - An unterminated tag ends where the next tag begins
//! - Nesting beyond [`MAX_DEPTH`](super::MAX_DEPTH) is kept flat
//!
//! Each recovery records a `SyntaxError`; none of them stops the parse.

mod element;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse the root document.
///
/// The ROOT node holds the prolog (declarations, comments, whitespace) and
/// all top-level elements.
pub fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();

    while !p.at_end() {
        match p.current() {
            SyntaxKind::L_ANGLE => element::element(p),
            SyntaxKind::L_ANGLE_SLASH => element::stray_end_tag(p),
            _ => element::content_token(p),
        }
    }

    m.complete(p, SyntaxKind::ROOT);
}
