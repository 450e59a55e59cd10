//! # Parser Events
//!
//! Events are the intermediate representation between parsing and tree building.
//! Instead of building the tree directly, the grammar emits a **flat sequence**
//! of events that describe the tree structure:
//!
//! ```text
//! Start(ELEMENT)          ← Begin an ELEMENT node
//!   Start(START_TAG)
//!     Token(L_ANGLE)
//!     Token(NAME)
//!     Token(R_ANGLE)
//!   Finish
//!   Token(TEXT)
//!   ...
//! Finish                  ← End the ELEMENT node
//! ```
//!
//! The Sink processes these in order, maintaining a stack of open nodes.
//! Start pushes, Finish pops.
//!
//! ## Forward Parent Links
//!
//! The `forward_parent` field in `Start` lets the grammar wrap a node it has
//! already finished: a stray `</b>` is parsed as an END_TAG first and only then
//! wrapped in ERROR. The Sink follows the link and opens the outer node first.

use crate::syntax_kind::SyntaxKind;

/// An event emitted by the parser during tree construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node.
    ///
    /// If `forward_parent` is set, it points to another `Start` event that
    /// becomes this node's parent.
    Start {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },

    /// Add `n_raw_tokens` lexer tokens to the current node as one token of
    /// the given kind.
    Token { kind: SyntaxKind, n_raw_tokens: u8 },

    /// Finish the current node.
    Finish,

    /// Reserved by `parser.start()`; replaced on completion, ignored by the
    /// Sink when the marker was abandoned.
    Placeholder,
}

impl Event {
    /// Create a start event with no forward parent.
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start {
            kind,
            forward_parent: None,
        }
    }

    /// Create a token event for a single raw token.
    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token {
            kind,
            n_raw_tokens: 1,
        }
    }
}
