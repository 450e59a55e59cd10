//! # Parser - Event-Based Tree Construction
//!
//! This module implements the core parsing logic, transforming a token stream
//! into a syntax tree using the **event-based** architecture from rust-analyzer.
//!
//! ## Why Event-Based Parsing?
//!
//! Instead of building the tree directly, the grammar emits a flat list of
//! **events** ([`Event`]) that describe the tree structure. The [`Sink`] then
//! builds the actual Rowan tree from events. Grammar code never touches Rowan,
//! and a half-finished element can be closed (or abandoned) at any point
//! during error recovery without unwinding tree-builder state.
//!
//! ## The Event Model
//!
//! Parsing `<b>x</b>` produces:
//! ```text
//! Start(ELEMENT)
//!   Start(START_TAG) Token(L_ANGLE) Token(NAME) Token(R_ANGLE) Finish
//!   Token(TEXT)
//!   Start(END_TAG) Token(L_ANGLE_SLASH) Token(NAME) Token(R_ANGLE) Finish
//! Finish
//! ```
//!
//! ## The Marker System
//!
//! When you call `parser.start()`, you get a [`Marker`]. This marker **must**
//! be either completed with `marker.complete(parser, KIND)` or abandoned with
//! `marker.abandon(parser)`. Dropping it otherwise panics, which catches
//! grammar bugs before they produce corrupt trees.
//!
//! ## Open Elements and Errors
//!
//! Markup recovery needs to know which elements are open: an end tag naming an
//! ancestor closes everything in between. The parser keeps that stack of names
//! and records a [`SyntaxError`] whenever it has to recover. Errors never stop
//! parsing; they are reported next to the tree in [`Parse`].
//!
//! ## Public API
//!
//! The main entry point is [`parse`]:
//!
//! ```
//! use hocr_edit_syntax::{Dialect, parse};
//!
//! let parse = parse("<p><span>Hello</span></p>", Dialect::TagSoup);
//! assert!(parse.errors().is_empty());
//! println!("{:#?}", parse.syntax_node());
//! ```

pub mod event;
pub mod sink;

mod grammar;

use rowan::GreenNode;

use crate::dialect::Dialect;
use crate::lexer::{Token, lex};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use event::Event;
use sink::Sink;

/// Elements nested deeper than this are kept flat to bound recursion.
pub const MAX_DEPTH: usize = 512;

/// A problem the parser recovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    /// Byte offset of the token where recovery happened.
    pub offset: usize,
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at byte {}", self.message, self.offset)
    }
}

/// Result of parsing a document: the lossless tree plus recovered errors.
///
/// Holds the green tree, which is thread-safe and cheap to clone; call
/// [`Parse::syntax_node`] to navigate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<SyntaxError>,
    dialect: Dialect,
}

impl Parse {
    /// Root of the syntax tree.
    pub fn syntax_node(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }
}

/// The parser state machine.
///
/// Holds the token stream, current position, and accumulated events.
/// Grammar functions receive `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `nth_text()`, `at()`, `at_end()`
/// - Consume tokens: `bump()`, `eat()`
/// - Build structure: `start()` → `Marker` → `complete()`/`abandon()`
/// - Track open elements: `push_open()`, `pop_open()`, `is_open()`
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    offset: usize,
    events: Vec<Event>,
    errors: Vec<SyntaxError>,
    open: Vec<&'input str>,
    dialect: Dialect,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of tokens.
    pub fn new(tokens: &'t [Token<'input>], dialect: Dialect) -> Self {
        Self {
            tokens,
            pos: 0,
            offset: 0,
            events: Vec::new(),
            errors: Vec::new(),
            open: Vec::new(),
            dialect,
        }
    }

    /// Parse the tokens and return a syntax tree.
    pub fn parse(mut self) -> Parse {
        grammar::root(&mut self);
        let sink = Sink::new(self.tokens, self.events);
        Parse {
            green: sink.finish(),
            errors: self.errors,
            dialect: self.dialect,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Start a new node and return a marker.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Text of the token n ahead, or "" if past end.
    pub fn nth_text(&self, n: usize) -> &'input str {
        self.tokens.get(self.pos + n).map(|t| t.text).unwrap_or("")
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token unconditionally.
    pub fn bump(&mut self) {
        if let Some(token) = self.tokens.get(self.pos) {
            self.events.push(Event::token(token.kind));
            self.offset += token.text.len();
            self.pos += 1;
        }
    }

    /// Get the text of the current token.
    pub fn current_text(&self) -> &'input str {
        self.nth_text(0)
    }

    /// Record a recovered error at the current token.
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(SyntaxError {
            message: message.into(),
            offset: self.offset,
        });
    }

    /// Wrap the current token in an ERROR node.
    pub fn err_and_bump(&mut self, message: impl Into<String>) {
        self.error(message);
        let m = self.start();
        self.bump();
        m.complete(self, SyntaxKind::ERROR);
    }

    /// Push the name of an element whose content is being parsed.
    pub fn push_open(&mut self, name: &'input str) {
        self.open.push(name);
    }

    pub fn pop_open(&mut self) {
        self.open.pop();
    }

    /// Number of elements currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Whether an element named `name` is open, excluding the innermost one.
    pub fn is_open_ancestor(&self, name: &str) -> bool {
        let dialect = self.dialect;
        self.open
            .iter()
            .rev()
            .skip(1)
            .any(|open| dialect.names_match(open, name))
    }
}

/// A marker for a node being constructed.
///
/// When you call `parser.start()`, a `Placeholder` event is pushed and you get
/// a `Marker` pointing to it. It must be completed or abandoned; dropping it
/// otherwise panics.
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    /// Position in the events vector where our Placeholder lives
    pos: usize,
    /// Tracks whether complete() or abandon() was called
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) -> CompletedMarker {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::Start {
            kind,
            forward_parent: None,
        };
        p.events.push(Event::Finish);
        CompletedMarker { pos: self.pos }
    }

    /// Abandon this marker without creating a node.
    ///
    /// **Note**: This only removes the placeholder if it's the last event.
    /// If other events were pushed after `start()`, the placeholder becomes
    /// inert and is ignored by the Sink.
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.completed = true;
        if self.pos == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Placeholder) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// A marker for a node that has been completed.
///
/// `precede()` wraps the completed node in a new parent, which the grammar
/// uses to turn an already-parsed end tag into a stray ERROR node.
#[derive(Debug, Clone, Copy)]
pub struct CompletedMarker {
    /// Position of the Start event for this completed node
    pos: usize,
}

impl CompletedMarker {
    /// Create a new parent node that will contain this node.
    pub fn precede(self, p: &mut Parser<'_, '_>) -> Marker {
        let new_pos = p.events.len();
        p.events.push(Event::Placeholder);

        if let Event::Start { forward_parent, .. } = &mut p.events[self.pos] {
            *forward_parent = Some(new_pos);
        }

        Marker {
            pos: new_pos,
            completed: false,
        }
    }
}

/// Parse markup source into a syntax tree using the given dialect's grammar.
pub fn parse(source: &str, dialect: Dialect) -> Parse {
    let tokens = lex(source, dialect);
    let parser = Parser::new(&tokens, dialect);
    parser.parse()
}
