//! Sink for converting parser events into a Rowan green tree.
//!
//! The sink is where the lossless guarantee is checked: every lexer token has
//! to be attached to some node by the time the events run out.

use rowan::{GreenNode, GreenNodeBuilder};

use crate::lexer::Token;
use crate::parser::event::Event;
use crate::syntax_kind::SyntaxKind;

/// Converts parser events and tokens into a Rowan green tree.
pub struct Sink<'t, 'input> {
    builder: GreenNodeBuilder<'static>,
    tokens: &'t [Token<'input>],
    cursor: usize,
    events: Vec<Event>,
}

impl<'t, 'input> Sink<'t, 'input> {
    /// Create a new sink.
    pub fn new(tokens: &'t [Token<'input>], events: Vec<Event>) -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
            tokens,
            cursor: 0,
            events,
        }
    }

    /// Consume the sink and build the green tree.
    pub fn finish(mut self) -> GreenNode {
        // Process forward_parent links to create proper tree structure
        let mut forward_parents = Vec::new();

        for i in 0..self.events.len() {
            match std::mem::replace(&mut self.events[i], Event::Placeholder) {
                Event::Start {
                    kind,
                    forward_parent,
                } => {
                    // Collect forward parent chain
                    forward_parents.push(kind);
                    let mut fp = forward_parent;

                    while let Some(parent_idx) = fp {
                        match std::mem::replace(&mut self.events[parent_idx], Event::Placeholder) {
                            Event::Start {
                                kind,
                                forward_parent,
                            } => {
                                fp = forward_parent;
                                forward_parents.push(kind);
                            }
                            _ => unreachable!(),
                        }
                    }

                    // Start nodes in reverse order (outermost first)
                    for kind in forward_parents.drain(..).rev() {
                        self.builder.start_node(kind.into());
                    }
                }
                Event::Token { kind, n_raw_tokens } => {
                    self.token(kind, n_raw_tokens as usize);
                }
                Event::Finish => {
                    self.builder.finish_node();
                }
                Event::Placeholder => {}
            }
        }

        debug_assert_eq!(
            self.cursor,
            self.tokens.len(),
            "grammar left tokens outside the tree"
        );
        self.builder.finish()
    }

    fn token(&mut self, kind: SyntaxKind, n_raw_tokens: usize) {
        // Accumulate text from n_raw_tokens
        let start = self.cursor;
        self.cursor += n_raw_tokens;
        let text: String = self.tokens[start..self.cursor]
            .iter()
            .map(|t| t.text)
            .collect();
        self.builder.token(kind.into(), &text);
    }
}
