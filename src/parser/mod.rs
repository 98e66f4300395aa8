//! sqlreq parser: a table-driven automaton over the token stream.
//!
//! # Syntax Overview
//!
//! ```text
//! from http://host/api where header x-key = abc and name = bob with post with timeout 10
//! ─┬── ───────┬─────── ──┬───────────────────────────────────── ──────────┬─────────────
//!  │          │          │                                                │
//!  │          │          │                                                └── Options (verb, basicauth, timeout)
//!  │          │          └── Clauses (header, json field, payload marker)
//!  │          └── URL
//!  └── Source
//! ```
//!
//! In header-selection mode the query starts with a comma-separated list of
//! response headers to extract: `content-type, etag from http://host`.

pub mod fields;
pub mod grammar;
pub mod graph;
pub mod tokens;


use serde::Serialize;

use crate::error::{SqlReqError, SqlReqResult};
use fields::ParsedFields;
use graph::Graph;
use tokens::{Token, tokenize};

/// Start configuration of the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Mode {
    /// The query starts at `from`.
    #[default]
    Body,
    /// The query starts with the list of response headers to extract.
    HeaderSelection,
}

/// Walks a token sequence over a grammar graph.
///
/// Holds no state between calls; the cursor and accumulator live inside
/// [`Parser::parse`].
#[derive(Debug, Clone, Copy)]
pub struct Parser<'g> {
    graph: &'g Graph,
}

impl Parser<'static> {
    /// Parser over the shared graph for `mode`.
    pub fn new(mode: Mode) -> Self {
        Self {
            graph: Graph::for_mode(mode),
        }
    }
}

impl<'g> Parser<'g> {
    /// Parser over a caller-owned graph.
    pub fn with_graph(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Consume every token, firing node actions, then require that the
    /// final node may be followed by end of input.
    pub fn parse(&self, tokens: &[Token]) -> SqlReqResult<ParsedFields> {
        let mut fields = ParsedFields::default();
        let mut cursor = self.graph.start();

        for (i, token) in tokens.iter().enumerate() {
            let Some(next) = self.graph.transition(cursor, token.kind) else {
                return Err(SqlReqError::parse(
                    i + 1,
                    token.kind,
                    self.graph.expected(cursor),
                ));
            };

            cursor = next;
            if let Some(action) = self.graph.node(next).action {
                fields.apply(action, &token.value);
            }
        }

        if !self.graph.can_end(cursor) {
            return Err(SqlReqError::IncompleteCommand);
        }

        Ok(fields)
    }
}

/// Tokenize and parse a query.
pub fn parse(mode: Mode, query: &str) -> SqlReqResult<ParsedFields> {
    Parser::new(mode).parse(&tokenize(query))
}
