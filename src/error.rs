//! Error types for sqlreq.

use std::num::ParseIntError;

use thiserror::Error;

use crate::parser::tokens::TokenKind;

/// The main error type for sqlreq operations.
#[derive(Debug, Error)]
pub enum SqlReqError {
    /// A token had no matching transition in the grammar graph.
    #[error("parse error at {position} token ({found}), expected: {}", join_kinds(.expected))]
    Parse {
        /// 1-based position of the offending token.
        position: usize,
        found: TokenKind,
        /// Kinds that were valid at that point, in successor order.
        expected: Vec<TokenKind>,
    },

    /// All tokens were consumed but the walk did not end next to EOF.
    #[error("command incomplete, unexpected EOF")]
    IncompleteCommand,

    /// The query carries a payload marker but no payload argument was given.
    #[error("no payload")]
    MissingPayload,

    /// The `timeout` literal is not a non-negative integer.
    #[error("wrong timeout format error: {0}")]
    InvalidTimeoutFormat(#[source] ParseIntError),

    /// `%s` placeholders and string arguments do not line up.
    #[error("query has {placeholders} %s placeholder(s) but {supplied} string argument(s) were supplied")]
    Substitution { placeholders: usize, supplied: usize },

    /// Header name or value rejected by the HTTP layer.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SqlReqError {
    /// Create a parse error for the token at the given 1-based position.
    pub fn parse(position: usize, found: TokenKind, expected: Vec<TokenKind>) -> Self {
        Self::Parse {
            position,
            found,
            expected,
        }
    }
}

fn join_kinds(kinds: &[TokenKind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Result type alias for sqlreq operations.
pub type SqlReqResult<T> = Result<T, SqlReqError>;
