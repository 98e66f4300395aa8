//! Tokenizer: query text to a flat list of typed tokens.

use std::fmt;

use serde::Serialize;

/// Kind of a token, and of the grammar node that accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // operators
    Equal,
    Question,
    // delimiters
    Comma,
    // keywords
    From,
    Where,
    And,
    Payload,
    Header,
    With,
    Get,
    Post,
    Put,
    Patch,
    Delete,
    BasicAuth,
    Timeout,
    /// Free-form value (url, key, header value, ...).
    Value,
    /// Graph entry point, never produced by the tokenizer.
    Start,
    /// End of input, never produced by the tokenizer.
    Eof,
}

/// Reserved words and symbols, in the order they are documented.
pub const KEYWORDS: [TokenKind; 16] = [
    TokenKind::From,
    TokenKind::Where,
    TokenKind::And,
    TokenKind::Payload,
    TokenKind::Header,
    TokenKind::With,
    TokenKind::Get,
    TokenKind::Post,
    TokenKind::Put,
    TokenKind::Patch,
    TokenKind::Delete,
    TokenKind::BasicAuth,
    TokenKind::Timeout,
    TokenKind::Comma,
    TokenKind::Equal,
    TokenKind::Question,
];

impl TokenKind {
    /// Literal spelling, also used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Equal => "=",
            TokenKind::Question => "?",
            TokenKind::Comma => ",",
            TokenKind::From => "from",
            TokenKind::Where => "where",
            TokenKind::And => "and",
            TokenKind::Payload => "payload",
            TokenKind::Header => "header",
            TokenKind::With => "with",
            TokenKind::Get => "get",
            TokenKind::Post => "post",
            TokenKind::Put => "put",
            TokenKind::Patch => "patch",
            TokenKind::Delete => "delete",
            TokenKind::BasicAuth => "basicauth",
            TokenKind::Timeout => "timeout",
            TokenKind::Value => "value",
            TokenKind::Start => "start",
            TokenKind::Eof => "EOF",
        }
    }

    /// Look up a reserved word or symbol. The input must already be lower-case.
    pub fn keyword(field: &str) -> Option<TokenKind> {
        KEYWORDS.into_iter().find(|k| k.as_str() == field)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single token with the literal text that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    fn comma() -> Self {
        Self::new(TokenKind::Comma, ",")
    }
}

/// Split a query into tokens.
///
/// The query is lower-cased and split on whitespace. Reserved words become
/// keyword tokens; anything else is a value, with one pair of surrounding
/// single quotes removed and a leading or trailing comma split off into its
/// own token. Never fails.
pub fn tokenize(query: &str) -> Vec<Token> {
    let lowered = query.to_lowercase();
    let mut tokens = Vec::new();

    for field in lowered.split_whitespace() {
        if let Some(kind) = TokenKind::keyword(field) {
            tokens.push(Token::new(kind, field));
            continue;
        }
        push_value(&mut tokens, field);
    }

    tokens
}

fn push_value(tokens: &mut Vec<Token>, field: &str) {
    let field = field.strip_prefix('\'').unwrap_or(field);
    let field = field.strip_suffix('\'').unwrap_or(field);

    let field = match field.strip_prefix(',') {
        Some(rest) => {
            tokens.push(Token::comma());
            rest
        }
        None => field,
    };

    match field.strip_suffix(',') {
        Some(rest) => {
            tokens.push(Token::new(TokenKind::Value, rest));
            tokens.push(Token::comma());
        }
        None => tokens.push(Token::new(TokenKind::Value, field)),
    }
}
