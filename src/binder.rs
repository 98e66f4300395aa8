//! Parameter binding.
//!
//! String arguments fill `%s` placeholders in the query text, in order,
//! before it is tokenized. Any other argument is a payload candidate; the
//! first one becomes the request body when the query has `payload = ?`.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_till1},
    combinator::{map, value},
    multi::many0,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::{SqlReqError, SqlReqResult};

/// A caller-supplied query argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Spliced into the next `%s` placeholder.
    Str(String),
    /// Payload candidate.
    Value(Value),
}

impl Arg {
    /// Serialize any value into a payload argument.
    pub fn payload<T: Serialize + ?Sized>(payload: &T) -> SqlReqResult<Self> {
        Ok(Arg::Value(serde_json::to_value(payload)?))
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Value(Value::Bool(b))
    }
}

impl From<i32> for Arg {
    fn from(n: i32) -> Self {
        Arg::Value(Value::from(n))
    }
}

impl From<i64> for Arg {
    fn from(n: i64) -> Self {
        Arg::Value(Value::from(n))
    }
}

impl From<f64> for Arg {
    fn from(n: f64) -> Self {
        Arg::Value(Value::from(n))
    }
}

/// Result of binding arguments to a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    /// Query text with every `%s` replaced.
    pub query: String,
    /// First non-string argument, if any.
    pub payload: Option<Value>,
}

/// Split `args` into substitutions and payload candidates, and substitute.
pub fn bind(query: &str, args: &[Arg]) -> SqlReqResult<Bound> {
    let mut strings = Vec::new();
    let mut payload = None;

    for arg in args {
        match arg {
            Arg::Str(s) => strings.push(s.as_str()),
            Arg::Value(v) => {
                if payload.is_none() {
                    payload = Some(v.clone());
                }
            }
        }
    }

    Ok(Bound {
        query: substitute(query, &strings)?,
        payload,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Piece<'a> {
    Text(&'a str),
    Placeholder,
    Percent,
}

fn piece(input: &str) -> IResult<&str, Piece<'_>> {
    alt((
        value(Piece::Placeholder, tag("%s")),
        value(Piece::Percent, tag("%%")),
        map(take_till1(|c: char| c == '%'), Piece::Text),
        // unknown verb, kept as-is
        map(tag("%"), Piece::Text),
    ))(input)
}

/// Printf-style `%s` substitution. `%%` is a literal percent sign.
///
/// The number of placeholders must equal the number of strings.
pub fn substitute(query: &str, strings: &[&str]) -> SqlReqResult<String> {
    let pieces = match many0(piece)(query) {
        Ok((_, pieces)) => pieces,
        Err(_) => vec![Piece::Text(query)],
    };

    let placeholders = pieces.iter().filter(|p| **p == Piece::Placeholder).count();
    if placeholders != strings.len() {
        return Err(SqlReqError::Substitution {
            placeholders,
            supplied: strings.len(),
        });
    }

    let mut out = String::with_capacity(query.len());
    let mut next = strings.iter();
    for piece in pieces {
        match piece {
            Piece::Text(text) => out.push_str(text),
            Piece::Percent => out.push('%'),
            Piece::Placeholder => {
                if let Some(s) = next.next() {
                    out.push_str(s);
                }
            }
        }
    }

    Ok(out)
}
