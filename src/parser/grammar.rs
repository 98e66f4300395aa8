//! The query grammar as a declarative rule table.
//!
//! ```text
//! command  := [ value ( , value )* ] FROM url [ WHERE clause ( AND clause )* ] ( WITH option )* EOF
//! clause   := HEADER key = value | key = value | PAYLOAD = ( ? | value )
//! option   := GET | POST | PUT | PATCH | DELETE
//!           | BASICAUTH login , password
//!           | TIMEOUT seconds
//! ```
//!
//! The leading header-name list only exists in [`Mode::HeaderSelection`].
//! Every node names its successors by [`NodeId`], so adding a node never
//! renumbers the others. Successors of one node must have distinct kinds:
//! the walker takes the first match and never backtracks.

use crate::descriptor::Method;
use crate::parser::Mode;
use crate::parser::tokens::TokenKind;

/// Identity of a grammar node. The discriminant is the node's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    Start,
    OutputHeader,
    OutputComma,
    From,
    Url,
    Eof,
    Where,
    And,
    Header,
    HeaderKey,
    HeaderEqual,
    HeaderValue,
    JsonKey,
    JsonEqual,
    JsonValue,
    Payload,
    PayloadEqual,
    PayloadPlaceholder,
    PayloadValue,
    With,
    Get,
    Post,
    Put,
    Patch,
    Delete,
    BasicAuth,
    BasicLogin,
    BasicComma,
    BasicPassword,
    Timeout,
    TimeoutValue,
}

impl NodeId {
    /// All nodes, in index order.
    pub const ALL: [NodeId; 31] = [
        NodeId::Start,
        NodeId::OutputHeader,
        NodeId::OutputComma,
        NodeId::From,
        NodeId::Url,
        NodeId::Eof,
        NodeId::Where,
        NodeId::And,
        NodeId::Header,
        NodeId::HeaderKey,
        NodeId::HeaderEqual,
        NodeId::HeaderValue,
        NodeId::JsonKey,
        NodeId::JsonEqual,
        NodeId::JsonValue,
        NodeId::Payload,
        NodeId::PayloadEqual,
        NodeId::PayloadPlaceholder,
        NodeId::PayloadValue,
        NodeId::With,
        NodeId::Get,
        NodeId::Post,
        NodeId::Put,
        NodeId::Patch,
        NodeId::Delete,
        NodeId::BasicAuth,
        NodeId::BasicLogin,
        NodeId::BasicComma,
        NodeId::BasicPassword,
        NodeId::Timeout,
        NodeId::TimeoutValue,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Field update fired when the walker enters a node.
///
/// Every action receives the literal value of the token that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AppendOutputHeader,
    SetUrl,
    AppendHeaderKey,
    AppendHeaderValue,
    AppendJsonKey,
    AppendJsonValue,
    SetPayloadFlag,
    SetMethod(Method),
    SetBasicLogin,
    SetBasicPassword,
    SetTimeoutLiteral,
}

/// One row of the grammar table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub kind: TokenKind,
    pub action: Option<Action>,
    /// Ordered successors. Earlier entries win.
    pub next: &'static [NodeId],
}

fn node(kind: TokenKind, next: &'static [NodeId]) -> Rule {
    Rule {
        kind,
        action: None,
        next,
    }
}

fn acting(kind: TokenKind, action: Action, next: &'static [NodeId]) -> Rule {
    Rule {
        kind,
        action: Some(action),
        next,
    }
}

// Shared successor sets.
const CLAUSE: &[NodeId] = &[NodeId::Header, NodeId::JsonKey, NodeId::Payload];
const AFTER_CLAUSE: &[NodeId] = &[NodeId::With, NodeId::And, NodeId::Eof];
const AFTER_OPTION: &[NodeId] = &[NodeId::Eof, NodeId::With];
const OPTIONS: &[NodeId] = &[
    NodeId::Post,
    NodeId::Get,
    NodeId::Put,
    NodeId::Patch,
    NodeId::Delete,
    NodeId::BasicAuth,
    NodeId::Timeout,
];

/// The grammar rule for `id` under the given start configuration.
pub fn rule(id: NodeId, mode: Mode) -> Rule {
    use TokenKind as T;

    match id {
        NodeId::Start => match mode {
            Mode::Body => node(T::Start, &[NodeId::From]),
            Mode::HeaderSelection => node(T::Start, &[NodeId::OutputHeader]),
        },
        NodeId::OutputHeader => acting(
            T::Value,
            Action::AppendOutputHeader,
            &[NodeId::OutputComma, NodeId::From],
        ),
        NodeId::OutputComma => node(T::Comma, &[NodeId::OutputHeader]),
        NodeId::From => node(T::From, &[NodeId::Url]),
        NodeId::Url => acting(
            T::Value,
            Action::SetUrl,
            &[NodeId::Eof, NodeId::Where, NodeId::With],
        ),
        NodeId::Eof => node(T::Eof, &[]),

        NodeId::Where => node(T::Where, CLAUSE),
        NodeId::And => node(T::And, CLAUSE),

        NodeId::Header => node(T::Header, &[NodeId::HeaderKey]),
        NodeId::HeaderKey => acting(T::Value, Action::AppendHeaderKey, &[NodeId::HeaderEqual]),
        NodeId::HeaderEqual => node(T::Equal, &[NodeId::HeaderValue]),
        NodeId::HeaderValue => acting(T::Value, Action::AppendHeaderValue, AFTER_CLAUSE),

        NodeId::JsonKey => acting(T::Value, Action::AppendJsonKey, &[NodeId::JsonEqual]),
        NodeId::JsonEqual => node(T::Equal, &[NodeId::JsonValue]),
        NodeId::JsonValue => acting(T::Value, Action::AppendJsonValue, AFTER_CLAUSE),

        NodeId::Payload => node(T::Payload, &[NodeId::PayloadEqual]),
        NodeId::PayloadEqual => node(
            T::Equal,
            &[NodeId::PayloadPlaceholder, NodeId::PayloadValue],
        ),
        NodeId::PayloadPlaceholder => acting(T::Question, Action::SetPayloadFlag, AFTER_CLAUSE),
        NodeId::PayloadValue => acting(T::Value, Action::SetPayloadFlag, AFTER_CLAUSE),

        NodeId::With => node(T::With, OPTIONS),
        NodeId::Get => acting(T::Get, Action::SetMethod(Method::Get), AFTER_OPTION),
        NodeId::Post => acting(T::Post, Action::SetMethod(Method::Post), AFTER_OPTION),
        NodeId::Put => acting(T::Put, Action::SetMethod(Method::Put), AFTER_OPTION),
        NodeId::Patch => acting(T::Patch, Action::SetMethod(Method::Patch), AFTER_OPTION),
        NodeId::Delete => acting(T::Delete, Action::SetMethod(Method::Delete), AFTER_OPTION),

        NodeId::BasicAuth => node(T::BasicAuth, &[NodeId::BasicLogin]),
        NodeId::BasicLogin => acting(T::Value, Action::SetBasicLogin, &[NodeId::BasicComma]),
        NodeId::BasicComma => node(T::Comma, &[NodeId::BasicPassword]),
        NodeId::BasicPassword => acting(T::Value, Action::SetBasicPassword, AFTER_OPTION),

        NodeId::Timeout => node(T::Timeout, &[NodeId::TimeoutValue]),
        NodeId::TimeoutValue => acting(T::Value, Action::SetTimeoutLiteral, AFTER_OPTION),
    }
}
