//! # sqlreq — SQL-like queries for HTTP
//!
//! sqlreq compiles a small SQL-flavoured query into a description of an HTTP
//! request: URL, method, headers, JSON body, basic auth and timeout.
//!
//! ## Quick Example
//!
//! ```rust
//! use sqlreq::prelude::*;
//!
//! let req = sqlreq::compile(
//!     Mode::Body,
//!     "from https://api.example.com/users where name = %s and header x-team = core with post",
//!     &["bob".into()],
//! )
//! .unwrap();
//!
//! assert_eq!(req.method, Method::Post);
//! assert_eq!(req.json["name"], "bob");
//! assert_eq!(req.headers["x-team"], "core");
//! assert_eq!(req.timeout, 30);
//! ```
//!
//! ## Keywords
//!
//! | Keyword          | Meaning                                   |
//! |------------------|-------------------------------------------|
//! | `from`           | Target URL                                |
//! | `where` / `and`  | Start / chain clauses                     |
//! | `header k = v`   | Request header                            |
//! | `k = v`          | JSON body field                           |
//! | `payload = ?`    | Body comes from a non-string argument     |
//! | `with <verb>`    | `get`, `post`, `put`, `patch`, `delete`   |
//! | `with basicauth` | `basicauth login, password`               |
//! | `with timeout`   | Timeout in seconds                        |
//!
//! Queries are case-insensitive. Quote a value with `'...'` to use a
//! reserved word as a value.

pub mod binder;
pub mod config;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod parser;

pub mod prelude {
    pub use crate::binder::{Arg, Bound, bind};
    pub use crate::compile;
    pub use crate::config::Config;
    pub use crate::descriptor::{BasicAuth, Method, RequestDescriptor};
    pub use crate::engine::Client;
    pub use crate::error::*;
    pub use crate::parser::Mode;
}

use binder::{Arg, bind};
use descriptor::RequestDescriptor;
use error::SqlReqResult;
use parser::{Mode, Parser, tokens::tokenize};

/// Compile a query with its arguments into a request descriptor.
///
/// String arguments fill `%s` placeholders; the first other argument is
/// the payload for `payload = ?`.
///
/// # Example
///
/// ```
/// use sqlreq::{compile, parser::Mode};
///
/// let req = compile(Mode::Body, "from http://localhost with delete", &[]).unwrap();
/// assert_eq!(req.method.as_str(), "DELETE");
/// ```
pub fn compile(mode: Mode, query: &str, args: &[Arg]) -> SqlReqResult<RequestDescriptor> {
    let bound = bind(query, args)?;
    let fields = Parser::new(mode).parse(&tokenize(&bound.query))?;
    RequestDescriptor::build(fields, bound.payload)
}
