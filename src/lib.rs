//! # astdump - Token Reader for Syntax-Tree Dumps
//!
//! Compiler front ends can print the abstract syntax tree of a program as a
//! parenthesized, whitespace-delimited text dump. `astdump` segments such a
//! dump into typed tokens that a tree builder pulls one at a time.
//!
//! ## Quick Start
//!
//! Every token kind comes with a lookahead predicate (`can_read_*`) and a
//! consume operation (`read_*`). The caller checks, branches, then consumes:
//!
//! ```rust
//! use astdump::{Result, TokenReader};
//!
//! # fn main() -> Result<()> {
//! let mut reader = TokenReader::new(r#"(foo "bar")"#);
//!
//! reader.read_open_paren()?;
//! assert_eq!(reader.depth(), 1);
//!
//! let mut items = Vec::new();
//! while !reader.can_read_close_paren() {
//!     if reader.can_read_double_quoted_string() {
//!         items.push(reader.read_double_quoted_string()?);
//!     } else if reader.can_read_identifier() {
//!         items.push(reader.read_identifier()?);
//!     } else {
//!         return Err(reader.no_recognized_token());
//!     }
//! }
//! reader.read_close_paren()?;
//!
//! assert_eq!(items, vec!["foo", "bar"]);
//! reader.finish()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Token Grammar
//!
//! | Token | Pattern |
//! |---|---|
//! | Group | `(` / `)` |
//! | Identifier | run without whitespace, `(`, `)`, `"`, `'`; may embed balanced `(...)` |
//! | Strings | `"text"`, `'text'`, `[text]` (no escapes, at least one character) |
//! | Key | composed key from the table, or `name=` |
//! | Location | `file:line:column` |
//! | Declaration location | `name@file:line:column` |
//!
//! Spaces and newlines between tokens are insignificant.
//!
//! ## Composed Keys
//!
//! Some keys in a dump contain a space, e.g. `interface type=`. They are
//! listed in a [`ComposedKeys`] table and always win over the generic
//! `name=` rule:
//!
//! ```rust
//! use astdump::{ComposedKeys, ReaderConfig, TokenReader};
//!
//! # fn main() -> astdump::Result<()> {
//! let config = ReaderConfig::from_json(r#"{"composed_keys": ["base type="]}"#)?;
//! let mut reader = TokenReader::from_config("base type=Int", &config)?;
//! assert_eq!(reader.read_key()?, "base type");
//! assert_eq!(reader.read_identifier()?, "Int");
//!
//! let mut reader = TokenReader::with_keys("interface type=Foo", ComposedKeys::default());
//! assert_eq!(reader.read_key()?, "interface type");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Consuming a token whose predicate is false is a defect in the caller. It
//! is reported as [`Error::ContractViolation`] naming the expected rule and
//! the cursor position, and nothing is consumed:
//!
//! ```rust
//! use astdump::{Error, ErrorSeverity, TokenKind, TokenReader};
//!
//! let mut reader = TokenReader::new("foo bar");
//! let err = reader.read_location().unwrap_err();
//!
//! assert_eq!(err.expected_rule(), Some(TokenKind::Location));
//! assert_eq!(err.classify(), ErrorSeverity::Fatal);
//! assert_eq!(reader.remaining(), "foo bar");
//! ```
//!
//! ## Diagnostics
//!
//! Consumed tokens are logged through `tracing` at trace level on target
//! `astdump::reader`. A [`TraceSink`] attached with
//! [`TokenReader::with_trace_sink`] additionally receives each token kind and
//! its matched text.

/// Version of the astdump crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod error;
pub mod reader;

// Re-export main types
pub use config::{ComposedKeys, ReaderConfig, DEFAULT_COMPOSED_KEYS};
pub use error::{Error, ErrorSeverity, Result};
pub use reader::{TokenKind, TokenReader, TraceSink, TracingSink};
