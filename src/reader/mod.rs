//! Token reader for syntax-tree dumps
//!
//! Segments the parenthesized text dump of a syntax tree into tokens, one
//! pull at a time, on behalf of a tree builder.

mod grammar;
mod token;
mod token_reader;
mod trace;

pub use token::TokenKind;
pub use token_reader::TokenReader;
pub use trace::{TraceSink, TracingSink};
