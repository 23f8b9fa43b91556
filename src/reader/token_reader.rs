use super::grammar::{self, identifier_len, insignificant_len, is_insignificant};
use super::token::TokenKind;
use super::trace::TraceSink;
use crate::config::{ComposedKeys, ReaderConfig};
use crate::error::{Error, Result};

/// Maximum number of characters of remaining text quoted in errors
const PREVIEW_CHARS: usize = 32;

/// Pull-based reader over one expression of a syntax-tree dump
///
/// The caller drives a two-phase protocol: ask a `can_read_*` predicate,
/// branch on the answer, then call the paired `read_*` operation, which
/// removes exactly the matched prefix. Calling `read_*` while its predicate
/// is false is a caller defect and yields [`Error::ContractViolation`]
/// without consuming anything.
///
/// Spaces and newlines before a token are skipped lazily, at most once per
/// cursor position, the first time a predicate looks at it.
pub struct TokenReader {
    /// Full text of the expression
    source: String,
    /// Byte offset of the first unconsumed character
    pos: usize,
    /// Open groups consumed minus close groups consumed
    depth: i64,
    /// Whether insignificant characters at `pos` were already skipped
    trimmed: bool,
    /// Composed keys tried before the generic key rule
    keys: ComposedKeys,
    /// Receives a record of every consumed token
    sink: Option<Box<dyn TraceSink>>,
}

impl TokenReader {
    /// Creates a reader using the default composed-key table
    pub fn new(source: impl Into<String>) -> Self {
        Self::with_keys(source, ComposedKeys::default())
    }

    /// Creates a reader with an explicit composed-key table
    pub fn with_keys(source: impl Into<String>, keys: ComposedKeys) -> Self {
        TokenReader {
            source: source.into(),
            pos: 0,
            depth: 0,
            trimmed: false,
            keys,
            sink: None,
        }
    }

    /// Creates a reader whose key table comes from a configuration
    pub fn from_config(source: impl Into<String>, config: &ReaderConfig) -> Result<Self> {
        Ok(Self::with_keys(source, config.composed_keys_table()?))
    }

    /// Attaches a sink that is told about every consumed token
    pub fn with_trace_sink(mut self, sink: impl TraceSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Unconsumed text, including any whitespace not yet skipped
    pub fn remaining(&self) -> &str {
        &self.source[self.pos..]
    }

    /// Current group nesting depth
    pub fn depth(&self) -> i64 {
        self.depth
    }

    /// Byte offset of the cursor in the original text
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Line and column (both 1-indexed) of the cursor
    pub fn position(&self) -> (usize, usize) {
        let consumed = &self.source[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let line_start = consumed.rfind('\n').map_or(0, |idx| idx + 1);
        let column = consumed[line_start..].chars().count() + 1;
        (line, column)
    }

    /// Check if only insignificant whitespace is left
    pub fn is_empty(&self) -> bool {
        self.remaining().trim_start_matches(is_insignificant).is_empty()
    }

    /// Ends the expression, requiring an empty cursor and balanced groups
    pub fn finish(mut self) -> Result<()> {
        self.trim();
        if !self.remaining().is_empty() {
            return Err(Error::TrailingInput {
                offset: self.pos,
                found: self.preview(),
            });
        }
        if self.depth != 0 {
            return Err(Error::UnbalancedNesting { depth: self.depth });
        }
        Ok(())
    }

    /// Builds the error a caller reports when no predicate matches here
    pub fn no_recognized_token(&mut self) -> Error {
        self.trim();
        let (line, column) = self.position();
        Error::NoRecognizedToken {
            offset: self.pos,
            line,
            column,
            found: self.preview(),
        }
    }

    // ------------------------------------------------------------------
    // Lookahead predicates
    // ------------------------------------------------------------------

    /// Check if the next token is `(`
    pub fn can_read_open_paren(&mut self) -> bool {
        self.cursor().starts_with('(')
    }

    /// Check if the next token is `)`
    pub fn can_read_close_paren(&mut self) -> bool {
        self.cursor().starts_with(')')
    }

    /// Check if an identifier starts at the cursor
    pub fn can_read_identifier(&mut self) -> bool {
        self.matches(TokenKind::Identifier)
    }

    /// Check if a `"..."` string with at least one character starts at the cursor
    pub fn can_read_double_quoted_string(&mut self) -> bool {
        self.matches(TokenKind::DoubleQuotedString)
    }

    /// Check if a `'...'` string with at least one character starts at the cursor
    pub fn can_read_single_quoted_string(&mut self) -> bool {
        self.matches(TokenKind::SingleQuotedString)
    }

    /// Check if a `[...]` string with at least one character starts at the cursor
    pub fn can_read_bracketed_string(&mut self) -> bool {
        self.matches(TokenKind::BracketedString)
    }

    /// Check if an identifier or any kind of string starts at the cursor
    pub fn can_read_identifier_or_string(&mut self) -> bool {
        self.can_read_identifier()
            || self.can_read_double_quoted_string()
            || self.can_read_single_quoted_string()
            || self.can_read_bracketed_string()
    }

    /// Check if a composed key or a generic `name=` key starts at the cursor
    pub fn can_read_key(&mut self) -> bool {
        self.composed_key_len().is_some() || self.matches(TokenKind::Key)
    }

    /// Check if a `file:line:column` location starts at the cursor
    pub fn can_read_location(&mut self) -> bool {
        self.matches(TokenKind::Location)
    }

    /// Check if a `name@` declaration prefix starts at the cursor
    ///
    /// Only the prefix is looked at; [`read_declaration_location`] also
    /// requires a location after the `@`.
    ///
    /// [`read_declaration_location`]: TokenReader::read_declaration_location
    pub fn can_read_declaration_location(&mut self) -> bool {
        self.matches(TokenKind::DeclarationLocation)
    }

    // ------------------------------------------------------------------
    // Consume operations
    // ------------------------------------------------------------------

    /// Consumes `(` and enters a group
    pub fn read_open_paren(&mut self) -> Result<()> {
        if !self.can_read_open_paren() {
            return Err(self.violation(TokenKind::OpenParen));
        }
        self.advance(TokenKind::OpenParen, 1);
        self.depth += 1;
        Ok(())
    }

    /// Consumes `)` and leaves a group
    pub fn read_close_paren(&mut self) -> Result<()> {
        if !self.can_read_close_paren() {
            return Err(self.violation(TokenKind::CloseParen));
        }
        self.advance(TokenKind::CloseParen, 1);
        self.depth -= 1;
        if self.depth < 0 {
            tracing::warn!(
                target: "astdump::reader",
                depth = self.depth,
                offset = self.pos,
                "closed a group that was never opened"
            );
        }
        Ok(())
    }

    /// Consumes an identifier, keeping balanced `(...)` groups inside it
    ///
    /// Scanning stops at a space or newline, at the end of the text, or at a
    /// `)` with no matching `(` inside the identifier. That `)` is left for
    /// [`read_close_paren`](TokenReader::read_close_paren).
    pub fn read_identifier(&mut self) -> Result<String> {
        if !self.can_read_identifier() {
            return Err(self.violation(TokenKind::Identifier));
        }
        let len = identifier_len(self.remaining());
        let identifier = self.remaining()[..len].to_string();
        self.advance(TokenKind::Identifier, len);
        Ok(identifier)
    }

    /// Consumes whichever of group, string or identifier comes next
    ///
    /// Tried in order: `(` (consumed as an open group, returns an empty
    /// string), double-quoted, single-quoted and bracketed strings (returned
    /// without delimiters), then identifier (returned verbatim).
    pub fn read_identifier_or_string(&mut self) -> Result<String> {
        if self.can_read_open_paren() {
            self.read_open_paren()?;
            Ok(String::new())
        } else if self.can_read_double_quoted_string() {
            self.read_double_quoted_string()
        } else if self.can_read_single_quoted_string() {
            self.read_single_quoted_string()
        } else if self.can_read_bracketed_string() {
            self.read_bracketed_string()
        } else if self.can_read_identifier() {
            self.read_identifier()
        } else {
            Err(self.violation(TokenKind::IdentifierOrString))
        }
    }

    /// Consumes a key and its `=`, returning the key name
    ///
    /// Composed keys are tried first, in table order.
    pub fn read_key(&mut self) -> Result<String> {
        if let Some(len) = self.composed_key_len() {
            let key = self.remaining()[..len - 1].to_string();
            self.advance(TokenKind::Key, len);
            return Ok(key);
        }
        self.consume_rule(TokenKind::Key)
    }

    /// Consumes a `file:line:column` location and returns it unmodified
    pub fn read_location(&mut self) -> Result<String> {
        self.consume_rule(TokenKind::Location)
    }

    /// Consumes `name@file:line:column` and returns `name@file:line:column`
    ///
    /// Spaces and newlines between the `@` and the location are skipped and
    /// left out of the result. Nothing is consumed unless both the `name@`
    /// prefix and the location after it match.
    pub fn read_declaration_location(&mut self) -> Result<String> {
        let kind = TokenKind::DeclarationLocation;
        let text = self.cursor();
        let matched = pattern_len(kind, text).and_then(|prefix_len| {
            let start = prefix_len + insignificant_len(&text[prefix_len..]);
            pattern_len(TokenKind::Location, &text[start..]).map(|location_len| {
                let name = &text[..prefix_len - 1];
                let location = &text[start..start + location_len];
                (start + location_len, format!("{}@{}", name, location))
            })
        });

        let Some((len, declaration)) = matched else {
            return Err(self.violation(kind));
        };
        self.advance(kind, len);
        Ok(declaration)
    }

    /// Consumes `"text"` and returns `text`
    pub fn read_double_quoted_string(&mut self) -> Result<String> {
        self.consume_rule(TokenKind::DoubleQuotedString)
    }

    /// Consumes `'text'` and returns `text`
    pub fn read_single_quoted_string(&mut self) -> Result<String> {
        self.consume_rule(TokenKind::SingleQuotedString)
    }

    /// Consumes `[text]` and returns `text`
    pub fn read_bracketed_string(&mut self) -> Result<String> {
        self.consume_rule(TokenKind::BracketedString)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn trim(&mut self) {
        if !self.trimmed {
            self.pos += insignificant_len(&self.source[self.pos..]);
            self.trimmed = true;
        }
    }

    fn cursor(&mut self) -> &str {
        self.trim();
        &self.source[self.pos..]
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        grammar::rule(kind).is_some_and(|rule| rule.matches(self.cursor()))
    }

    fn composed_key_len(&mut self) -> Option<usize> {
        self.trim();
        self.keys
            .match_prefix(&self.source[self.pos..])
            .map(str::len)
    }

    fn consume_rule(&mut self, kind: TokenKind) -> Result<String> {
        let text = self.cursor();
        let matched = grammar::rule(kind).and_then(|rule| {
            rule.match_len(text)
                .map(|len| (len, rule.extract(&text[..len]).to_string()))
        });

        let Some((len, payload)) = matched else {
            return Err(self.violation(kind));
        };
        self.advance(kind, len);
        Ok(payload)
    }

    fn advance(&mut self, kind: TokenKind, len: usize) {
        let start = self.pos;
        self.pos += len;
        self.trimmed = false;

        let text = &self.source[start..self.pos];
        tracing::trace!(target: "astdump::reader", %kind, text, offset = start, "consumed");
        if let Some(sink) = self.sink.as_mut() {
            sink.record(kind, text);
        }
    }

    fn violation(&self, expected: TokenKind) -> Error {
        let (line, column) = self.position();
        tracing::debug!(
            target: "astdump::reader",
            %expected,
            offset = self.pos,
            "consume called without a matching token"
        );
        Error::ContractViolation {
            expected,
            offset: self.pos,
            line,
            column,
            found: self.preview(),
        }
    }

    fn preview(&self) -> String {
        self.remaining().chars().take(PREVIEW_CHARS).collect()
    }
}

impl std::fmt::Debug for TokenReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenReader")
            .field("remaining", &self.remaining())
            .field("pos", &self.pos)
            .field("depth", &self.depth)
            .field("trimmed", &self.trimmed)
            .field("keys", &self.keys)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

fn pattern_len(kind: TokenKind, text: &str) -> Option<usize> {
    grammar::rule(kind).and_then(|rule| rule.match_len(text))
}
