//! Property-based tests for the token reader
//!
//! These tests use proptest to generate random inputs and verify that:
//! 1. A consume whose predicate is false fails and leaves the cursor alone
//! 2. A consume whose predicate is true removes exactly the token it returns
//! 3. Predicates are idempotent
//! 4. Driving the reader over arbitrary input never panics

use astdump::{TokenKind, TokenReader};
use proptest::prelude::*;

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

/// Generate random ASCII strings that might break the reader
fn arbitrary_source_string() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[\x00-\x7F]{0,200}").unwrap()
}

/// Generate strings made of dump-like fragments
fn dump_like_string() -> impl Strategy<Value = String> {
    prop::collection::vec(dump_token(), 0..40).prop_map(|tokens| tokens.join(" "))
}

/// Generate fragments that look like dump elements
fn dump_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("(".to_string()),
        Just(")".to_string()),
        Just("\n".to_string()),
        Just("interface type=".to_string()),
        "[a-z]{1,6}=".prop_map(|s| s),
        "[a-zA-Z_][a-zA-Z0-9_]{0,8}".prop_map(|s| s),
        "[A-Z][a-z]{0,5}\\([A-Z]\\)".prop_map(|s| s),
        "\"[a-z ]{0,8}\"".prop_map(|s| s),
        "'[a-z ]{0,8}'".prop_map(|s| s),
        "\\[[a-z ]{0,8}\\]".prop_map(|s| s),
        (1u32..500, 1u32..80).prop_map(|(l, c)| format!("file.c:{}:{}", l, c)),
        (1u32..500, 1u32..80).prop_map(|(l, c)| format!("T@file.c:{}:{}", l, c)),
    ]
}

// =============================================================================
// HELPERS
// =============================================================================

type Predicate = fn(&mut TokenReader) -> bool;
type Consume = fn(&mut TokenReader) -> astdump::Result<String>;

/// Pairs of (predicate, consume) for every rule that returns a payload
fn payload_rules() -> Vec<(TokenKind, Predicate, Consume)> {
    vec![
        (
            TokenKind::Identifier,
            TokenReader::can_read_identifier as Predicate,
            TokenReader::read_identifier as Consume,
        ),
        (
            TokenKind::DoubleQuotedString,
            TokenReader::can_read_double_quoted_string as Predicate,
            TokenReader::read_double_quoted_string as Consume,
        ),
        (
            TokenKind::SingleQuotedString,
            TokenReader::can_read_single_quoted_string as Predicate,
            TokenReader::read_single_quoted_string as Consume,
        ),
        (
            TokenKind::BracketedString,
            TokenReader::can_read_bracketed_string as Predicate,
            TokenReader::read_bracketed_string as Consume,
        ),
        (
            TokenKind::Key,
            TokenReader::can_read_key as Predicate,
            TokenReader::read_key as Consume,
        ),
        (
            TokenKind::Location,
            TokenReader::can_read_location as Predicate,
            TokenReader::read_location as Consume,
        ),
        (
            TokenKind::DeclarationLocation,
            TokenReader::can_read_declaration_location as Predicate,
            TokenReader::read_declaration_location as Consume,
        ),
    ]
}

/// Consume greedily until nothing matches; returns (opens, closes)
fn drain(reader: &mut TokenReader, source: &str) -> (i64, i64) {
    let mut opens = 0;
    let mut closes = 0;

    loop {
        let before = reader.offset();
        let progressed = if reader.can_read_open_paren() {
            opens += 1;
            reader.read_open_paren().is_ok()
        } else if reader.can_read_close_paren() {
            closes += 1;
            reader.read_close_paren().is_ok()
        } else {
            (reader.can_read_key() && reader.read_key().is_ok())
                || (reader.can_read_declaration_location()
                    && reader.read_declaration_location().is_ok())
                || (reader.can_read_identifier_or_string()
                    && reader.read_identifier_or_string().is_ok())
                || (reader.can_read_location() && reader.read_location().is_ok())
        };

        assert_eq!(reader.offset() + reader.remaining().len(), source.len());
        if !progressed {
            break;
        }
        assert!(reader.offset() > before, "consume made no progress");
    }

    (opens, closes)
}

// =============================================================================
// READER PROPERTIES
// =============================================================================

proptest! {
    /// A failed predicate means the consume errors and nothing moves
    #[test]
    fn false_predicate_consumes_nothing(source in dump_like_string()) {
        for (kind, can_read, read) in payload_rules() {
            let mut reader = TokenReader::new(source.clone());
            if !can_read(&mut reader) {
                let before = reader.remaining().to_string();
                let err = read(&mut reader).unwrap_err();
                prop_assert_eq!(err.expected_rule(), Some(kind));
                prop_assert_eq!(reader.remaining(), before.as_str());
            }
        }

        let mut reader = TokenReader::new(source.clone());
        if !reader.can_read_open_paren() {
            let before = reader.remaining().to_string();
            prop_assert!(reader.read_open_paren().is_err());
            prop_assert_eq!(reader.remaining(), before.as_str());
            prop_assert_eq!(reader.depth(), 0);
        }
    }

    /// Predicates give the same answer twice and skip whitespace once
    #[test]
    fn predicates_are_idempotent(source in dump_like_string()) {
        for (_, can_read, _) in payload_rules() {
            let mut reader = TokenReader::new(source.clone());
            let first = can_read(&mut reader);
            let offset = reader.offset();
            let second = can_read(&mut reader);
            prop_assert_eq!(first, second);
            prop_assert_eq!(reader.offset(), offset);
        }
    }

    /// Consumed length matches the token that came back
    #[test]
    fn consume_removes_exactly_the_token(source in dump_like_string()) {
        let mut reader = TokenReader::new(source.clone());
        if reader.can_read_location() {
            let before = reader.remaining().to_string();
            let location = reader.read_location().unwrap();
            prop_assert!(before.starts_with(&location));
            prop_assert_eq!(reader.remaining(), &before[location.len()..]);
        }

        let mut reader = TokenReader::new(source.clone());
        if reader.can_read_identifier() {
            let before = reader.remaining().to_string();
            let identifier = reader.read_identifier().unwrap();
            prop_assert!(!identifier.is_empty());
            prop_assert_eq!(reader.remaining(), &before[identifier.len()..]);
        }

        let mut reader = TokenReader::new(source.clone());
        if reader.can_read_double_quoted_string() {
            let before = reader.remaining().to_string();
            let text = reader.read_double_quoted_string().unwrap();
            prop_assert_eq!(reader.remaining(), &before[text.len() + 2..]);
        }

        let mut reader = TokenReader::new(source);
        if reader.can_read_key() {
            let before = reader.remaining().to_string();
            let key = reader.read_key().unwrap();
            let expected = format!("{}=", key);
            prop_assert!(before.starts_with(&expected));
            prop_assert_eq!(reader.remaining(), &before[key.len() + 1..]);
        }
    }

    /// Depth tracks consumed groups exactly
    #[test]
    fn depth_counts_groups(source in dump_like_string()) {
        let mut reader = TokenReader::new(source.clone());
        let (opens, closes) = drain(&mut reader, &source);
        prop_assert_eq!(reader.depth(), opens - closes);
    }

    /// The reader never panics on arbitrary input
    #[test]
    fn reader_never_panics(source in arbitrary_source_string()) {
        let mut reader = TokenReader::new(source.clone());
        drain(&mut reader, &source);
        let _ = reader.finish();
    }

    /// Deeply nested groups of identifiers read back balanced
    #[test]
    fn nested_groups_balance(depth in 1usize..100) {
        let source = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
        let mut reader = TokenReader::new(source.clone());
        let (opens, closes) = drain(&mut reader, &source);
        prop_assert_eq!(opens, depth as i64);
        prop_assert_eq!(closes, depth as i64);
        prop_assert!(reader.finish().is_ok());
    }
}
