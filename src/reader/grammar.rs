//! Grammar rules of the dump format
//!
//! Each rule pairs a pattern anchored at the cursor (the predicate) with an
//! extractor that turns the matched text into the token payload. Identifiers
//! are the one rule whose consumed length is not the pattern's match: they
//! are scanned by [`identifier_len`] so that balanced `(...)` groups stay
//! inside the identifier.

use super::token::TokenKind;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r#"^[^\s()"']+"#).expect("identifier pattern");
    static ref DOUBLE_QUOTED: Regex = Regex::new(r#"^"[^"]+""#).expect("double-quoted pattern");
    static ref SINGLE_QUOTED: Regex = Regex::new(r"^'[^']+'").expect("single-quoted pattern");
    static ref BRACKETED: Regex = Regex::new(r"^\[[^\]]+\]").expect("bracketed pattern");
    static ref KEY: Regex = Regex::new(r#"^[^\s()"'=]+="#).expect("key pattern");
    // Lazy prefix: the location ends at the first `:line:col` that follows.
    static ref LOCATION: Regex = Regex::new(r"^[^:()]*?:[0-9]+:[0-9]+").expect("location pattern");
    static ref DECLARATION: Regex = Regex::new(r"^[^(][^@\s]*?@").expect("declaration pattern");

    static ref RULES: Vec<Rule> = vec![
        Rule::new(TokenKind::Identifier, &IDENTIFIER, verbatim),
        Rule::new(TokenKind::DoubleQuotedString, &DOUBLE_QUOTED, unwrap_delimited),
        Rule::new(TokenKind::SingleQuotedString, &SINGLE_QUOTED, unwrap_delimited),
        Rule::new(TokenKind::BracketedString, &BRACKETED, unwrap_delimited),
        Rule::new(TokenKind::Key, &KEY, strip_terminator),
        Rule::new(TokenKind::Location, &LOCATION, verbatim),
        Rule::new(TokenKind::DeclarationLocation, &DECLARATION, strip_terminator),
    ];
}

/// A (predicate, extractor) pair over the cursor text
pub(crate) struct Rule {
    /// Rule identity
    pub kind: TokenKind,
    /// Pattern anchored at the start of the text
    pattern: &'static Regex,
    /// Payload extractor applied to the matched text
    extract: fn(&str) -> &str,
}

impl Rule {
    fn new(kind: TokenKind, pattern: &'static Regex, extract: fn(&str) -> &str) -> Self {
        Rule {
            kind,
            pattern,
            extract,
        }
    }

    /// Length in bytes of the prefix of `text` this rule matches
    pub fn match_len(&self, text: &str) -> Option<usize> {
        self.pattern.find(text).map(|m| m.end())
    }

    /// Check if the rule matches at the start of `text`
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Payload carried by the matched text
    pub fn extract<'a>(&self, matched: &'a str) -> &'a str {
        (self.extract)(matched)
    }
}

/// Look up the rule for a token kind
///
/// Structural tokens and the composite identifier-or-string rule have no
/// pattern of their own.
pub(crate) fn rule(kind: TokenKind) -> Option<&'static Rule> {
    RULES.iter().find(|rule| rule.kind == kind)
}

/// Characters skipped before every token
pub(crate) fn is_insignificant(c: char) -> bool {
    c == ' ' || c == '\n'
}

/// Length in bytes of the leading run of insignificant characters
pub(crate) fn insignificant_len(text: &str) -> usize {
    text.len() - text.trim_start_matches(is_insignificant).len()
}

/// Length in bytes of the identifier at the start of `text`
///
/// `(` nests and `)` un-nests. A `)` that would close a group opened before
/// the identifier started ends it, as does a space or newline at any depth.
/// The balance is local to this scan and unrelated to the reader's depth.
pub(crate) fn identifier_len(text: &str) -> usize {
    let mut balance: usize = 0;

    for (idx, c) in text.char_indices() {
        match c {
            ' ' | '\n' => return idx,
            '(' => balance += 1,
            ')' => {
                if balance == 0 {
                    return idx;
                }
                balance -= 1;
            }
            _ => {}
        }
    }

    text.len()
}

fn verbatim(matched: &str) -> &str {
    matched
}

// Delimiters are ASCII, so slicing one byte off each end stays on char boundaries.
fn unwrap_delimited(matched: &str) -> &str {
    &matched[1..matched.len() - 1]
}

fn strip_terminator(matched: &str) -> &str {
    &matched[..matched.len() - 1]
}
