use serde::{Deserialize, Serialize};

/// Every grammar rule the token reader can match
///
/// Used to name the expected rule in errors and to label records sent to a
/// trace sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Structure
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,

    // Literals
    /// Run of non-delimiter characters, possibly embedding balanced `(...)`
    Identifier,
    /// `"text"`
    DoubleQuotedString,
    /// `'text'`
    SingleQuotedString,
    /// `[text]`
    BracketedString,
    /// Any of identifier, double-, single-quoted or bracketed string
    IdentifierOrString,

    // Attributes
    /// `name=` or a composed key such as `interface type=`
    Key,
    /// `file:line:column`
    Location,
    /// `name@file:line:column`
    DeclarationLocation,
}

impl TokenKind {
    /// Human-readable name of the rule
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::OpenParen => "open parenthesis",
            TokenKind::CloseParen => "close parenthesis",
            TokenKind::Identifier => "identifier",
            TokenKind::DoubleQuotedString => "double-quoted string",
            TokenKind::SingleQuotedString => "single-quoted string",
            TokenKind::BracketedString => "bracketed string",
            TokenKind::IdentifierOrString => "identifier or string",
            TokenKind::Key => "key",
            TokenKind::Location => "location",
            TokenKind::DeclarationLocation => "declaration location",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
