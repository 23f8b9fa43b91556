//! Optional diagnostic sink for consumed tokens

use super::token::TokenKind;

/// Receives a record of every token the reader consumes
///
/// Any `FnMut(TokenKind, &str)` closure is a sink.
pub trait TraceSink {
    /// Called once per successful consume with the token kind and matched text
    fn record(&mut self, kind: TokenKind, text: &str);
}

impl<F> TraceSink for F
where
    F: FnMut(TokenKind, &str),
{
    fn record(&mut self, kind: TokenKind, text: &str) {
        self(kind, text)
    }
}

/// Sink that forwards records to `tracing` at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&mut self, kind: TokenKind, text: &str) {
        tracing::debug!(target: "astdump::trace", %kind, text, "read token");
    }
}
