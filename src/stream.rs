//! Pull-based token stream with one token of lookahead.

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Token stream feeding the recognizer.
///
/// Holds exactly one scanned token ahead of the parser. Lexical
/// failures surface from whichever call pulls the offending token.
pub struct TokenStream<'src> {
    lexer: Lexer<'src>,
    current: Token,
}

impl<'src> TokenStream<'src> {
    /// Create a stream and scan its first token.
    ///
    /// # Errors
    ///
    /// Returns a lexical `Diagnostic` if the first token is malformed.
    pub fn new(source: &'src str) -> Result<Self, Diagnostic> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Current lookahead token.
    #[must_use]
    pub const fn peek(&self) -> &Token {
        &self.current
    }

    #[must_use]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    #[must_use]
    pub fn at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Consume the current token and scan the next one.
    ///
    /// # Errors
    ///
    /// Returns a lexical `Diagnostic` if the next token is malformed.
    pub fn advance(&mut self) -> Result<Token, Diagnostic> {
        if self.at_end() {
            return Ok(self.current.clone());
        }
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// Consume the current token if it has the given kind.
    ///
    /// # Errors
    ///
    /// Returns a lexical `Diagnostic` from scanning the next token.
    pub fn eat(&mut self, kind: TokenKind) -> Result<bool, Diagnostic> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume a required terminal.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` when the lookahead has a different kind.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, Diagnostic> {
        if self.check(kind) {
            return self.advance();
        }
        Err(Diagnostic::new(
            DiagnosticKind::MissingToken {
                expected: kind,
                found: self.current.found(),
            },
            self.current.span,
        ))
    }
}
