use tracing::{debug, trace};

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::token::{Span, Token, TokenKind};

/// Two-character operators, tried before their one-character prefixes.
const COMPOUND_OPERATORS: [(&str, TokenKind); 8] = [
    ("++", TokenKind::PlusPlus),
    ("--", TokenKind::MinusMinus),
    ("==", TokenKind::EqualEqual),
    ("!=", TokenKind::BangEqual),
    ("<=", TokenKind::LessEqual),
    (">=", TokenKind::GreaterEqual),
    ("&&", TokenKind::AndAnd),
    ("||", TokenKind::OrOr),
];

/// Tokenize a TyC source string into a sequence of tokens ending
/// in a single `Eof` token.
///
/// # Errors
///
/// Returns the first lexical `Diagnostic`: an unterminated string
/// or block comment, an illegal escape, or an illegal character.
pub fn tokenize(input: &str) -> Result<Vec<Token>, Diagnostic> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

/// Scan cursor over one source text. Tokens are produced on demand.
pub(crate) struct Lexer<'a> {
    source: &'a str,
    input: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub(crate) const fn new(source: &'a str) -> Self {
        Self {
            source,
            input: source.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Scan the next token. Returns `Eof` again once input is exhausted.
    pub(crate) fn next_token(&mut self) -> Result<Token, Diagnostic> {
        let token = self.scan().inspect_err(|err| {
            debug!(error = %err, "lexical error");
        })?;
        trace!(
            kind = %token.kind,
            lexeme = %token.lexeme,
            line = token.span.line,
            column = token.span.column,
            "token"
        );
        Ok(token)
    }

    fn scan(&mut self) -> Result<Token, Diagnostic> {
        self.skip_trivia()?;

        let Some(ch) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, "", self.span()));
        };

        match ch {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => Ok(self.read_word()),
            b'0'..=b'9' => Ok(self.read_number()),
            b'.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => Ok(self.read_number()),
            b'"' => self.read_string(),
            _ => self.read_operator(),
        }
    }

    const fn span(&self) -> Span {
        Span {
            offset: self.pos,
            line: self.line,
            column: self.col,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(&byte) = self.input.get(self.pos) {
            if byte == b'\n' {
                self.line += 1;
                self.col = 1;
            } else if byte & 0xC0 != 0x80 {
                // continuation bytes share the column of their lead byte
                self.col += 1;
            }
            self.pos += 1;
        }
    }

    fn advance_to(&mut self, end: usize) {
        while self.pos < end {
            self.advance();
        }
    }

    /// Character starting at the cursor, for diagnostics.
    fn current_char(&self) -> char {
        self.source[self.pos..]
            .chars()
            .next()
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    fn skip_trivia(&mut self) -> Result<(), Diagnostic> {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(b' ' | b'\t' | b'\r' | b'\n' | 0x0C), _) => self.advance(),
                (Some(b'/'), Some(b'/')) => {
                    while self.peek().is_some_and(|c| c != b'\n') {
                        self.advance();
                    }
                }
                (Some(b'/'), Some(b'*')) => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), Diagnostic> {
        let start = self.span();
        self.advance(); // skip /
        self.advance(); // skip *

        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(b'*'), Some(b'/')) => {
                    self.advance();
                    self.advance();
                    return Ok(());
                }
                (Some(_), _) => self.advance(),
                (None, _) => {
                    return Err(Diagnostic::new(DiagnosticKind::UnterminatedComment, start));
                }
            }
        }
    }

    fn read_word(&mut self) -> Token {
        let span = self.span();
        let start = self.pos;

        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.advance();
        }

        let text = &self.source[start..self.pos];
        let kind = TokenKind::keyword(text).unwrap_or(TokenKind::Identifier);
        Token::new(kind, text, span)
    }

    fn digits_end(&self, from: usize) -> usize {
        let mut end = from;
        while self.input.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        end
    }

    /// End of an exponent starting at `from`, if one is present there.
    fn exponent_end(&self, from: usize) -> Option<usize> {
        if !matches!(self.input.get(from), Some(b'e' | b'E')) {
            return None;
        }
        let mut digits = from + 1;
        if matches!(self.input.get(digits), Some(b'+' | b'-')) {
            digits += 1;
        }
        let end = self.digits_end(digits);
        (end > digits).then_some(end)
    }

    fn read_number(&mut self) -> Token {
        let span = self.span();
        let start = self.pos;

        let mut end = self.digits_end(start);
        let mut is_float = false;

        // Only one decimal point: `1.5.x` stops before the second dot.
        if self.input.get(end) == Some(&b'.') {
            end = self.digits_end(end + 1);
            is_float = true;
        }
        if let Some(exponent) = self.exponent_end(end) {
            end = exponent;
            is_float = true;
        }

        // A multi-digit integer may not start with zero: `01` is `0`, `1`.
        if !is_float && self.input[start] == b'0' {
            end = start + 1;
        }

        self.advance_to(end);
        let kind = if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntLiteral
        };
        Token::new(kind, &self.source[start..end], span)
    }

    fn read_string(&mut self) -> Result<Token, Diagnostic> {
        let span = self.span();
        self.advance(); // skip opening quote
        let start = self.pos;

        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    return Err(Diagnostic::new(DiagnosticKind::UnterminatedString, span));
                }
                Some(b'"') => break,
                Some(b'\\') => match self.peek_at(1) {
                    Some(b'n' | b't' | b'r' | b'b' | b'f' | b'\\' | b'"') => {
                        self.advance();
                        self.advance();
                    }
                    None => {
                        return Err(Diagnostic::new(DiagnosticKind::UnterminatedString, span));
                    }
                    Some(_) => {
                        let escape = self.span();
                        self.advance();
                        return Err(Diagnostic::new(
                            DiagnosticKind::IllegalEscape(self.current_char()),
                            escape,
                        ));
                    }
                },
                Some(_) => self.advance(),
            }
        }

        let text = &self.source[start..self.pos];
        self.advance(); // skip closing quote
        Ok(Token::new(TokenKind::StringLiteral, text, span))
    }

    fn read_operator(&mut self) -> Result<Token, Diagnostic> {
        let span = self.span();
        let rest = &self.source[self.pos..];

        if let Some(&(text, kind)) = COMPOUND_OPERATORS
            .iter()
            .find(|(text, _)| rest.starts_with(text))
        {
            self.advance_to(self.pos + text.len());
            return Ok(Token::new(kind, text, span));
        }

        let byte = self.input[self.pos];
        match TokenKind::punctuation(byte) {
            Some(kind) => {
                self.advance();
                Ok(Token::new(kind, char::from(byte).to_string(), span))
            }
            // lone `&` and `|` land here too
            None => Err(Diagnostic::new(
                DiagnosticKind::IllegalCharacter(self.current_char()),
                span,
            )),
        }
    }
}
