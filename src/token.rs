use std::fmt;

/// Source location for error reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    /// Byte offset into the source.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords.
    Auto,
    Break,
    Case,
    Continue,
    Default,
    Else,
    Float,
    For,
    If,
    Int,
    Return,
    String,
    Struct,
    Switch,
    Void,
    While,

    /// Identifier that is not a keyword.
    Identifier,
    /// `0` or a non-zero digit followed by digits.
    IntLiteral,
    /// Literal with a decimal point and/or an exponent.
    FloatLiteral,
    /// Double-quoted string; the lexeme excludes the quotes.
    StringLiteral,

    // Operators.
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    EqualEqual,
    BangEqual,
    AndAnd,
    OrOr,
    Bang,
    PlusPlus,
    MinusMinus,
    Assign,

    // Separators.
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Colon,
    Dot,

    /// End of input. Emitted exactly once.
    Eof,
}

/// Reserved words, matched only after a full identifier run.
pub const KEYWORDS: [(&str, TokenKind); 16] = [
    ("auto", TokenKind::Auto),
    ("break", TokenKind::Break),
    ("case", TokenKind::Case),
    ("continue", TokenKind::Continue),
    ("default", TokenKind::Default),
    ("else", TokenKind::Else),
    ("float", TokenKind::Float),
    ("for", TokenKind::For),
    ("if", TokenKind::If),
    ("int", TokenKind::Int),
    ("return", TokenKind::Return),
    ("string", TokenKind::String),
    ("struct", TokenKind::Struct),
    ("switch", TokenKind::Switch),
    ("void", TokenKind::Void),
    ("while", TokenKind::While),
];

impl TokenKind {
    /// Look up the keyword kind for an exact identifier text.
    #[must_use]
    pub fn keyword(text: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(word, _)| *word == text)
            .map(|&(_, kind)| kind)
    }

    /// Single-character operator or separator.
    #[must_use]
    pub const fn punctuation(byte: u8) -> Option<Self> {
        let kind = match byte {
            b'+' => Self::Plus,
            b'-' => Self::Minus,
            b'*' => Self::Star,
            b'/' => Self::Slash,
            b'%' => Self::Percent,
            b'<' => Self::Less,
            b'>' => Self::Greater,
            b'!' => Self::Bang,
            b'=' => Self::Assign,
            b'(' => Self::LParen,
            b')' => Self::RParen,
            b'{' => Self::LBrace,
            b'}' => Self::RBrace,
            b'[' => Self::LBracket,
            b']' => Self::RBracket,
            b';' => Self::Semicolon,
            b',' => Self::Comma,
            b':' => Self::Colon,
            b'.' => Self::Dot,
            _ => return None,
        };
        Some(kind)
    }

    /// Name used in token traces (`INT_LITERAL`, `SEMI`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::Break => "BREAK",
            Self::Case => "CASE",
            Self::Continue => "CONTINUE",
            Self::Default => "DEFAULT",
            Self::Else => "ELSE",
            Self::Float => "FLOAT",
            Self::For => "FOR",
            Self::If => "IF",
            Self::Int => "INT",
            Self::Return => "RETURN",
            Self::String => "STRING",
            Self::Struct => "STRUCT",
            Self::Switch => "SWITCH",
            Self::Void => "VOID",
            Self::While => "WHILE",
            Self::Identifier => "ID",
            Self::IntLiteral => "INT_LITERAL",
            Self::FloatLiteral => "FLOAT_LITERAL",
            Self::StringLiteral => "STRING_LITERAL",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Star => "MUL",
            Self::Slash => "DIV",
            Self::Percent => "MOD",
            Self::Less => "LT",
            Self::Greater => "GT",
            Self::LessEqual => "LE",
            Self::GreaterEqual => "GE",
            Self::EqualEqual => "EQUAL",
            Self::BangEqual => "NOTEQUAL",
            Self::AndAnd => "AND",
            Self::OrOr => "OR",
            Self::Bang => "BANG",
            Self::PlusPlus => "INC",
            Self::MinusMinus => "DEC",
            Self::Assign => "ASSIGN",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::LBrace => "LBRACE",
            Self::RBrace => "RBRACE",
            Self::LBracket => "LBRACK",
            Self::RBracket => "RBRACK",
            Self::Semicolon => "SEMI",
            Self::Comma => "COMMA",
            Self::Colon => "COLON",
            Self::Dot => "DOT",
            Self::Eof => "EOF",
        }
    }

    /// Fixed source text of keywords, operators and separators.
    #[must_use]
    pub const fn symbol(self) -> Option<&'static str> {
        let text = match self {
            Self::Auto => "auto",
            Self::Break => "break",
            Self::Case => "case",
            Self::Continue => "continue",
            Self::Default => "default",
            Self::Else => "else",
            Self::Float => "float",
            Self::For => "for",
            Self::If => "if",
            Self::Int => "int",
            Self::Return => "return",
            Self::String => "string",
            Self::Struct => "struct",
            Self::Switch => "switch",
            Self::Void => "void",
            Self::While => "while",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
            Self::Bang => "!",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::Assign => "=",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::Dot => ".",
            Self::Identifier
            | Self::IntLiteral
            | Self::FloatLiteral
            | Self::StringLiteral
            | Self::Eof => return None,
        };
        Some(text)
    }

    /// Human-readable description for diagnostics.
    #[must_use]
    pub fn describe(self) -> String {
        match self {
            Self::Identifier => "identifier".to_string(),
            Self::IntLiteral => "integer literal".to_string(),
            Self::FloatLiteral => "float literal".to_string(),
            Self::StringLiteral => "string literal".to_string(),
            Self::Eof => "end of input".to_string(),
            _ => self
                .symbol()
                .map_or_else(String::new, |text| format!("'{text}'")),
        }
    }

    /// `int`, `float`, `string` or `void`.
    #[must_use]
    pub const fn is_builtin_type(self) -> bool {
        matches!(self, Self::Int | Self::Float | Self::String | Self::Void)
    }

    /// Tokens that open a local declaration or an identifier-led
    /// expression statement.
    #[must_use]
    pub const fn starts_declaration(self) -> bool {
        matches!(self, Self::Auto | Self::Identifier) || self.is_builtin_type()
    }

    /// Tokens that can only open a statement, never a declaration.
    #[must_use]
    pub const fn starts_statement(self) -> bool {
        matches!(
            self,
            Self::If
                | Self::While
                | Self::For
                | Self::Switch
                | Self::Return
                | Self::Break
                | Self::Continue
                | Self::Case
                | Self::Default
                | Self::Semicolon
                | Self::LBrace
                | Self::LParen
                | Self::IntLiteral
                | Self::FloatLiteral
                | Self::StringLiteral
                | Self::Plus
                | Self::Minus
                | Self::Bang
                | Self::PlusPlus
                | Self::MinusMinus
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token with its kind, text, and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text; string literals drop their quotes but keep escapes.
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// How the token reads in a diagnostic, `None` at end of input.
    #[must_use]
    pub fn found(&self) -> Option<String> {
        match self.kind {
            TokenKind::Eof => None,
            TokenKind::StringLiteral => Some(format!("\"{}\"", self.lexeme)),
            _ => Some(self.lexeme.clone()),
        }
    }
}

/// Render tokens as the comma-joined `KIND,lexeme,...,EOF` trace.
#[must_use]
pub fn render_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| match token.kind {
            TokenKind::Eof => token.kind.name().to_string(),
            kind => format!("{},{}", kind.name(), token.lexeme),
        })
        .collect::<Vec<_>>()
        .join(",")
}
