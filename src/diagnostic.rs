use std::fmt;

use crate::token::{Span, TokenKind};

/// Comma-separated list in which a trailing comma was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Parameters,
    Arguments,
    StructLiteral,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameters => write!(f, "parameter list"),
            Self::Arguments => write!(f, "argument list"),
            Self::StructLiteral => write!(f, "struct literal"),
        }
    }
}

/// Structurally well-formed input that the language forbids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    /// Variable declaration at global scope.
    GlobalVariable,
    /// Expression or statement at global scope.
    GlobalStatement,
    /// Function declaration inside a block.
    NestedFunction,
    /// `auto` as a function return type.
    AutoReturnType,
    /// `auto` as a struct member type.
    AutoMember,
    /// `void` as a struct member type.
    VoidMember,
    /// `auto` as a parameter type.
    AutoParameter,
    /// `void` as a parameter type.
    VoidParameter,
    /// Parameter written without a type.
    UntypedParameter,
    /// `void` as a local variable type.
    VoidVariable,
    /// Left side of `=` is not an identifier access chain.
    InvalidAssignmentTarget,
    /// `=` inside a `case` label.
    AssignmentInCaseLabel,
    /// `case` or `default` outside a `switch` body.
    CaseOutsideSwitch,
    TrailingComma(ListKind),
    /// Statements or expressions nested past the recognizer's limit.
    NestingTooDeep,
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GlobalVariable => {
                write!(f, "variable declarations are not allowed at global scope")
            }
            Self::GlobalStatement => {
                write!(f, "statements are not allowed at global scope")
            }
            Self::NestedFunction => {
                write!(f, "functions cannot be declared inside a block")
            }
            Self::AutoReturnType => write!(f, "'auto' is not a valid return type"),
            Self::AutoMember => write!(f, "'auto' is not a valid member type"),
            Self::VoidMember => write!(f, "'void' is not a valid member type"),
            Self::AutoParameter => write!(f, "'auto' is not a valid parameter type"),
            Self::VoidParameter => write!(f, "'void' is not a valid parameter type"),
            Self::UntypedParameter => write!(f, "parameter is missing a type"),
            Self::VoidVariable => write!(f, "'void' is not a valid variable type"),
            Self::InvalidAssignmentTarget => write!(f, "invalid assignment target"),
            Self::AssignmentInCaseLabel => {
                write!(f, "assignment is not allowed in a case label")
            }
            Self::CaseOutsideSwitch => {
                write!(f, "case label outside of a switch statement")
            }
            Self::TrailingComma(list) => write!(f, "trailing comma in {list}"),
            Self::NestingTooDeep => write!(f, "nesting is too deep"),
        }
    }
}

/// Classifies a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// String literal not closed before a line feed or end of input.
    UnterminatedString,
    /// Block comment not closed before end of input.
    UnterminatedComment,
    /// Backslash followed by a character outside `n t r b f \ "`.
    IllegalEscape(char),
    /// Character that cannot start any token.
    IllegalCharacter(char),
    /// Lookahead matches no alternative of the active rule.
    UnexpectedToken {
        expected: &'static str,
        found: Option<String>,
    },
    /// A required terminal is absent.
    MissingToken {
        expected: TokenKind,
        found: Option<String>,
    },
    IllegalConstruct(Construct),
}

impl DiagnosticKind {
    /// Raised by the scanner rather than the recognizer.
    #[must_use]
    pub const fn is_lexical(&self) -> bool {
        matches!(
            self,
            Self::UnterminatedString
                | Self::UnterminatedComment
                | Self::IllegalEscape(_)
                | Self::IllegalCharacter(_)
        )
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => write!(f, "unterminated string literal"),
            Self::UnterminatedComment => write!(f, "unterminated block comment"),
            Self::IllegalEscape(ch) => match control_name(*ch) {
                Some(name) => write!(f, "illegal escape sequence: backslash before {name}"),
                None if ch.is_control() => write!(
                    f,
                    "illegal escape sequence: backslash before U+{:04X}",
                    u32::from(*ch)
                ),
                None => write!(f, "illegal escape sequence: \\{ch}"),
            },
            Self::IllegalCharacter(ch) => {
                write!(f, "illegal character: {}", ch.escape_default())
            }
            Self::UnexpectedToken {
                expected,
                found: None,
            } => write!(f, "expected {expected}, got end of input"),
            Self::UnexpectedToken {
                expected,
                found: Some(t),
            } => write!(f, "expected {expected}, got '{t}'"),
            Self::MissingToken {
                expected,
                found: None,
            } => write!(f, "missing {}, got end of input", expected.describe()),
            Self::MissingToken {
                expected,
                found: Some(t),
            } => write!(f, "missing {}, got '{t}'", expected.describe()),
            Self::IllegalConstruct(construct) => write!(f, "{construct}"),
        }
    }
}

const fn control_name(ch: char) -> Option<&'static str> {
    match ch {
        '\n' => Some("line feed"),
        '\r' => Some("carriage return"),
        '\t' => Some("tab"),
        '\u{c}' => Some("form feed"),
        _ => None,
    }
}

/// First failure of a scan or parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub span: Span,
}

impl Diagnostic {
    #[must_use]
    pub const fn new(kind: DiagnosticKind, span: Span) -> Self {
        Self { kind, span }
    }

    #[must_use]
    pub const fn illegal(construct: Construct, span: Span) -> Self {
        Self::new(DiagnosticKind::IllegalConstruct(construct), span)
    }

    /// Message without the position suffix.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    #[must_use]
    pub const fn is_lexical(&self) -> bool {
        self.kind.is_lexical()
    }
}
