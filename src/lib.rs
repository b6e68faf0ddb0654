//! Lexer and recursive-descent recognizer for the TyC language.
//!
//! TyC is a small C-like language: structs, functions, `auto` local
//! inference, and the usual statements and operators. This crate
//! decides whether a source text is a well-formed program and, when
//! it is not, reports the first lexical or syntax error with its
//! position.
//!
//! # Quick start
//!
//! ## Tokenize
//!
//! ```
//! use tyc_syntax::{render_tokens, tokenize};
//!
//! let tokens = tokenize("x = 1.5e3;").unwrap();
//! assert_eq!(
//!     render_tokens(&tokens),
//!     "ID,x,ASSIGN,=,FLOAT_LITERAL,1.5e3,SEMI,;,EOF"
//! );
//! ```
//!
//! ## Parse
//!
//! ```
//! use tyc_syntax::{Construct, DiagnosticKind, parse};
//!
//! let program = parse("void main() { int x = 10; }").unwrap();
//! assert_eq!(program.functions().count(), 1);
//!
//! let err = parse("int x = 10;").unwrap_err();
//! assert_eq!(
//!     err.kind,
//!     DiagnosticKind::IllegalConstruct(Construct::GlobalVariable)
//! );
//! assert_eq!(
//!     err.to_string(),
//!     "variable declarations are not allowed at global scope at line 1, column 1"
//! );
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod diagnostic;
pub mod lexer;
pub mod parser;
pub mod stream;
pub mod token;

pub use ast::{
    BinaryOp, Block, BlockItem, CaseLabel, Expr, ForInit, FuncDecl, Item, Member, Param,
    PostfixOp, Program, Stmt, StructDecl, SwitchCase, Type, UnaryOp, VarDecl,
};
pub use diagnostic::{Construct, Diagnostic, DiagnosticKind, ListKind};
pub use lexer::tokenize;
pub use parser::{parse, validate};
pub use stream::TokenStream;
pub use token::{KEYWORDS, Span, Token, TokenKind, render_tokens};
