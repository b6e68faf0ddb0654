#![allow(dead_code)]

use tyc_syntax::{Diagnostic, DiagnosticKind, parse, render_tokens, tokenize};

/// Token trace of an input that must scan cleanly.
pub fn trace(input: &str) -> String {
    let tokens = tokenize(input).unwrap_or_else(|e| panic!("tokenize failed for {input:?}: {e}"));
    render_tokens(&tokens)
}

/// Lexical failure of an input that must not scan.
pub fn lex_error(input: &str) -> DiagnosticKind {
    match tokenize(input) {
        Ok(tokens) => panic!(
            "expected lexical error for {input:?}, got {}",
            render_tokens(&tokens)
        ),
        Err(err) => err.kind,
    }
}

pub fn accepts(input: &str) {
    if let Err(e) = parse(input) {
        panic!("expected {input:?} to parse, got: {e}");
    }
}

pub fn rejects(input: &str) -> Diagnostic {
    match parse(input) {
        Ok(program) => panic!("expected {input:?} to be rejected, got {program:?}"),
        Err(err) => err,
    }
}
