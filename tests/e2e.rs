//! End-to-end conformance scenarios: whole programs through
//! `tokenize` and `parse`.

mod common;

use common::{accepts, rejects, trace};
use tyc_syntax::{
    BlockItem, CaseLabel, Construct, DiagnosticKind, Expr, Item, Stmt, TokenKind, Type, parse,
    tokenize, validate,
};

// -----------------------------------------------------------
// Scenarios.
// -----------------------------------------------------------

#[test]
fn global_assignment_fails() {
    let err = rejects("int x = 10;");
    assert_eq!(
        err.kind,
        DiagnosticKind::IllegalConstruct(Construct::GlobalVariable)
    );
}

#[test]
fn same_declaration_inside_function_succeeds() {
    accepts("void main() { int x = 10; }");
}

#[test]
fn struct_missing_semicolon_fails() {
    let err = rejects("struct S { int x }");
    assert_eq!(
        err.kind,
        DiagnosticKind::MissingToken {
            expected: TokenKind::Semicolon,
            found: Some("}".to_string()),
        }
    );
    assert_eq!((err.span.line, err.span.column), (1, 18));
}

#[test]
fn dot_float_forms() {
    assert_eq!(trace("0. .0"), "FLOAT_LITERAL,0.,FLOAT_LITERAL,.0,EOF");
}

#[test]
fn lone_illegal_character() {
    let err = tokenize("@").expect_err("should fail");
    assert_eq!(err.kind, DiagnosticKind::IllegalCharacter('@'));
    assert_eq!((err.span.line, err.span.column), (1, 1));
}

#[test]
fn stacked_case_labels() {
    accepts("void f() { switch(x) { case 1: case 2: break; } }");
}

#[test]
fn dangling_else_binds_to_inner_if() {
    let program = parse("void f() { if(a) if(b) c=1; else d=1; }").expect("parse");
    let Item::Function(func) = &program.items[0] else {
        panic!("expected function");
    };
    let BlockItem::Stmt(Stmt::If {
        then_branch,
        else_branch: outer_else,
        ..
    }) = &func.body.items[0]
    else {
        panic!("expected if");
    };
    assert!(outer_else.is_none());
    let Stmt::If {
        condition,
        else_branch: Some(inner_else),
        ..
    } = then_branch.as_ref()
    else {
        panic!("expected inner if with else");
    };
    assert_eq!(condition, &Expr::Ident("b".to_string()));
    assert!(matches!(inner_else.as_ref(), Stmt::Expr(Expr::Assign { .. })));
}

// -----------------------------------------------------------
// Whole programs.
// -----------------------------------------------------------

const INVENTORY: &str = r#"
// Inventory bookkeeping.
struct Item {
    string name;
    int count;
    float price;
};

struct Stock {
    Item item;
    Stock next;
};

float total(Stock head) {
    auto sum = 0.0;
    for (Stock s = head; s.item.count > 0; s = s.next) {
        sum = sum + s.item.price * s.item.count;
    }
    return sum;
}

/* Classify a count. */
string label(int count) {
    switch (count) {
        case 0:
            return "empty";
        case 1:
        case 2:
            return "low";
        default:
            if (count > 100) return "bulk"; else return "ok";
    }
}

main() {
    Item apple = {"apple", 3, 1.25e0};
    Stock s = {apple, {}};
    int i = 0;
    while (i < 10 && !done(s)) {
        i++;
        if (i % 2 == 0) continue;
        print(label(s.item.count), "\t\"tab\"\n");
    }
    return;
}
"#;

#[test]
fn inventory_program_parses() {
    let program = parse(INVENTORY).expect("parse");
    assert_eq!(program.structs().count(), 2);
    let names: Vec<_> = program.functions().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["total", "label", "main"]);

    let main = program.functions().last().expect("main");
    assert_eq!(main.return_type, None);

    let label = program.functions().nth(1).expect("label");
    assert_eq!(label.return_type, Some(Type::String));
    let BlockItem::Stmt(Stmt::Switch { cases, .. }) = &label.body.items[0] else {
        panic!("expected switch");
    };
    assert_eq!(cases.len(), 4);
    assert!(matches!(cases[0].label, CaseLabel::Case(_)));
    assert_eq!(cases[3].label, CaseLabel::Default);
    assert!(cases[1].body.is_empty());
    assert_eq!(cases[2].body.len(), 1);
}

#[test]
fn inventory_program_tokens_end_in_eof() {
    let tokens = tokenize(INVENTORY).expect("tokenize");
    let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
    assert_eq!(eofs, 1);
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
}

#[test]
fn error_positions_are_reported_on_later_lines() {
    let source = "void f() {\n    int a = 1;\n    a = a + ;\n}\n";
    let err = rejects(source);
    assert_eq!((err.span.line, err.span.column), (3, 13));
    assert_eq!(
        err.to_string(),
        "expected expression, got ';' at line 3, column 13"
    );
}

#[test]
fn validate_matches_parse() {
    assert!(validate(INVENTORY).is_ok());
    assert_eq!(
        validate("void f() { void g() {} }").unwrap_err().kind,
        DiagnosticKind::IllegalConstruct(Construct::NestedFunction)
    );
}

#[test]
fn first_error_only() {
    // two independent errors: only the earlier one is reported
    let err = rejects("void f() { 5 = x; }\nint y = @;");
    assert_eq!(
        err.kind,
        DiagnosticKind::IllegalConstruct(Construct::InvalidAssignmentTarget)
    );
}

#[test]
fn independent_parses_share_no_state() {
    rejects("void f() { if (");
    accepts("void f() {}");
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let source = format!("void f{i}() {{ int x = {i}; }}");
                parse(&source).is_ok()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().expect("thread"));
    }
}
