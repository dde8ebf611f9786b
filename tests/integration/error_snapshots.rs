//! Snapshot tests for error message formatting.
//!
//! Uses insta to pin the user-visible wording of every error kind.
//! Run `cargo insta review` to review changes.

use insta::assert_snapshot;
use quack_front::ast::eval::Evaluate;
use quack_front::ast::Node;
use quack_front::symtab::SymbolTable;

fn front_end_error(source: &str) -> String {
    quack_front::front_end(source, SymbolTable::new()).unwrap_err().to_string()
}

#[test]
fn missing_semicolon_error() {
    assert_snapshot!(front_end_error("x = 1"), @"Syntax error: expected ;, found end of file");
}

#[test]
fn unexpected_character_error() {
    assert_snapshot!(front_end_error("x = $;"), @"Syntax error: unexpected character '$'");
}

#[test]
fn unclosed_formals_error() {
    assert_snapshot!(
        front_end_error("class A() { def f( { } }"),
        @"Syntax error: expected identifier, found {"
    );
}

#[test]
fn duplicate_class_error() {
    assert_snapshot!(
        front_end_error("class Pair() { }\nclass Pair() { }"),
        @"Duplicate class: shadowing class 'Pair' is not permitted"
    );
}

#[test]
fn duplicate_method_error() {
    let source = r#"
class Pair(a: Int, b: Int) {
    def add(x: Int): Int { r = x; }
    def add(x: Int): Int { r = x; }
}
"#;
    assert_snapshot!(
        front_end_error(source),
        @"Duplicate method: redeclaration of method 'add' in class 'Pair' is not permitted"
    );
}

#[test]
fn unsupported_operation_error() {
    let cst = quack_front::parse_source("x = 1;").unwrap();
    let program = quack_front::build_ast(&cst).unwrap();
    let err = Node::Program(&program).r_eval().unwrap_err();
    assert_snapshot!(
        err.to_string(),
        @"Unsupported operation: r_eval not implemented for node type Program"
    );
}

#[test]
fn integer_out_of_range_error() {
    assert_snapshot!(
        front_end_error("x = 99999999999999999999;"),
        @"Syntax error: integer literal '99999999999999999999' out of range"
    );
}

#[test]
fn nesting_too_deep_error() {
    let source = format!("x = {}1{};", "(".repeat(500), ")".repeat(500));
    assert_snapshot!(front_end_error(&source), @"Syntax error: expression nested too deeply");
}
