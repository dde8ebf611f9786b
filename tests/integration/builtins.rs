//! Loading builtin signature tables and seeding the symbol table with them.

mod common;

use std::io::Write;

use quack_front::diagnostics::CompileError;
use quack_front::symtab::{self, SymbolTable};

const CUSTOM: &str = r#"{
    "Obj": {
        "super": null,
        "fields": [],
        "methods": { "$constructor": { "params": [], "ret": "Obj" } }
    },
    "Widget": {
        "super": "Obj",
        "methods": { "spin": { "params": ["Int"], "ret": "Nothing" } }
    }
}"#;

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn load_custom_table_from_file() {
    let file = write_temp(CUSTOM);
    let table = symtab::load_builtins(file.path()).unwrap();
    assert_eq!(table.len(), 2);
    let widget = table.get("Widget").unwrap();
    assert_eq!(widget.super_class.as_deref(), Some("Obj"));
    // Omitted fields default to empty.
    assert!(widget.fields.is_empty());
    assert_eq!(table.method("Widget", "spin").unwrap().params, vec!["Int"]);
}

#[test]
fn custom_seed_is_merged_into_result() {
    let file = write_temp(CUSTOM);
    let seed = symtab::load_builtins(file.path()).unwrap();
    let (_, table) = quack_front::front_end("class Gear() extends Widget { }", seed).unwrap();
    let names: Vec<_> = table.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["$Main", "Gear", "Obj", "Widget"]);
}

#[test]
fn custom_seed_rejects_redeclared_builtin() {
    let file = write_temp(CUSTOM);
    let seed = symtab::load_builtins(file.path()).unwrap();
    let err = quack_front::front_end("class Widget() { }", seed).unwrap_err();
    assert!(matches!(err, CompileError::DuplicateClass { ref name, .. } if name == "Widget"));
}

#[test]
fn missing_file_is_builtins_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = symtab::load_builtins(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, CompileError::Builtins { .. }));
    assert!(err.span().is_none());
}

#[test]
fn malformed_file_is_builtins_error() {
    let file = write_temp(r#"{ "Obj": { "super": null, "methods": { "f": { "params": 1 } } } }"#);
    let err = symtab::load_builtins(file.path()).unwrap_err();
    assert!(matches!(err, CompileError::Builtins { .. }));
}

#[test]
fn embedded_table_round_trips_through_json() {
    let table = symtab::builtins().unwrap();
    let reparsed: SymbolTable = serde_json::from_str(&table.to_json().unwrap()).unwrap();
    assert_eq!(reparsed, table);
}

#[test]
fn cli_accepts_builtins_override() {
    let file = write_temp(CUSTOM);
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("gear.qk");
    std::fs::write(&src, "class Gear() extends Widget { }").unwrap();

    let output = common::quackc()
        .arg(&src)
        .arg("--builtins")
        .arg(file.path())
        .args(["--emit", "symtab"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json.get("Widget").is_some());
    assert!(json.get("Int").is_none());
}
