#![allow(dead_code)]

use std::process::Command;

use quack_front::ast::Program;
use quack_front::symtab::{self, SymbolTable};

pub fn quackc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_quackc"))
}

/// Parse and build the AST, panicking on any front-end error.
pub fn program(source: &str) -> Program {
    let cst = quack_front::parse_source(source).unwrap();
    quack_front::build_ast(&cst).unwrap()
}

/// Run the whole front end with the embedded builtins as seed.
pub fn symbol_table(source: &str) -> SymbolTable {
    let (_, table) = quack_front::front_end(source, symtab::builtins().unwrap()).unwrap();
    table
}
