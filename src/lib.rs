pub mod span;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod ast;
pub mod builder;
pub mod visit;
pub mod pretty;
pub mod symtab;

use ast::Program;
use diagnostics::CompileError;
use parser::cst::Cst;
use symtab::SymbolTable;

pub use symtab::build_symbol_table;

/// Lex and parse source text into a concrete parse tree.
pub fn parse_source(source: &str) -> Result<Cst, CompileError> {
    let tokens = lexer::lex(source)?;
    let mut parser = parser::Parser::new(&tokens, source);
    parser.parse_program()
}

/// Reduce a concrete parse tree to the AST.
pub fn build_ast(cst: &Cst) -> Result<Program, CompileError> {
    builder::AstBuilder::new().transform(cst)
}

/// Run the whole front end (lex → parse → build AST → symbol table), seeding
/// the symbol table with `seed`.
pub fn front_end(source: &str, seed: SymbolTable) -> Result<(Program, SymbolTable), CompileError> {
    let cst = parse_source(source)?;
    let program = build_ast(&cst)?;
    let table = build_symbol_table(&program, seed)?;
    Ok((program, table))
}
