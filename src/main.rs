use std::io::Read;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use quack_front::diagnostics::{render_error, CompileError};
use quack_front::symtab::{self, SymbolTable};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quackc", version, about = "Quack front end: parse tree, AST and symbol table")]
struct Cli {
    /// Source file path. Reads stdin if omitted
    source: Option<PathBuf>,

    /// JSON file of builtin class signatures, replacing the embedded table
    #[arg(long)]
    builtins: Option<PathBuf>,

    /// What to print to stdout
    #[arg(long, value_enum, default_value_t = Emit::All)]
    emit: Emit,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Concrete parse tree
    Cst,
    /// Pretty-printed AST
    Ast,
    /// Symbol table as JSON
    Symtab,
    /// All of the above
    All,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => None,
        1 => Some(LevelFilter::DEBUG),
        _ => Some(LevelFilter::TRACE),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);
    match level {
        Some(level) => builder.with_max_level(level).init(),
        None => builder.init(),
    }
}

fn read_source(path: Option<&PathBuf>) -> Result<(String, String), String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map(|text| (text, path.display().to_string()))
            .map_err(|e| format!("cannot read {}: {e}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("cannot read stdin: {e}"))?;
            Ok((text, "<stdin>".to_string()))
        }
    }
}

fn run(cli: &Cli, source: &str) -> Result<(), CompileError> {
    let seed: SymbolTable = match &cli.builtins {
        Some(path) => symtab::load_builtins(path)?,
        None => symtab::builtins()?,
    };

    let cst = quack_front::parse_source(source)?;
    if matches!(cli.emit, Emit::Cst | Emit::All) {
        println!("{}", cst.pretty("  "));
    }

    let program = quack_front::build_ast(&cst)?;
    if matches!(cli.emit, Emit::Ast | Emit::All) {
        println!("{program}");
    }

    let table = quack_front::build_symbol_table(&program, seed)?;
    if matches!(cli.emit, Emit::Symtab | Emit::All) {
        let json = table
            .to_json()
            .map_err(|e| CompileError::builtins(format!("cannot serialize symbol table: {e}")))?;
        println!("{json}");
    }
    tracing::debug!(classes = program.classes.len(), "front end finished");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (source, filename) = match read_source(cli.source.as_ref()) {
        Ok(pair) => pair,
        Err(msg) => {
            eprintln!("error: {msg}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&cli, &source) {
        render_error(&source, &filename, &err);
        std::process::exit(1);
    }
}
