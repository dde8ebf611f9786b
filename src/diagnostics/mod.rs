use crate::ast::NodeKind;
use crate::span::Span;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Syntax error: {msg}")]
    Syntax { msg: String, span: Span },

    #[error("Duplicate class: shadowing class '{name}' is not permitted")]
    DuplicateClass { name: String, span: Span },

    #[error("Duplicate method: redeclaration of method '{method}' in class '{class}' is not permitted")]
    DuplicateMethod { class: String, method: String, span: Span },

    #[error("Unsupported operation: {op} not implemented for node type {kind}")]
    UnsupportedOperation { kind: NodeKind, op: &'static str },

    #[error("Builtins error: {msg}")]
    Builtins { msg: String },
}

impl CompileError {
    pub fn syntax(msg: impl Into<String>, span: Span) -> Self {
        Self::Syntax { msg: msg.into(), span }
    }

    pub fn duplicate_class(name: impl Into<String>, span: Span) -> Self {
        Self::DuplicateClass { name: name.into(), span }
    }

    pub fn duplicate_method(class: impl Into<String>, method: impl Into<String>, span: Span) -> Self {
        Self::DuplicateMethod { class: class.into(), method: method.into(), span }
    }

    pub fn unsupported(kind: NodeKind, op: &'static str) -> Self {
        Self::UnsupportedOperation { kind, op }
    }

    pub fn builtins(msg: impl Into<String>) -> Self {
        Self::Builtins { msg: msg.into() }
    }

    /// Source location of the error, when it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::Syntax { span, .. }
            | CompileError::DuplicateClass { span, .. }
            | CompileError::DuplicateMethod { span, .. } => Some(*span),
            CompileError::UnsupportedOperation { .. } | CompileError::Builtins { .. } => None,
        }
    }
}

/// Render a CompileError with ariadne for nice terminal output.
pub fn render_error(source: &str, filename: &str, err: &CompileError) {
    use ariadne::{Label, Report, ReportKind, Source};

    let Some(span) = err.span() else {
        eprintln!("error: {err}");
        return;
    };

    let (title, msg) = match err {
        CompileError::Syntax { msg, .. } => ("syntax error", msg.clone()),
        CompileError::DuplicateClass { name, .. } => {
            ("duplicate class", format!("class '{name}' is already declared"))
        }
        CompileError::DuplicateMethod { class, method, .. } => (
            "duplicate method",
            format!("method '{method}' is already declared in class '{class}'"),
        ),
        _ => ("error", err.to_string()),
    };

    let printed = Report::build(ReportKind::Error, (), span.start)
        .with_message(format!("{title} in {filename}"))
        .with_label(Label::new(span.start..span.end).with_message(msg))
        .finish()
        .eprint(Source::from(source));
    if printed.is_err() {
        eprintln!("error: {err}");
    }
}
