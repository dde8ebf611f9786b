//! Concrete parse tree.
//!
//! The shape follows the grammar one-to-one: every production becomes a
//! [`Tree`] tagged with its [`Rule`], terminals become [`Leaf`]s, and an
//! optional group that matched nothing is recorded as [`Cst::Absent`].
//! The tree builder consumes this shape without knowing how it was parsed.

use std::fmt;

use crate::span::Span;

/// Grammar productions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Program,
    Classes,
    Clazz,
    Superclass,
    Methods,
    Method,
    Formals,
    Formal,
    Returns,
    Block,
    Assignment,
    IfStmt,
    Cond,
    Otherwise,
    ElseBlock,
    ExprStmt,
    Expr,
    Add,
    Sub,
    Mul,
    Div,
    Call,
    VariableRef,
    IntLit,
    StrLit,
}

impl Rule {
    pub fn name(self) -> &'static str {
        match self {
            Rule::Program => "program",
            Rule::Classes => "classes",
            Rule::Clazz => "clazz",
            Rule::Superclass => "superclass",
            Rule::Methods => "methods",
            Rule::Method => "method",
            Rule::Formals => "formals",
            Rule::Formal => "formal",
            Rule::Returns => "returns",
            Rule::Block => "block",
            Rule::Assignment => "assignment",
            Rule::IfStmt => "ifstmt",
            Rule::Cond => "cond",
            Rule::Otherwise => "otherwise",
            Rule::ElseBlock => "elseblock",
            Rule::ExprStmt => "expr_stmt",
            Rule::Expr => "expr",
            Rule::Add => "add",
            Rule::Sub => "sub",
            Rule::Mul => "mul",
            Rule::Div => "div",
            Rule::Call => "call",
            Rule::VariableRef => "variable_ref",
            Rule::IntLit => "int_lit",
            Rule::StrLit => "str_lit",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Terminal kinds that survive into the concrete tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    Ident,
    Int,
    Str,
}

/// A terminal with its (unescaped) text.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub kind: LeafKind,
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub rule: Rule,
    pub children: Vec<Cst>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cst {
    Tree(Tree),
    Leaf(Leaf),
    /// Placeholder for an optional group that matched nothing.
    Absent(Span),
}

impl Cst {
    pub fn tree(rule: Rule, children: Vec<Cst>, span: Span) -> Self {
        Cst::Tree(Tree { rule, children, span })
    }

    pub fn leaf(kind: LeafKind, text: impl Into<String>, span: Span) -> Self {
        Cst::Leaf(Leaf { kind, text: text.into(), span })
    }

    pub fn ident(text: impl Into<String>, span: Span) -> Self {
        Self::leaf(LeafKind::Ident, text, span)
    }

    pub fn span(&self) -> Span {
        match self {
            Cst::Tree(t) => t.span,
            Cst::Leaf(l) => l.span,
            Cst::Absent(span) => *span,
        }
    }

    pub fn rule(&self) -> Option<Rule> {
        match self {
            Cst::Tree(t) => Some(t.rule),
            _ => None,
        }
    }

    /// Indented one-node-per-line rendering. A tree whose only child is a
    /// leaf is printed on a single line as `rule<TAB>text`.
    pub fn pretty(&self, indent_str: &str) -> String {
        let mut out = String::new();
        self.pretty_into(&mut out, 0, indent_str);
        out
    }

    fn pretty_into(&self, out: &mut String, level: usize, indent_str: &str) {
        for _ in 0..level {
            out.push_str(indent_str);
        }
        match self {
            Cst::Leaf(leaf) => {
                out.push_str(&leaf.text);
                out.push('\n');
            }
            Cst::Absent(_) => out.push_str("None\n"),
            Cst::Tree(tree) => match tree.children.as_slice() {
                [Cst::Leaf(leaf)] => {
                    out.push_str(tree.rule.name());
                    out.push('\t');
                    out.push_str(&leaf.text);
                    out.push('\n');
                }
                children => {
                    out.push_str(tree.rule.name());
                    out.push('\n');
                    for child in children {
                        child.pretty_into(out, level + 1, indent_str);
                    }
                }
            },
        }
    }
}
