//! Evaluation hooks for later compiler stages.
//!
//! No node kind evaluates anything yet. The default bodies fail with
//! [`CompileError::UnsupportedOperation`] naming the node kind, so a pass
//! that reaches a kind nobody has taught to evaluate finds out immediately.

use super::{Block, Class, Expr, Formal, Method, Node, NodeKind, Program, Stmt};
use crate::diagnostics::CompileError;

pub trait Evaluate {
    fn node_kind(&self) -> NodeKind;

    /// Evaluate for value.
    fn r_eval(&self) -> Result<Vec<String>, CompileError> {
        Err(CompileError::unsupported(self.node_kind(), "r_eval"))
    }

    /// Evaluate as a branch condition, jumping to one of the two labels.
    fn c_eval(&self, _true_branch: &str, _false_branch: &str) -> Result<Vec<String>, CompileError> {
        Err(CompileError::unsupported(self.node_kind(), "c_eval"))
    }
}

impl Evaluate for Program {
    fn node_kind(&self) -> NodeKind {
        NodeKind::Program
    }
}

impl Evaluate for Class {
    fn node_kind(&self) -> NodeKind {
        NodeKind::Class
    }
}

impl Evaluate for Method {
    fn node_kind(&self) -> NodeKind {
        NodeKind::Method
    }
}

impl Evaluate for Formal {
    fn node_kind(&self) -> NodeKind {
        NodeKind::Formal
    }
}

impl Evaluate for Block {
    fn node_kind(&self) -> NodeKind {
        NodeKind::Block
    }
}

impl Evaluate for Stmt {
    fn node_kind(&self) -> NodeKind {
        self.kind()
    }
}

impl Evaluate for Expr {
    fn node_kind(&self) -> NodeKind {
        self.kind()
    }
}

/// Forwards to the concrete node so per-kind overrides are honored.
impl Evaluate for Node<'_> {
    fn node_kind(&self) -> NodeKind {
        self.kind()
    }

    fn r_eval(&self) -> Result<Vec<String>, CompileError> {
        match *self {
            Node::Program(n) => n.r_eval(),
            Node::Class(n) => n.r_eval(),
            Node::Method(n) => n.r_eval(),
            Node::Formal(n) => n.r_eval(),
            Node::Block(n) => n.r_eval(),
            Node::Stmt(n) => n.r_eval(),
            Node::Expr(n) => n.r_eval(),
        }
    }

    fn c_eval(&self, true_branch: &str, false_branch: &str) -> Result<Vec<String>, CompileError> {
        match *self {
            Node::Program(n) => n.c_eval(true_branch, false_branch),
            Node::Class(n) => n.c_eval(true_branch, false_branch),
            Node::Method(n) => n.c_eval(true_branch, false_branch),
            Node::Formal(n) => n.c_eval(true_branch, false_branch),
            Node::Block(n) => n.c_eval(true_branch, false_branch),
            Node::Stmt(n) => n.c_eval(true_branch, false_branch),
            Node::Expr(n) => n.c_eval(true_branch, false_branch),
        }
    }
}
