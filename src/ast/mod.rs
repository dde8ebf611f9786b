//! Abstract syntax tree for Quack programs.
//!
//! Nodes are plain owned structs built once by [`crate::builder`] and never
//! mutated afterwards. Passes see them through the borrowed [`Node`] handle,
//! whose [`Node::children`] lists each node's children in traversal order.

pub mod eval;

use std::fmt;

use crate::span::{Span, Spanned};

/// Name of the class synthesized to hold top-level statements.
pub const MAIN_CLASS: &str = "$Main";
/// Name of the method synthesized from a class's formals and statements.
pub const CONSTRUCTOR: &str = "$constructor";
/// Root of the class hierarchy; default superclass.
pub const ROOT_CLASS: &str = "Obj";
/// Return type of methods that declare none.
pub const NOTHING_TYPE: &str = "Nothing";

/// Reserved method names that binary arithmetic lowers to.
pub const OP_PLUS: &str = "PLUS";
pub const OP_SUB: &str = "SUB";
pub const OP_TIMES: &str = "TIMES";
pub const OP_DIV: &str = "DIV";

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub classes: Vec<Class>,
}

impl Program {
    /// Wraps the top-level statements in a synthesized `$Main` class, which
    /// is always the last class of the program.
    pub fn new(mut classes: Vec<Class>, main_block: Block) -> Self {
        let main_class = Class::new(
            Spanned::new(MAIN_CLASS.to_string(), main_block.span),
            Vec::new(),
            Spanned::new(ROOT_CLASS.to_string(), main_block.span),
            Vec::new(),
            main_block,
        );
        classes.push(main_class);
        Self { classes }
    }

    /// The synthesized `$Main` class.
    pub fn main_class(&self) -> &Class {
        // Program::new always pushes it, and classes are never removed.
        &self.classes[self.classes.len() - 1]
    }

    /// Classes declared in source, excluding `$Main`.
    pub fn declared_classes(&self) -> &[Class] {
        &self.classes[..self.classes.len() - 1]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: Spanned<String>,
    pub super_class: Spanned<String>,
    pub methods: Vec<Method>,
    pub constructor: Method,
}

impl Class {
    /// The class formals and statement block become the synthesized
    /// `$constructor` method.
    pub fn new(
        name: Spanned<String>,
        formals: Vec<Formal>,
        super_class: Spanned<String>,
        methods: Vec<Method>,
        body: Block,
    ) -> Self {
        let constructor = Method {
            name: Spanned::new(CONSTRUCTOR.to_string(), name.span),
            formals,
            returns: Spanned::new(NOTHING_TYPE.to_string(), name.span),
            body,
        };
        Self { name, super_class, methods, constructor }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: Spanned<String>,
    pub formals: Vec<Formal>,
    pub returns: Spanned<String>,
    pub body: Block,
}

impl Method {
    pub fn param_types(&self) -> Vec<String> {
        self.formals.iter().map(|f| f.var_type.node.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Formal {
    pub var_name: Spanned<String>,
    pub var_type: Spanned<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>, span: Span) -> Self {
        Self { stmts, span }
    }

    pub fn empty(span: Span) -> Self {
        Self { stmts: Vec::new(), span }
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign {
        target: Expr,
        value: Expr,
    },
    If {
        cond: Expr,
        then_block: Block,
        else_block: Block,
    },
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Var(Spanned<String>),
    /// Method call; also the lowered form of binary arithmetic.
    Call {
        method: Spanned<String>,
        args: Vec<Expr>,
    },
    IntLit(Spanned<i64>),
    StrLit(Spanned<String>),
    /// Entry point for whole expressions (statement, operand, argument).
    Leaf(Box<Expr>),
}

/// Tag naming each kind of node, for diagnostics and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Class,
    Method,
    Formal,
    Block,
    Assignment,
    IfStmt,
    ExprStmt,
    VariableRef,
    MethodCall,
    IntLit,
    StrLit,
    Leaf,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Program => "Program",
            NodeKind::Class => "Class",
            NodeKind::Method => "Method",
            NodeKind::Formal => "Formal",
            NodeKind::Block => "Block",
            NodeKind::Assignment => "Assignment",
            NodeKind::IfStmt => "IfStmt",
            NodeKind::ExprStmt => "ExprStmt",
            NodeKind::VariableRef => "VariableRef",
            NodeKind::MethodCall => "MethodCall",
            NodeKind::IntLit => "IntLit",
            NodeKind::StrLit => "StrLit",
            NodeKind::Leaf => "Leaf",
        };
        f.write_str(s)
    }
}

impl Stmt {
    pub fn kind(&self) -> NodeKind {
        match self {
            Stmt::Assign { .. } => NodeKind::Assignment,
            Stmt::If { .. } => NodeKind::IfStmt,
            Stmt::Expr(_) => NodeKind::ExprStmt,
        }
    }
}

impl Expr {
    pub fn kind(&self) -> NodeKind {
        match self {
            Expr::Var(_) => NodeKind::VariableRef,
            Expr::Call { .. } => NodeKind::MethodCall,
            Expr::IntLit(_) => NodeKind::IntLit,
            Expr::StrLit(_) => NodeKind::StrLit,
            Expr::Leaf(_) => NodeKind::Leaf,
        }
    }
}

/// Borrowed handle over any AST node.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a Program),
    Class(&'a Class),
    Method(&'a Method),
    Formal(&'a Formal),
    Block(&'a Block),
    Stmt(&'a Stmt),
    Expr(&'a Expr),
}

/// A node's declared child: either one node or an ordered group of them.
#[derive(Debug, Clone)]
pub enum Child<'a> {
    Node(Node<'a>),
    Group(Vec<Child<'a>>),
}

fn group<'a, T: 'a>(items: &'a [T], wrap: fn(&'a T) -> Node<'a>) -> Child<'a> {
    Child::Group(items.iter().map(|item| Child::Node(wrap(item))).collect())
}

impl<'a> Node<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Program(_) => NodeKind::Program,
            Node::Class(_) => NodeKind::Class,
            Node::Method(_) => NodeKind::Method,
            Node::Formal(_) => NodeKind::Formal,
            Node::Block(_) => NodeKind::Block,
            Node::Stmt(s) => s.kind(),
            Node::Expr(e) => e.kind(),
        }
    }

    /// Declared children in traversal order. Grouped children (all methods
    /// of a class, all formals of a method, ...) stay nested here; the walker
    /// flattens them.
    pub fn children(&self) -> Vec<Child<'a>> {
        match *self {
            Node::Program(p) => vec![group(&p.classes, Node::Class)],
            Node::Class(c) => vec![
                group(&c.methods, Node::Method),
                Child::Node(Node::Method(&c.constructor)),
            ],
            Node::Method(m) => vec![
                group(&m.formals, Node::Formal),
                Child::Node(Node::Block(&m.body)),
            ],
            Node::Formal(_) => Vec::new(),
            Node::Block(b) => vec![group(&b.stmts, Node::Stmt)],
            Node::Stmt(Stmt::Assign { target, value }) => vec![
                Child::Node(Node::Expr(target)),
                Child::Node(Node::Expr(value)),
            ],
            Node::Stmt(Stmt::If { cond, then_block, else_block }) => vec![
                Child::Node(Node::Expr(cond)),
                Child::Node(Node::Block(then_block)),
                Child::Node(Node::Block(else_block)),
            ],
            Node::Stmt(Stmt::Expr(e)) => vec![Child::Node(Node::Expr(e))],
            Node::Expr(Expr::Call { args, .. }) => vec![group(args, Node::Expr)],
            Node::Expr(Expr::Leaf(inner)) => vec![Child::Node(Node::Expr(inner))],
            Node::Expr(Expr::Var(_) | Expr::IntLit(_) | Expr::StrLit(_)) => Vec::new(),
        }
    }

    /// Name of a named node (class, method, formal, variable, callee).
    pub fn name(&self) -> Option<&'a str> {
        match *self {
            Node::Class(c) => Some(c.name.node.as_str()),
            Node::Method(m) => Some(m.name.node.as_str()),
            Node::Formal(f) => Some(f.var_name.node.as_str()),
            Node::Expr(Expr::Var(name)) => Some(name.node.as_str()),
            Node::Expr(Expr::Call { method, .. }) => Some(method.node.as_str()),
            _ => None,
        }
    }
}

impl<'a> From<&'a Program> for Node<'a> {
    fn from(p: &'a Program) -> Self {
        Node::Program(p)
    }
}

impl<'a> From<&'a Class> for Node<'a> {
    fn from(c: &'a Class) -> Self {
        Node::Class(c)
    }
}

impl<'a> From<&'a Method> for Node<'a> {
    fn from(m: &'a Method) -> Self {
        Node::Method(m)
    }
}

impl<'a> From<&'a Block> for Node<'a> {
    fn from(b: &'a Block) -> Self {
        Node::Block(b)
    }
}

impl<'a> From<&'a Stmt> for Node<'a> {
    fn from(s: &'a Stmt) -> Self {
        Node::Stmt(s)
    }
}

impl<'a> From<&'a Expr> for Node<'a> {
    fn from(e: &'a Expr) -> Self {
        Node::Expr(e)
    }
}
