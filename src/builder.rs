//! Tree builder: reduces a concrete parse tree to the AST.
//!
//! Reduction is bottom-up. Every child of a [`Tree`] is reduced first, then
//! the reduction for the tree's [`Rule`] receives the already-built children
//! and produces exactly one value. The builder performs no semantic checks;
//! a concrete tree that does not have the grammar's shape is reported as a
//! syntax error against the offending rule.

use tracing::debug;

use crate::ast::*;
use crate::diagnostics::CompileError;
use crate::parser::cst::{Cst, Leaf, LeafKind, Rule, Tree};
use crate::span::{Span, Spanned};

/// Result of reducing one concrete node.
#[derive(Debug)]
enum Reduced {
    Absent,
    Token(Leaf),
    Name(Spanned<String>),
    Formal(Formal),
    Formals(Vec<Formal>),
    Method(Method),
    Methods(Vec<Method>),
    Class(Class),
    Classes(Vec<Class>),
    Block(Block),
    Stmt(Stmt),
    Expr(Expr),
    Program(Program),
}

impl Reduced {
    fn describe(&self) -> &'static str {
        match self {
            Reduced::Absent => "nothing",
            Reduced::Token(_) => "token",
            Reduced::Name(_) => "name",
            Reduced::Formal(_) => "formal",
            Reduced::Formals(_) => "formal list",
            Reduced::Method(_) => "method",
            Reduced::Methods(_) => "method list",
            Reduced::Class(_) => "class",
            Reduced::Classes(_) => "class list",
            Reduced::Block(_) => "block",
            Reduced::Stmt(_) => "statement",
            Reduced::Expr(_) => "expression",
            Reduced::Program(_) => "program",
        }
    }
}

/// The reduced children of one tree, consumed left to right.
struct Args {
    rule: Rule,
    span: Span,
    items: std::vec::IntoIter<Reduced>,
}

impl Args {
    fn error(&self, msg: impl std::fmt::Display) -> CompileError {
        CompileError::syntax(format!("malformed '{}' production: {msg}", self.rule), self.span)
    }

    fn next(&mut self, what: &str) -> Result<Reduced, CompileError> {
        self.items
            .next()
            .ok_or_else(|| self.error(format!("missing {what}")))
    }

    fn peek_absent(&self) -> bool {
        matches!(self.items.as_slice().first(), Some(Reduced::Absent))
    }

    fn is_empty(&self) -> bool {
        self.items.len() == 0
    }

    fn mismatch(&self, expected: &str, found: &Reduced) -> CompileError {
        self.error(format!("expected {expected}, found {}", found.describe()))
    }

    fn name(&mut self) -> Result<Spanned<String>, CompileError> {
        match self.next("name")? {
            Reduced::Token(leaf) if leaf.kind == LeafKind::Ident => Ok(Spanned::new(leaf.text, leaf.span)),
            Reduced::Name(name) => Ok(name),
            other => Err(self.mismatch("name", &other)),
        }
    }

    fn token(&mut self) -> Result<Leaf, CompileError> {
        match self.next("token")? {
            Reduced::Token(leaf) => Ok(leaf),
            other => Err(self.mismatch("token", &other)),
        }
    }

    fn formal(&mut self) -> Result<Formal, CompileError> {
        match self.next("formal")? {
            Reduced::Formal(f) => Ok(f),
            other => Err(self.mismatch("formal", &other)),
        }
    }

    fn formals(&mut self) -> Result<Vec<Formal>, CompileError> {
        match self.next("formals")? {
            Reduced::Formals(fs) => Ok(fs),
            other => Err(self.mismatch("formal list", &other)),
        }
    }

    fn method(&mut self) -> Result<Method, CompileError> {
        match self.next("method")? {
            Reduced::Method(m) => Ok(m),
            other => Err(self.mismatch("method", &other)),
        }
    }

    fn methods(&mut self) -> Result<Vec<Method>, CompileError> {
        match self.next("methods")? {
            Reduced::Methods(ms) => Ok(ms),
            other => Err(self.mismatch("method list", &other)),
        }
    }

    fn class(&mut self) -> Result<Class, CompileError> {
        match self.next("class")? {
            Reduced::Class(c) => Ok(c),
            other => Err(self.mismatch("class", &other)),
        }
    }

    fn classes(&mut self) -> Result<Vec<Class>, CompileError> {
        match self.next("classes")? {
            Reduced::Classes(cs) => Ok(cs),
            other => Err(self.mismatch("class list", &other)),
        }
    }

    fn block(&mut self) -> Result<Block, CompileError> {
        match self.next("block")? {
            Reduced::Block(b) => Ok(b),
            other => Err(self.mismatch("block", &other)),
        }
    }

    fn stmt(&mut self) -> Result<Stmt, CompileError> {
        match self.next("statement")? {
            Reduced::Stmt(s) => Ok(s),
            other => Err(self.mismatch("statement", &other)),
        }
    }

    fn expr(&mut self) -> Result<Expr, CompileError> {
        match self.next("expression")? {
            Reduced::Expr(e) => Ok(e),
            other => Err(self.mismatch("expression", &other)),
        }
    }

    /// Every child must have been consumed.
    fn finish(self) -> Result<(), CompileError> {
        match self.items.as_slice().first() {
            None => Ok(()),
            Some(extra) => Err(self.error(format!("unexpected {}", extra.describe()))),
        }
    }
}

/// Reduces concrete parse trees to [`Program`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct AstBuilder;

impl AstBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Reduce a whole `program` tree.
    pub fn transform(&self, cst: &Cst) -> Result<Program, CompileError> {
        match self.reduce(cst)? {
            Reduced::Program(program) => Ok(program),
            other => Err(CompileError::syntax(
                format!("expected a program tree, found {}", other.describe()),
                cst.span(),
            )),
        }
    }

    fn reduce(&self, cst: &Cst) -> Result<Reduced, CompileError> {
        match cst {
            Cst::Absent(_) => Ok(Reduced::Absent),
            Cst::Leaf(leaf) => Ok(Reduced::Token(leaf.clone())),
            Cst::Tree(tree) => {
                let children = tree
                    .children
                    .iter()
                    .map(|child| self.reduce(child))
                    .collect::<Result<Vec<_>, _>>()?;
                self.reduce_rule(tree, children)
            }
        }
    }

    fn reduce_rule(&self, tree: &Tree, children: Vec<Reduced>) -> Result<Reduced, CompileError> {
        let mut args = Args { rule: tree.rule, span: tree.span, items: children.into_iter() };
        let reduced = match tree.rule {
            Rule::Program => Reduced::Program(self.program(&mut args)?),
            Rule::Classes => Reduced::Classes(Self::many(&mut args, Args::class)?),
            Rule::Clazz => Reduced::Class(self.clazz(&mut args)?),
            Rule::Superclass => Reduced::Name(self.superclass(&mut args)?),
            Rule::Methods => Reduced::Methods(Self::many(&mut args, Args::method)?),
            Rule::Method => Reduced::Method(self.method(&mut args)?),
            Rule::Formals => Reduced::Formals(self.formals(&mut args)?),
            Rule::Formal => Reduced::Formal(self.formal(&mut args)?),
            Rule::Returns => Reduced::Name(self.returns(&mut args)?),
            Rule::Block => Reduced::Block(self.block(&mut args)?),
            Rule::Assignment => Reduced::Stmt(self.assignment(&mut args)?),
            Rule::IfStmt => Reduced::Stmt(self.ifstmt(&mut args)?),
            Rule::Cond => Reduced::Expr(self.cond(&mut args)?),
            Rule::Otherwise => Reduced::Block(self.otherwise(&mut args)?),
            Rule::ElseBlock => Reduced::Block(self.elseblock(&mut args)?),
            Rule::ExprStmt => Reduced::Stmt(Stmt::Expr(args.expr()?)),
            Rule::Expr => Reduced::Expr(self.expr(&mut args)?),
            Rule::Add => Reduced::Expr(self.binop(&mut args, OP_PLUS)?),
            Rule::Sub => Reduced::Expr(self.binop(&mut args, OP_SUB)?),
            Rule::Mul => Reduced::Expr(self.binop(&mut args, OP_TIMES)?),
            Rule::Div => Reduced::Expr(self.binop(&mut args, OP_DIV)?),
            Rule::Call => Reduced::Expr(self.call(&mut args)?),
            Rule::VariableRef => Reduced::Expr(self.variable_ref(&mut args)?),
            Rule::IntLit => Reduced::Expr(self.int_lit(&mut args)?),
            Rule::StrLit => Reduced::Expr(self.str_lit(&mut args)?),
        };
        args.finish()?;
        Ok(reduced)
    }

    fn many<T>(
        args: &mut Args,
        one: fn(&mut Args) -> Result<T, CompileError>,
    ) -> Result<Vec<T>, CompileError> {
        let mut items = Vec::new();
        while !args.is_empty() {
            items.push(one(args)?);
        }
        Ok(items)
    }

    fn program(&self, args: &mut Args) -> Result<Program, CompileError> {
        debug!("->program");
        let classes = args.classes()?;
        let main_block = args.block()?;
        Ok(Program::new(classes, main_block))
    }

    fn clazz(&self, args: &mut Args) -> Result<Class, CompileError> {
        debug!("->clazz");
        let name = args.name()?;
        let formals = args.formals()?;
        let super_class = args.name()?;
        let methods = args.methods()?;
        let body = args.block()?;
        Ok(Class::new(name, formals, super_class, methods, body))
    }

    /// A missing `extends` clause means the root class.
    fn superclass(&self, args: &mut Args) -> Result<Spanned<String>, CompileError> {
        if args.is_empty() {
            return Ok(Spanned::new(ROOT_CLASS.to_string(), args.span));
        }
        args.name()
    }

    fn method(&self, args: &mut Args) -> Result<Method, CompileError> {
        debug!("->method");
        let name = args.name()?;
        let formals = args.formals()?;
        let returns = args.name()?;
        let body = args.block()?;
        Ok(Method { name, formals, returns, body })
    }

    /// The "no formals" marker collapses to an empty list.
    fn formals(&self, args: &mut Args) -> Result<Vec<Formal>, CompileError> {
        if args.peek_absent() {
            args.next("formals")?;
            return Ok(Vec::new());
        }
        Self::many(args, Args::formal)
    }

    fn formal(&self, args: &mut Args) -> Result<Formal, CompileError> {
        debug!("->formal");
        let var_name = args.name()?;
        let var_type = args.name()?;
        Ok(Formal { var_name, var_type })
    }

    /// No declared return type means `Nothing`.
    fn returns(&self, args: &mut Args) -> Result<Spanned<String>, CompileError> {
        if args.is_empty() {
            return Ok(Spanned::new(NOTHING_TYPE.to_string(), args.span));
        }
        args.name()
    }

    fn block(&self, args: &mut Args) -> Result<Block, CompileError> {
        debug!("->block");
        let stmts = Self::many(args, Args::stmt)?;
        Ok(Block::new(stmts, args.span))
    }

    fn assignment(&self, args: &mut Args) -> Result<Stmt, CompileError> {
        debug!("->assignment");
        let target = args.expr()?;
        let value = args.expr()?;
        Ok(Stmt::Assign { target, value })
    }

    fn ifstmt(&self, args: &mut Args) -> Result<Stmt, CompileError> {
        debug!("->ifstmt");
        let cond = args.expr()?;
        let then_block = args.block()?;
        let else_block = args.block()?;
        Ok(Stmt::If { cond, then_block, else_block })
    }

    fn cond(&self, args: &mut Args) -> Result<Expr, CompileError> {
        debug!("->cond");
        args.expr()
    }

    /// An absent else clause still yields a (empty) block.
    fn otherwise(&self, args: &mut Args) -> Result<Block, CompileError> {
        debug!("->otherwise");
        if args.is_empty() {
            return Ok(Block::empty(args.span));
        }
        args.block()
    }

    /// Peels the extra layer the grammar puts around the else body.
    fn elseblock(&self, args: &mut Args) -> Result<Block, CompileError> {
        debug!("->elseblock");
        args.block()
    }

    fn expr(&self, args: &mut Args) -> Result<Expr, CompileError> {
        debug!("->expr");
        Ok(Expr::Leaf(Box::new(args.expr()?)))
    }

    fn binop(&self, args: &mut Args, op: &str) -> Result<Expr, CompileError> {
        debug!(op, "->binop");
        let lhs = args.expr()?;
        let rhs = args.expr()?;
        Ok(Expr::Call {
            method: Spanned::new(op.to_string(), args.span),
            args: vec![lhs, rhs],
        })
    }

    fn call(&self, args: &mut Args) -> Result<Expr, CompileError> {
        debug!("->method call");
        let method = args.name()?;
        let call_args = Self::many(args, Args::expr)?;
        Ok(Expr::Call { method, args: call_args })
    }

    fn variable_ref(&self, args: &mut Args) -> Result<Expr, CompileError> {
        debug!("->variable_ref");
        Ok(Expr::Var(args.name()?))
    }

    fn int_lit(&self, args: &mut Args) -> Result<Expr, CompileError> {
        let leaf = args.token()?;
        let value = leaf
            .text
            .replace('_', "")
            .parse::<i64>()
            .map_err(|e| args.error(format!("bad integer literal '{}': {e}", leaf.text)))?;
        Ok(Expr::IntLit(Spanned::new(value, leaf.span)))
    }

    fn str_lit(&self, args: &mut Args) -> Result<Expr, CompileError> {
        let leaf = args.token()?;
        Ok(Expr::StrLit(Spanned::new(leaf.text, leaf.span)))
    }
}
