use std::fmt;

use crate::ast::*;

/// Pretty-print a `Program` AST back into Quack source text.
///
/// Declared classes come first; the synthesized `$Main` class is printed as
/// the top-level statements it was built from. Arithmetic appears in its
/// lowered call form (`PLUS(a, b)`). Printing the reparsed output gives the
/// same text, but the tree differs: reparsed call arguments are wrapped in
/// `Expr::Leaf`, while operands of a lowered operator are not.
pub fn pretty_print(program: &Program) -> String {
    let mut pp = PrettyPrinter::new();
    pp.emit_program(program);
    pp.buf
}

struct PrettyPrinter {
    buf: String,
    indent: usize,
}

impl PrettyPrinter {
    fn new() -> Self {
        Self {
            buf: String::new(),
            indent: 0,
        }
    }

    fn write(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    fn newline(&mut self) {
        self.buf.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.buf.push_str("    ");
        }
    }

    fn indent(&mut self) {
        self.indent += 1;
    }

    fn dedent(&mut self) {
        self.indent -= 1;
    }

    // ── Program ──────────────────────────────────────────────────────

    fn emit_program(&mut self, program: &Program) {
        for class in program.declared_classes() {
            self.emit_class(class);
            self.newline();
            self.newline();
        }
        self.emit_stmts(&program.main_class().constructor.body);
        while self.buf.ends_with("\n\n") {
            self.buf.pop();
        }
    }

    // ── Declarations ─────────────────────────────────────────────────

    fn emit_class(&mut self, class: &Class) {
        self.write("class ");
        self.write(&class.name.node);
        self.write("(");
        self.emit_formals(&class.constructor.formals);
        self.write(") extends ");
        self.write(&class.super_class.node);
        self.write(" {");
        self.newline();
        self.indent();
        for method in &class.methods {
            self.write_indent();
            self.emit_method(method);
            self.newline();
        }
        self.emit_stmts(&class.constructor.body);
        self.dedent();
        self.write_indent();
        self.write("}");
    }

    fn emit_method(&mut self, method: &Method) {
        self.write("def ");
        self.write(&method.name.node);
        self.write("(");
        self.emit_formals(&method.formals);
        self.write("): ");
        self.write(&method.returns.node);
        self.write(" ");
        self.emit_block(&method.body);
    }

    fn emit_formals(&mut self, formals: &[Formal]) {
        for (i, formal) in formals.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_formal(formal);
        }
    }

    fn emit_formal(&mut self, formal: &Formal) {
        self.write(&formal.var_name.node);
        self.write(": ");
        self.write(&formal.var_type.node);
    }

    // ── Block ────────────────────────────────────────────────────────

    fn emit_block(&mut self, block: &Block) {
        self.write("{");
        self.newline();
        self.indent();
        self.emit_stmts(block);
        self.dedent();
        self.write_indent();
        self.write("}");
    }

    /// One statement per line at the current indentation, no braces.
    fn emit_stmts(&mut self, block: &Block) {
        for stmt in &block.stmts {
            self.write_indent();
            self.emit_stmt(stmt);
            self.newline();
        }
    }

    // ── Statements ───────────────────────────────────────────────────

    fn emit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign { target, value } => {
                self.emit_expr(target);
                self.write(" = ");
                self.emit_expr(value);
                self.write(";");
            }
            Stmt::If { cond, then_block, else_block } => {
                self.write("if ");
                self.emit_expr(cond);
                self.write(" ");
                self.emit_block(then_block);
                if !else_block.is_empty() {
                    self.write(" else ");
                    self.emit_block(else_block);
                }
            }
            Stmt::Expr(expr) => {
                self.emit_expr(expr);
                self.write(";");
            }
        }
    }

    // ── Expressions ──────────────────────────────────────────────────

    fn emit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Var(name) => self.write(&name.node),
            Expr::Call { method, args } => {
                self.write(&method.node);
                self.write("(");
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_expr(arg);
                }
                self.write(")");
            }
            Expr::IntLit(n) => self.write(&n.node.to_string()),
            Expr::StrLit(s) => self.emit_string(&s.node),
            Expr::Leaf(inner) => self.emit_expr(inner),
        }
    }

    fn emit_string(&mut self, s: &str) {
        self.buf.push('"');
        for c in s.chars() {
            match c {
                '"' => self.buf.push_str("\\\""),
                '\\' => self.buf.push_str("\\\\"),
                '\n' => self.buf.push_str("\\n"),
                '\t' => self.buf.push_str("\\t"),
                other => self.buf.push(other),
            }
        }
        self.buf.push('"');
    }
}

fn render(emit: impl FnOnce(&mut PrettyPrinter)) -> String {
    let mut pp = PrettyPrinter::new();
    emit(&mut pp);
    pp.buf
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pretty_print(self))
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(|pp| pp.emit_class(self)))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(|pp| pp.emit_method(self)))
    }
}

impl fmt::Display for Formal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(|pp| pp.emit_formal(self)))
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(|pp| pp.emit_stmts(self)))
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(|pp| pp.emit_stmt(self)))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(|pp| pp.emit_expr(self)))
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Program(n) => fmt::Display::fmt(n, f),
            Node::Class(n) => fmt::Display::fmt(n, f),
            Node::Method(n) => fmt::Display::fmt(n, f),
            Node::Formal(n) => fmt::Display::fmt(n, f),
            Node::Block(n) => fmt::Display::fmt(n, f),
            Node::Stmt(n) => fmt::Display::fmt(n, f),
            Node::Expr(n) => fmt::Display::fmt(n, f),
        }
    }
}
