pub mod cst;

use crate::diagnostics::CompileError;
use crate::lexer::token::Token;
use crate::span::{Span, Spanned};
use cst::{Cst, LeafKind, Rule};

/// Recursive-descent parser for the Quack grammar. Produces a concrete
/// parse tree whose productions map one-to-one onto [`Rule`]s:
///
/// ```text
/// program    : classes block
/// classes    : clazz*
/// clazz      : "class" IDENT "(" formals ")" superclass "{" methods block "}"
/// superclass : ("extends" IDENT)?
/// methods    : method*
/// method     : "def" IDENT "(" formals ")" returns "{" block "}"
/// formals    : (formal ("," formal)*)?
/// formal     : IDENT ":" IDENT
/// returns    : (":" IDENT)?
/// block      : statement*
/// statement  : assignment | ifstmt | expr_stmt
/// assignment : variable_ref "=" expr ";"
/// ifstmt     : "if" cond "{" block "}" otherwise
/// cond       : expr
/// otherwise  : elseblock?
/// elseblock  : "else" "{" block "}"
/// expr_stmt  : expr ";"
/// expr       : sum
/// sum        : product (("+" | "-") product)*
/// product    : atom (("*" | "/") atom)*
/// atom       : INT | STRING | IDENT "(" (expr ("," expr)*)? ")" | IDENT | "(" expr ")"
/// ```
pub struct Parser<'a> {
    tokens: &'a [Spanned<Token>],
    source: &'a str,
    pos: usize,
    depth: usize,
}

/// Deepest nesting of expressions and `if` statements the parser accepts.
/// Every later pass recurses over the tree, so this also bounds their depth.
pub const MAX_NESTING: usize = 128;

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Spanned<Token>], source: &'a str) -> Self {
        Self { tokens, source, pos: 0, depth: 0 }
    }

    fn peek(&self) -> Option<&Spanned<Token>> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&Spanned<Token>> {
        self.tokens.get(self.pos + n)
    }

    fn peek_is(&self, expected: &Token) -> bool {
        self.peek()
            .is_some_and(|tok| std::mem::discriminant(&tok.node) == std::mem::discriminant(expected))
    }

    fn advance(&mut self) -> Option<&Spanned<Token>> {
        if self.pos < self.tokens.len() {
            let tok = &self.tokens[self.pos];
            self.pos += 1;
            Some(tok)
        } else {
            None
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<Span, CompileError> {
        match self.tokens.get(self.pos) {
            Some(tok) if std::mem::discriminant(&tok.node) == std::mem::discriminant(expected) => {
                self.pos += 1;
                Ok(tok.span)
            }
            Some(tok) => Err(CompileError::syntax(
                format!("expected {expected}, found {}", tok.node),
                tok.span,
            )),
            None => Err(CompileError::syntax(
                format!("expected {expected}, found end of file"),
                self.eof_span(),
            )),
        }
    }

    fn expect_ident(&mut self) -> Result<Cst, CompileError> {
        match self.tokens.get(self.pos) {
            Some(tok) if matches!(tok.node, Token::Ident) => {
                let name = &self.source[tok.span.start..tok.span.end];
                self.pos += 1;
                Ok(Cst::ident(name, tok.span))
            }
            Some(tok) => Err(CompileError::syntax(
                format!("expected identifier, found {}", tok.node),
                tok.span,
            )),
            None => Err(CompileError::syntax(
                "expected identifier, found end of file",
                self.eof_span(),
            )),
        }
    }

    fn eof_span(&self) -> Span {
        match self.tokens.last() {
            Some(last) => Span::new(last.span.end, last.span.end),
            None => Span::new(self.source.len(), self.source.len()),
        }
    }

    /// Empty span at the start of the next token; used for productions that
    /// matched nothing.
    fn here(&self) -> Span {
        match self.peek() {
            Some(tok) => Span::new(tok.span.start, tok.span.start),
            None => self.eof_span(),
        }
    }

    /// Span of a production from `start` up to the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(prev) if prev.span.end >= start.start => Span::new(start.start, prev.span.end),
            _ => start,
        }
    }

    fn span_of(children: &[Cst], fallback: Span) -> Span {
        match (children.first(), children.last()) {
            (Some(first), Some(last)) => first.span().to(last.span()),
            _ => fallback,
        }
    }

    /// Span of the next token, or the end of input.
    fn next_span(&self) -> Span {
        self.peek().map_or_else(|| self.eof_span(), |tok| tok.span)
    }

    fn enter(&mut self, span: Span) -> Result<(), CompileError> {
        if self.depth >= MAX_NESTING {
            return Err(CompileError::syntax("expression nested too deeply", span));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Each operator of a left-associative chain adds one level to the tree.
    fn check_chain(&self, ops: usize, span: Span) -> Result<(), CompileError> {
        if self.depth + ops > MAX_NESTING {
            return Err(CompileError::syntax("expression nested too deeply", span));
        }
        Ok(())
    }

    pub fn parse_program(&mut self) -> Result<Cst, CompileError> {
        let classes = self.parse_classes()?;
        let block = self.parse_block()?;
        if let Some(tok) = self.peek() {
            return Err(CompileError::syntax(
                format!("expected statement, found {}", tok.node),
                tok.span,
            ));
        }
        let span = Span::new(0, self.source.len());
        Ok(Cst::tree(Rule::Program, vec![classes, block], span))
    }

    fn parse_classes(&mut self) -> Result<Cst, CompileError> {
        let start = self.here();
        let mut classes = Vec::new();
        while self.peek_is(&Token::Class) {
            classes.push(self.parse_class()?);
        }
        let span = Self::span_of(&classes, start);
        Ok(Cst::tree(Rule::Classes, classes, span))
    }

    fn parse_class(&mut self) -> Result<Cst, CompileError> {
        let start = self.expect(&Token::Class)?;
        let name = self.expect_ident()?;
        self.expect(&Token::LParen)?;
        let formals = self.parse_formals()?;
        self.expect(&Token::RParen)?;
        let superclass = self.parse_superclass()?;
        self.expect(&Token::LBrace)?;
        let methods = self.parse_methods()?;
        let block = self.parse_block()?;
        self.expect(&Token::RBrace)?;
        let span = self.span_from(start);
        Ok(Cst::tree(
            Rule::Clazz,
            vec![name, formals, superclass, methods, block],
            span,
        ))
    }

    fn parse_superclass(&mut self) -> Result<Cst, CompileError> {
        let start = self.here();
        if self.peek_is(&Token::Extends) {
            let kw = self.expect(&Token::Extends)?;
            let name = self.expect_ident()?;
            let span = kw.to(name.span());
            Ok(Cst::tree(Rule::Superclass, vec![name], span))
        } else {
            Ok(Cst::tree(Rule::Superclass, vec![], start))
        }
    }

    fn parse_methods(&mut self) -> Result<Cst, CompileError> {
        let start = self.here();
        let mut methods = Vec::new();
        while self.peek_is(&Token::Def) {
            methods.push(self.parse_method()?);
        }
        let span = Self::span_of(&methods, start);
        Ok(Cst::tree(Rule::Methods, methods, span))
    }

    fn parse_method(&mut self) -> Result<Cst, CompileError> {
        let start = self.expect(&Token::Def)?;
        let name = self.expect_ident()?;
        self.expect(&Token::LParen)?;
        let formals = self.parse_formals()?;
        self.expect(&Token::RParen)?;
        let returns = self.parse_returns()?;
        self.expect(&Token::LBrace)?;
        let body = self.parse_block()?;
        self.expect(&Token::RBrace)?;
        let span = self.span_from(start);
        Ok(Cst::tree(Rule::Method, vec![name, formals, returns, body], span))
    }

    fn parse_formals(&mut self) -> Result<Cst, CompileError> {
        let start = self.here();
        if self.peek_is(&Token::RParen) {
            return Ok(Cst::tree(Rule::Formals, vec![Cst::Absent(start)], start));
        }
        let mut formals = vec![self.parse_formal()?];
        while self.peek_is(&Token::Comma) {
            self.advance();
            formals.push(self.parse_formal()?);
        }
        let span = Self::span_of(&formals, start);
        Ok(Cst::tree(Rule::Formals, formals, span))
    }

    fn parse_formal(&mut self) -> Result<Cst, CompileError> {
        let var_name = self.expect_ident()?;
        self.expect(&Token::Colon)?;
        let var_type = self.expect_ident()?;
        let span = var_name.span().to(var_type.span());
        Ok(Cst::tree(Rule::Formal, vec![var_name, var_type], span))
    }

    fn parse_returns(&mut self) -> Result<Cst, CompileError> {
        let start = self.here();
        if self.peek_is(&Token::Colon) {
            let colon = self.expect(&Token::Colon)?;
            let ty = self.expect_ident()?;
            let span = colon.to(ty.span());
            Ok(Cst::tree(Rule::Returns, vec![ty], span))
        } else {
            Ok(Cst::tree(Rule::Returns, vec![], start))
        }
    }

    /// Statements up to (not including) a closing brace or end of input.
    fn parse_block(&mut self) -> Result<Cst, CompileError> {
        let start = self.here();
        let mut stmts = Vec::new();
        while let Some(tok) = self.peek() {
            if matches!(tok.node, Token::RBrace) {
                break;
            }
            stmts.push(self.parse_statement()?);
        }
        let span = Self::span_of(&stmts, start);
        Ok(Cst::tree(Rule::Block, stmts, span))
    }

    fn parse_statement(&mut self) -> Result<Cst, CompileError> {
        let is_assignment = self.peek_is(&Token::Ident)
            && self.peek_nth(1).is_some_and(|t| matches!(t.node, Token::Eq));
        if self.peek_is(&Token::If) {
            self.parse_if()
        } else if is_assignment {
            self.parse_assignment()
        } else {
            self.parse_expr_stmt()
        }
    }

    fn parse_assignment(&mut self) -> Result<Cst, CompileError> {
        let ident = self.expect_ident()?;
        let target = Cst::tree(Rule::VariableRef, vec![ident.clone()], ident.span());
        self.expect(&Token::Eq)?;
        let value = self.parse_expr()?;
        self.expect(&Token::Semi)?;
        let span = self.span_from(ident.span());
        Ok(Cst::tree(Rule::Assignment, vec![target, value], span))
    }

    fn parse_if(&mut self) -> Result<Cst, CompileError> {
        self.enter(self.next_span())?;
        let ifstmt = self.parse_if_body();
        self.leave();
        ifstmt
    }

    fn parse_if_body(&mut self) -> Result<Cst, CompileError> {
        let start = self.expect(&Token::If)?;
        let expr = self.parse_expr()?;
        let cond_span = expr.span();
        let cond = Cst::tree(Rule::Cond, vec![expr], cond_span);
        self.expect(&Token::LBrace)?;
        let then_block = self.parse_block()?;
        self.expect(&Token::RBrace)?;
        let otherwise = self.parse_otherwise()?;
        let span = self.span_from(start);
        Ok(Cst::tree(Rule::IfStmt, vec![cond, then_block, otherwise], span))
    }

    fn parse_otherwise(&mut self) -> Result<Cst, CompileError> {
        let start = self.here();
        if !self.peek_is(&Token::Else) {
            return Ok(Cst::tree(Rule::Otherwise, vec![], start));
        }
        let kw = self.expect(&Token::Else)?;
        self.expect(&Token::LBrace)?;
        let block = self.parse_block()?;
        self.expect(&Token::RBrace)?;
        let span = self.span_from(kw);
        let else_block = Cst::tree(Rule::ElseBlock, vec![block], span);
        Ok(Cst::tree(Rule::Otherwise, vec![else_block], span))
    }

    fn parse_expr_stmt(&mut self) -> Result<Cst, CompileError> {
        let expr = self.parse_expr()?;
        let start = expr.span();
        self.expect(&Token::Semi)?;
        let span = self.span_from(start);
        Ok(Cst::tree(Rule::ExprStmt, vec![expr], span))
    }

    fn parse_expr(&mut self) -> Result<Cst, CompileError> {
        self.enter(self.next_span())?;
        let inner = self.parse_sum();
        self.leave();
        let inner = inner?;
        let span = inner.span();
        Ok(Cst::tree(Rule::Expr, vec![inner], span))
    }

    fn parse_sum(&mut self) -> Result<Cst, CompileError> {
        let mut lhs = self.parse_product()?;
        let mut ops = 0;
        loop {
            let rule = match self.peek().map(|t| &t.node) {
                Some(Token::Plus) => Rule::Add,
                Some(Token::Minus) => Rule::Sub,
                _ => break,
            };
            ops += 1;
            self.check_chain(ops, self.next_span())?;
            self.advance();
            let rhs = self.parse_product()?;
            let span = lhs.span().to(rhs.span());
            lhs = Cst::tree(rule, vec![lhs, rhs], span);
        }
        Ok(lhs)
    }

    fn parse_product(&mut self) -> Result<Cst, CompileError> {
        let mut lhs = self.parse_atom()?;
        let mut ops = 0;
        loop {
            let rule = match self.peek().map(|t| &t.node) {
                Some(Token::Star) => Rule::Mul,
                Some(Token::Slash) => Rule::Div,
                _ => break,
            };
            ops += 1;
            self.check_chain(ops, self.next_span())?;
            self.advance();
            let rhs = self.parse_atom()?;
            let span = lhs.span().to(rhs.span());
            lhs = Cst::tree(rule, vec![lhs, rhs], span);
        }
        Ok(lhs)
    }

    fn parse_atom(&mut self) -> Result<Cst, CompileError> {
        let tok = match self.peek() {
            Some(tok) => tok.clone(),
            None => {
                return Err(CompileError::syntax(
                    "expected expression, found end of file",
                    self.eof_span(),
                ));
            }
        };
        match tok.node {
            Token::IntLit(n) => {
                self.advance();
                let leaf = Cst::leaf(LeafKind::Int, n.to_string(), tok.span);
                Ok(Cst::tree(Rule::IntLit, vec![leaf], tok.span))
            }
            Token::StringLit(s) => {
                self.advance();
                let leaf = Cst::leaf(LeafKind::Str, s, tok.span);
                Ok(Cst::tree(Rule::StrLit, vec![leaf], tok.span))
            }
            Token::Ident => {
                let ident = self.expect_ident()?;
                if self.peek_is(&Token::LParen) {
                    self.parse_call(ident)
                } else {
                    let span = ident.span();
                    Ok(Cst::tree(Rule::VariableRef, vec![ident], span))
                }
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            other => Err(CompileError::syntax(
                format!("expected expression, found {other}"),
                tok.span,
            )),
        }
    }

    fn parse_call(&mut self, callee: Cst) -> Result<Cst, CompileError> {
        let start = callee.span();
        self.expect(&Token::LParen)?;
        let mut children = vec![callee];
        if !self.peek_is(&Token::RParen) {
            children.push(self.parse_expr()?);
            while self.peek_is(&Token::Comma) {
                self.advance();
                children.push(self.parse_expr()?);
            }
        }
        self.expect(&Token::RParen)?;
        let span = self.span_from(start);
        Ok(Cst::tree(Rule::Call, children, span))
    }
}
