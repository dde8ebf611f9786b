//! Walker behaviour over ASTs built from real source.

mod common;

use std::convert::Infallible;

use common::program;
use quack_front::ast::{Expr, Node, NodeKind, Stmt};
use quack_front::visit::{flatten, walk, Callbacks, Visitor};

/// Collects `kind` (or `kind:name`) for every pre- and post-order call.
#[derive(Default)]
struct Trace {
    pre: Vec<String>,
    post: Vec<String>,
}

fn label(node: Node<'_>) -> String {
    match node.name() {
        Some(name) => format!("{}:{name}", node.kind()),
        None => node.kind().to_string(),
    }
}

impl Visitor for Trace {
    type Error = Infallible;

    fn pre_visit(&mut self, node: Node<'_>) -> Result<(), Infallible> {
        self.pre.push(label(node));
        Ok(())
    }

    fn post_visit(&mut self, node: Node<'_>) -> Result<(), Infallible> {
        self.post.push(label(node));
        Ok(())
    }
}

#[test]
fn pre_order_follows_declared_child_order() {
    let program = program("class P(a: Int) { def get(): Int { r = a; } } p = P(1);");
    let mut trace = Trace::default();
    walk(Node::Program(&program), &mut trace).unwrap();
    assert_eq!(
        trace.pre,
        vec![
            "Program",
            "Class:P",
            "Method:get",
            "Block",
            "Assignment",
            "VariableRef:r",
            "Leaf",
            "VariableRef:a",
            "Method:$constructor",
            "Formal:a",
            "Block",
            "Class:$Main",
            "Method:$constructor",
            "Block",
            "Assignment",
            "VariableRef:p",
            "Leaf",
            "MethodCall:P",
            "Leaf",
            "IntLit",
        ]
    );
}

#[test]
fn post_order_visits_children_before_parent() {
    let program = program("x = f(1, y);");
    let mut trace = Trace::default();
    walk(Node::Program(&program), &mut trace).unwrap();
    assert_eq!(
        trace.post,
        vec![
            "VariableRef:x",
            "IntLit",
            "Leaf",
            "VariableRef:y",
            "Leaf",
            "MethodCall:f",
            "Leaf",
            "Assignment",
            "Block",
            "Method:$constructor",
            "Class:$Main",
            "Program",
        ]
    );
    assert_eq!(trace.pre.len(), trace.post.len());
}

#[test]
fn if_statement_walks_cond_then_else() {
    let program = program("if c { a; } else { b; }");
    let stmt = &program.main_class().constructor.body.stmts[0];
    let mut trace = Trace::default();
    walk(Node::Stmt(stmt), &mut trace).unwrap();
    let vars: Vec<_> = trace.pre.iter().filter(|l| l.starts_with("VariableRef")).cloned().collect();
    assert_eq!(vars, vec!["VariableRef:c", "VariableRef:a", "VariableRef:b"]);
}

#[test]
fn flatten_matches_walk_children() {
    let program = program("class A() { def f() { } def g() { } }");
    let class = &program.classes[0];
    let names: Vec<_> = flatten(Node::Class(class).children())
        .into_iter()
        .filter_map(|n| n.name())
        .collect();
    assert_eq!(names, vec!["f", "g", "$constructor"]);
}

#[test]
fn callbacks_count_call_sites() {
    let program = program("a = PLUS(1, 2); b = 3 + 4 * 5; print(b);");
    let mut visitor = Callbacks::pre_order(0usize, |node: Node<'_>, calls: &mut usize| {
        if node.kind() == NodeKind::MethodCall {
            *calls += 1;
        }
        Ok::<(), Infallible>(())
    });
    walk(Node::Program(&program), &mut visitor).unwrap();
    assert_eq!(visitor.into_state(), 4);
}

#[test]
fn walks_over_one_tree_are_independent() {
    let program = program("class A() { } x = 1;");
    let mut first = Trace::default();
    let mut second = Trace::default();
    walk(Node::Program(&program), &mut first).unwrap();
    walk(Node::Program(&program), &mut second).unwrap();
    assert_eq!(first.pre, second.pre);
    assert_eq!(first.post, second.post);
}

#[test]
fn error_stops_before_later_siblings() {
    let program = program("a; stop; c;");
    let mut visitor = Callbacks::pre_order(Vec::new(), |node: Node<'_>, seen: &mut Vec<String>| {
        if let Node::Expr(Expr::Var(v)) = node {
            seen.push(v.node.clone());
            if v.node == "stop" {
                return Err(format!("stopped at {}", v.node));
            }
        }
        Ok(())
    });
    let err = walk(Node::Program(&program), &mut visitor).unwrap_err();
    assert_eq!(err, "stopped at stop");
    assert_eq!(visitor.state, vec!["a", "stop"]);
}

#[test]
fn default_visitor_touches_nothing() {
    struct Quiet;
    impl Visitor for Quiet {
        type Error = Infallible;
    }
    let program = program("class A(x: Int) { def f(): Int { if x { y = 1; } } }");
    assert!(walk(Node::Program(&program), &mut Quiet).is_ok());
    assert!(matches!(program.classes[0].methods[0].body.stmts[0], Stmt::If { .. }));
}
