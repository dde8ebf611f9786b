//! Generic AST walker
//!
//! One traversal routine serves every pass over the tree:
//!
//! - [`walk`] visits each node exactly once: `pre_visit`, then every child in
//!   declared order, then `post_visit`.
//! - [`Visitor`] supplies the two hooks. Both default to [`ignore`], so a pass
//!   only overrides the node kinds it cares about.
//! - [`Callbacks`] adapts a pair of plain functions plus a caller-owned state
//!   value into a `Visitor`.
//!
//! ## Usage
//!
//! ```rust
//! use quack_front::ast::{Expr, Node};
//! use quack_front::visit::{walk, ignore, Visitor};
//!
//! struct VarCounter {
//!     count: usize,
//! }
//!
//! impl Visitor for VarCounter {
//!     type Error = std::convert::Infallible;
//!
//!     fn pre_visit(&mut self, node: Node<'_>) -> Result<(), Self::Error> {
//!         match node {
//!             Node::Expr(Expr::Var(_)) => self.count += 1,
//!             other => ignore(other),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let cst = quack_front::parse_source("x = y;").unwrap();
//! let program = quack_front::build_ast(&cst).unwrap();
//! let mut counter = VarCounter { count: 0 };
//! walk(Node::Program(&program), &mut counter).unwrap();
//! assert_eq!(counter.count, 2);
//! ```
//!
//! The walker knows nothing about individual passes; errors returned from a
//! hook abort the walk and are handed back unchanged.

use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::ast::{Child, Node};

/// Default hook action: nothing to do for this node kind.
pub fn ignore(node: Node<'_>) {
    debug!(kind = %node.kind(), "no visitor action");
}

/// [`ignore`] in the shape of a [`Callbacks`] hook.
pub fn ignore_node<S, E>(node: Node<'_>, _state: &mut S) -> Result<(), E> {
    ignore(node);
    Ok(())
}

/// Pre- and post-order hooks for [`walk`]. The visitor value itself is the
/// traversal state threaded through every call.
pub trait Visitor {
    type Error;

    fn pre_visit(&mut self, node: Node<'_>) -> Result<(), Self::Error> {
        ignore(node);
        Ok(())
    }

    fn post_visit(&mut self, node: Node<'_>) -> Result<(), Self::Error> {
        ignore(node);
        Ok(())
    }
}

/// Flatten nested child groups into one sequence, preserving order.
pub fn flatten<'a>(children: Vec<Child<'a>>) -> Vec<Node<'a>> {
    let mut flat = Vec::with_capacity(children.len());
    flatten_into(children, &mut flat);
    flat
}

fn flatten_into<'a>(children: Vec<Child<'a>>, out: &mut Vec<Node<'a>>) {
    for child in children {
        match child {
            Child::Node(node) => out.push(node),
            Child::Group(group) => flatten_into(group, out),
        }
    }
}

/// Visit `node` and everything below it: pre-order hook, children in
/// declared order, post-order hook. Stops at the first hook error.
pub fn walk<V: Visitor + ?Sized>(node: Node<'_>, visitor: &mut V) -> Result<(), V::Error> {
    visitor.pre_visit(node)?;
    for child in flatten(node.children()) {
        trace!(kind = %child.kind(), "visiting child");
        walk(child, visitor)?;
    }
    visitor.post_visit(node)
}

/// A [`Visitor`] built from two functions and a state value they share.
pub struct Callbacks<S, E, Pre, Post> {
    pub state: S,
    pre: Pre,
    post: Post,
    _error: PhantomData<fn() -> E>,
}

/// Hook type used by [`Callbacks::pre_order`] for the unused post-order side.
pub type NoHook<S, E> = fn(Node<'_>, &mut S) -> Result<(), E>;

impl<S, E, Pre, Post> Callbacks<S, E, Pre, Post>
where
    Pre: FnMut(Node<'_>, &mut S) -> Result<(), E>,
    Post: FnMut(Node<'_>, &mut S) -> Result<(), E>,
{
    pub fn new(state: S, pre: Pre, post: Post) -> Self {
        Self { state, pre, post, _error: PhantomData }
    }

    pub fn into_state(self) -> S {
        self.state
    }
}

impl<S, E, Pre> Callbacks<S, E, Pre, NoHook<S, E>>
where
    Pre: FnMut(Node<'_>, &mut S) -> Result<(), E>,
{
    /// Only a pre-order hook; post-order falls back to [`ignore`].
    pub fn pre_order(state: S, pre: Pre) -> Self {
        Self::new(state, pre, ignore_node::<S, E> as NoHook<S, E>)
    }
}

impl<S, E, Pre, Post> Visitor for Callbacks<S, E, Pre, Post>
where
    Pre: FnMut(Node<'_>, &mut S) -> Result<(), E>,
    Post: FnMut(Node<'_>, &mut S) -> Result<(), E>,
{
    type Error = E;

    fn pre_visit(&mut self, node: Node<'_>) -> Result<(), E> {
        (self.pre)(node, &mut self.state)
    }

    fn post_visit(&mut self, node: Node<'_>) -> Result<(), E> {
        (self.post)(node, &mut self.state)
    }
}
