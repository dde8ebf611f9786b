//! Per-class symbol table: superclass, fields and method signatures.
//!
//! The table is filled by one pre-order walk of the AST
//! ([`SymbolTableBuilder`]), starting from a seed of builtin classes. Any
//! redeclared class or method aborts the whole build.

pub mod builtins;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ast::{Class, Method, Node, Program};
use crate::diagnostics::CompileError;
use crate::visit::{self, Visitor};

pub use builtins::{builtins, load_builtins};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolTable {
    classes: BTreeMap<String, ClassEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    /// `None` only for the root class.
    #[serde(rename = "super")]
    pub super_class: Option<String>,
    /// Always empty until field inference exists.
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub methods: BTreeMap<String, MethodSig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSig {
    pub params: Vec<String>,
    pub ret: String,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, class: &str) -> Option<&ClassEntry> {
        self.classes.get(class)
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Class entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassEntry)> {
        self.classes.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Look up one method signature.
    pub fn method(&self, class: &str, method: &str) -> Option<&MethodSig> {
        self.classes.get(class)?.methods.get(method)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Walk state for building a [`SymbolTable`]. Only the pre-order hook does
/// any work.
#[derive(Debug)]
pub struct SymbolTableBuilder {
    table: SymbolTable,
    current_class: Option<String>,
}

impl SymbolTableBuilder {
    pub fn new(seed: SymbolTable) -> Self {
        Self { table: seed, current_class: None }
    }

    pub fn finish(self) -> SymbolTable {
        self.table
    }

    fn enter_class(&mut self, class: &Class) -> Result<(), CompileError> {
        let name = &class.name.node;
        if self.table.contains(name) {
            return Err(CompileError::duplicate_class(name.as_str(), class.name.span));
        }
        debug!(class = %name, super_class = %class.super_class.node, "declare class");
        self.table.classes.insert(
            name.clone(),
            ClassEntry {
                super_class: Some(class.super_class.node.clone()),
                fields: Vec::new(),
                methods: BTreeMap::new(),
            },
        );
        self.current_class = Some(name.clone());
        Ok(())
    }

    fn enter_method(&mut self, method: &Method) -> Result<(), CompileError> {
        let Some(class) = self.current_class.as_deref() else {
            warn!(method = %method.name.node, "method outside any class, skipped");
            return Ok(());
        };
        let Some(entry) = self.table.classes.get_mut(class) else {
            warn!(class, method = %method.name.node, "current class missing from table");
            return Ok(());
        };
        let name = &method.name.node;
        if entry.methods.contains_key(name) {
            return Err(CompileError::duplicate_method(class, name.as_str(), method.name.span));
        }
        debug!(class, method = %name, "declare method");
        entry.methods.insert(
            name.clone(),
            MethodSig { params: method.param_types(), ret: method.returns.node.clone() },
        );
        Ok(())
    }
}

impl Visitor for SymbolTableBuilder {
    type Error = CompileError;

    fn pre_visit(&mut self, node: Node<'_>) -> Result<(), CompileError> {
        match node {
            Node::Class(class) => self.enter_class(class),
            Node::Method(method) => self.enter_method(method),
            other => {
                visit::ignore(other);
                Ok(())
            }
        }
    }
}

/// Build the symbol table for `program`, starting from `seed`.
pub fn build_symbol_table(program: &Program, seed: SymbolTable) -> Result<SymbolTable, CompileError> {
    let mut builder = SymbolTableBuilder::new(seed);
    visit::walk(Node::Program(program), &mut builder)?;
    Ok(builder.finish())
}
