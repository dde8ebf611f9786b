//! Property-based tests for AST and symbol table invariants.
//!
//! These tests use proptest to check front-end invariants across a wide
//! variety of generated Quack programs.

use proptest::prelude::*;
use quack_front::ast::{CONSTRUCTOR, MAIN_CLASS};
use quack_front::diagnostics::CompileError;
use quack_front::lexer::is_keyword;
use quack_front::pretty::pretty_print;
use quack_front::symtab::SymbolTable;

fn arb_identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_filter("keywords are reserved", |s| !is_keyword(s))
}

fn arb_type_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Int".to_string()),
        Just("String".to_string()),
        Just("Obj".to_string()),
        "[A-Z][a-z]{0,6}",
    ]
}

fn arb_atom() -> impl Strategy<Value = String> {
    prop_oneof![
        (0i64..1000).prop_map(|n| n.to_string()),
        "[a-zA-Z ]{0,12}".prop_map(|s| format!("\"{s}\"")),
        arb_identifier(),
    ]
}

fn arb_expr() -> impl Strategy<Value = String> {
    arb_atom().prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            (inner.clone(), prop_oneof![Just("+"), Just("-"), Just("*"), Just("/")], inner.clone())
                .prop_map(|(l, op, r)| format!("({l} {op} {r})")),
            (arb_identifier(), prop::collection::vec(inner, 0..3))
                .prop_map(|(f, args)| format!("{f}({})", args.join(", "))),
        ]
    })
}

fn arb_statement() -> impl Strategy<Value = String> {
    let simple = prop_oneof![
        (arb_identifier(), arb_expr()).prop_map(|(x, e)| format!("{x} = {e};")),
        arb_expr().prop_map(|e| format!("{e};")),
    ];
    simple.prop_recursive(2, 8, 3, |inner| {
        (arb_expr(), prop::collection::vec(inner.clone(), 0..3), prop::collection::vec(inner, 0..3))
            .prop_map(|(c, then, other)| {
                format!("if {c} {{ {} }} else {{ {} }}", then.join(" "), other.join(" "))
            })
    })
}

fn arb_formals() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map(arb_identifier(), arb_type_name(), 0..4)
        .prop_map(|m| m.into_iter().collect())
}

fn render_formals(formals: &[(String, String)]) -> String {
    formals.iter().map(|(n, t)| format!("{n}: {t}")).collect::<Vec<_>>().join(", ")
}

fn arb_method(name: String) -> impl Strategy<Value = String> {
    (arb_formals(), prop::option::of(arb_type_name()), prop::collection::vec(arb_statement(), 0..3))
        .prop_map(move |(formals, ret, body)| {
            let ret = ret.map(|r| format!(": {r}")).unwrap_or_default();
            format!("def {name}({}){ret} {{ {} }}", render_formals(&formals), body.join(" "))
        })
}

/// A class with distinct method names.
fn arb_class(name: String) -> impl Strategy<Value = String> {
    (
        arb_formals(),
        prop::option::of(arb_type_name()),
        prop::collection::btree_set(arb_identifier(), 0..3),
        prop::collection::vec(arb_statement(), 0..3),
    )
        .prop_flat_map(move |(formals, sup, method_names, body)| {
            let name = name.clone();
            let methods: Vec<_> = method_names.into_iter().map(arb_method).collect();
            methods.prop_map(move |methods| {
                let sup = sup.as_ref().map(|s| format!(" extends {s}")).unwrap_or_default();
                format!(
                    "class {name}({}){sup} {{ {} {} }}",
                    render_formals(&formals),
                    methods.join(" "),
                    body.join(" ")
                )
            })
        })
}

/// Class names that never collide with each other.
fn arb_class_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[A-Z][a-z]{1,6}", 0..4).prop_map(|s| s.into_iter().collect())
}

fn arb_program() -> impl Strategy<Value = (Vec<String>, String)> {
    arb_class_names().prop_flat_map(|names| {
        let classes: Vec<_> = names.iter().cloned().map(arb_class).collect();
        (Just(names), classes, prop::collection::vec(arb_statement(), 0..4))
            .prop_map(|(names, classes, stmts)| (names, format!("{}\n{}", classes.join("\n"), stmts.join("\n"))))
    })
}

proptest! {
    /// Property: the synthesized main class is always present and last.
    #[test]
    fn prop_main_class_is_last((names, source) in arb_program()) {
        let (program, _) = quack_front::front_end(&source, SymbolTable::new()).unwrap();
        prop_assert_eq!(program.classes.len(), names.len() + 1);
        let last = program.classes.last().unwrap();
        prop_assert_eq!(last.name.node.as_str(), MAIN_CLASS);
        prop_assert!(last.methods.is_empty());
    }

    /// Property: every class gets an entry with a constructor signature
    /// matching its formals.
    #[test]
    fn prop_every_class_in_symbol_table((names, source) in arb_program()) {
        let (program, table) = quack_front::front_end(&source, SymbolTable::new()).unwrap();
        prop_assert_eq!(table.len(), names.len() + 1);
        for class in &program.classes {
            let entry = table.get(&class.name.node).unwrap();
            prop_assert!(entry.fields.is_empty());
            prop_assert_eq!(entry.methods.len(), class.methods.len() + 1);
            let ctor = &entry.methods[CONSTRUCTOR];
            prop_assert_eq!(&ctor.params, &class.constructor.param_types());
        }
    }

    /// Property: building twice from the same source gives identical results.
    #[test]
    fn prop_front_end_is_deterministic((_names, source) in arb_program()) {
        let (p1, t1) = quack_front::front_end(&source, SymbolTable::new()).unwrap();
        let (p2, t2) = quack_front::front_end(&source, SymbolTable::new()).unwrap();
        prop_assert_eq!(p1, p2);
        prop_assert_eq!(t1.to_json().unwrap(), t2.to_json().unwrap());
    }

    /// Property: declaring any class name twice is always a DuplicateClass.
    #[test]
    fn prop_duplicate_class_always_rejected(
        (names, source) in arb_program().prop_filter("need a class", |(n, _)| !n.is_empty()),
        pick in any::<prop::sample::Index>(),
    ) {
        let dup = pick.get(&names);
        let source = format!("class {dup}() {{ }}\n{source}");
        let err = quack_front::front_end(&source, SymbolTable::new()).unwrap_err();
        prop_assert!(
            matches!(err, CompileError::DuplicateClass { ref name, .. } if name == dup),
            "unexpected error: {err}"
        );
    }

    /// Property: pretty-printed output parses back to the same text.
    #[test]
    fn prop_pretty_print_is_stable((_names, source) in arb_program()) {
        let (program, _) = quack_front::front_end(&source, SymbolTable::new()).unwrap();
        let first = pretty_print(&program);
        let (reparsed, _) = quack_front::front_end(&first, SymbolTable::new()).unwrap();
        prop_assert_eq!(pretty_print(&reparsed), first);
    }
}
