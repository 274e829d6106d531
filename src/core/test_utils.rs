//! Parsing shortcuts for unit tests.

use swc_ecma_ast::{Decl, Expr, ModuleItem, Stmt};

use crate::core::parsers::jsx::{ParsedJSX, parse_jsx_source};

pub fn parse_module(code: &str) -> ParsedJSX {
    parse_jsx_source(code.to_string(), "test.tsx", Default::default())
        .expect("test source should parse")
}

/// Parse a single expression by binding it to a throwaway variable.
pub fn parse_expr(code: &str) -> Expr {
    let parsed = parse_module(&format!("const __expr = ({});", code));
    match parsed.module.body.into_iter().next() {
        Some(ModuleItem::Stmt(Stmt::Decl(Decl::Var(var)))) => var
            .decls
            .into_iter()
            .next()
            .and_then(|decl| decl.init)
            .map(|init| *init)
            .expect("declarator should have an initializer"),
        _ => panic!("expected a variable declaration"),
    }
}
