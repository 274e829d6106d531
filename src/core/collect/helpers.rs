//! Helper functions for AST node extraction.
//!
//! Pure functions with no state, shared by the declaration collector, the key
//! tree builder and the reference resolver.

use swc_ecma_ast::{Expr, Lit, ObjectPatProp, Pat, PropName};

/// Unwrap TypeScript-specific expression wrappers to get the inner expression.
pub fn unwrap_ts_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::TsAs(ts_as) => unwrap_ts_expr(&ts_as.expr),
        Expr::TsConstAssertion(ts_const) => unwrap_ts_expr(&ts_const.expr),
        Expr::TsSatisfies(ts_sat) => unwrap_ts_expr(&ts_sat.expr),
        Expr::TsNonNull(ts_non_null) => unwrap_ts_expr(&ts_non_null.expr),
        Expr::TsTypeAssertion(ts_assert) => unwrap_ts_expr(&ts_assert.expr),
        Expr::Paren(paren) => unwrap_ts_expr(&paren.expr),
        _ => expr,
    }
}

/// Extract a string value from a string literal or an expression-free template.
pub fn extract_string_value(expr: &Expr) -> Option<String> {
    match unwrap_ts_expr(expr) {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(|s| s.to_string()),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
            .quasis
            .first()
            .and_then(|q| q.cooked.as_ref())
            .and_then(|s| s.as_str().map(|s| s.to_string())),
        _ => None,
    }
}

/// Extract a property name that is known statically.
///
/// `a`, `"a"`, `1`, `["a"]` and `[1]` are static; any other computed key is not.
pub fn extract_prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(|s| s.to_string()),
        PropName::Num(n) => Some(n.value.to_string()),
        PropName::Computed(computed) => extract_static_index(&computed.expr),
        PropName::BigInt(_) => None,
    }
}

/// Extract the statically known key of a computed index (`obj["a"]`, `obj[0]`).
pub fn extract_static_index(expr: &Expr) -> Option<String> {
    match unwrap_ts_expr(expr) {
        Expr::Lit(Lit::Num(n)) => Some(n.value.to_string()),
        other => extract_string_value(other),
    }
}

/// Collect every identifier a binding pattern introduces.
pub fn extract_binding_names(pat: &Pat) -> Vec<String> {
    match pat {
        Pat::Ident(binding) => vec![binding.id.sym.to_string()],
        Pat::Object(obj) => obj
            .props
            .iter()
            .flat_map(|prop| match prop {
                ObjectPatProp::KeyValue(kv) => extract_binding_names(&kv.value),
                ObjectPatProp::Assign(assign) => vec![assign.key.id.sym.to_string()],
                ObjectPatProp::Rest(rest) => extract_binding_names(&rest.arg),
            })
            .collect(),
        Pat::Array(arr) => arr
            .elems
            .iter()
            .flatten()
            .flat_map(extract_binding_names)
            .collect(),
        Pat::Assign(assign) => extract_binding_names(&assign.left),
        Pat::Rest(rest) => extract_binding_names(&rest.arg),
        Pat::Expr(_) | Pat::Invalid(_) => Vec::new(),
    }
}

/// Short human description of an expression, used in build diagnostics.
pub fn describe_expr(expr: &Expr) -> &'static str {
    match unwrap_ts_expr(expr) {
        Expr::Lit(Lit::Str(_)) => "string literal",
        Expr::Lit(Lit::Num(_)) => "number literal",
        Expr::Lit(Lit::Bool(_)) => "boolean literal",
        Expr::Lit(Lit::Null(_)) => "null",
        Expr::Lit(_) => "literal",
        Expr::Tpl(_) => "template literal with expressions",
        Expr::Array(_) => "array literal",
        Expr::Object(_) => "object literal",
        Expr::Ident(_) => "identifier",
        Expr::Call(_) => "call expression",
        Expr::Member(_) | Expr::OptChain(_) => "member expression",
        Expr::Arrow(_) | Expr::Fn(_) => "function",
        Expr::Cond(_) => "conditional expression",
        _ => "expression",
    }
}
