//! Translate declaration collection.
//!
//! Finds every module-level `const LABELS = translate({ ... })` and remembers
//! which local names refer to a configured translate function, including
//! renamed imports:
//!
//! ```typescript
//! import { translate as t } from "@foo/i18n";
//! const LABELS = t({ bird: "i18n.bird" }); // recognized
//! ```

use std::collections::HashSet;

use swc_common::Span;
use swc_ecma_ast::{
    CallExpr, Callee, Decl, Expr, ImportDecl, ImportSpecifier, ModuleDecl, ModuleExportName,
    ModuleItem, Pat, Stmt, VarDecl,
};

use crate::core::collect::helpers::unwrap_ts_expr;

/// A `translate(...)` call bound to a module-level identifier.
#[derive(Debug, Clone, Copy)]
pub struct TranslateDeclaration<'a> {
    /// Local variable name (e.g. "LABELS").
    pub binding: &'a str,
    /// Span of the binding identifier.
    pub span: Span,
    /// The recognized call expression.
    pub call: &'a CallExpr,
}

/// Collect all translate declarations of a module, in source order.
pub fn collect_translate_declarations<'a>(
    items: &'a [ModuleItem],
    translate_functions: &[String],
) -> Vec<TranslateDeclaration<'a>> {
    let callee_names = collect_translate_callee_names(items, translate_functions);

    items
        .iter()
        .filter_map(|item| match item {
            ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => Some(&**var),
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
                Decl::Var(var) => Some(&**var),
                _ => None,
            },
            _ => None,
        })
        .flat_map(|var| declarations_in(var, &callee_names))
        .collect()
}

/// Local names that call a translate function: configured names plus local
/// names of imports whose imported name is configured.
fn collect_translate_callee_names(
    items: &[ModuleItem],
    translate_functions: &[String],
) -> HashSet<String> {
    let mut names: HashSet<String> = translate_functions.iter().cloned().collect();

    for item in items {
        if let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item {
            collect_import(import, translate_functions, &mut names);
        }
    }

    names
}

fn collect_import(import: &ImportDecl, translate_functions: &[String], names: &mut HashSet<String>) {
    for specifier in &import.specifiers {
        if let ImportSpecifier::Named(named) = specifier {
            let imported = match &named.imported {
                Some(ModuleExportName::Ident(ident)) => ident.sym.to_string(),
                Some(ModuleExportName::Str(s)) => match s.value.as_str() {
                    Some(v) => v.to_string(),
                    None => continue,
                },
                None => named.local.sym.to_string(),
            };
            if translate_functions.contains(&imported) {
                names.insert(named.local.sym.to_string());
            }
        }
    }
}

fn declarations_in<'a>(
    var: &'a VarDecl,
    callee_names: &HashSet<String>,
) -> Vec<TranslateDeclaration<'a>> {
    var.decls
        .iter()
        .filter_map(|decl| {
            let Pat::Ident(binding) = &decl.name else {
                return None;
            };
            let Expr::Call(call) = unwrap_ts_expr(decl.init.as_deref()?) else {
                return None;
            };
            if !is_translate_call(call, callee_names) {
                return None;
            }
            Some(TranslateDeclaration {
                binding: binding.id.sym.as_str(),
                span: binding.id.span,
                call,
            })
        })
        .collect()
}

fn is_translate_call(call: &CallExpr, callee_names: &HashSet<String>) -> bool {
    match &call.callee {
        Callee::Expr(expr) => match unwrap_ts_expr(expr) {
            Expr::Ident(ident) => callee_names.contains(ident.sym.as_str()),
            _ => false,
        },
        _ => false,
    }
}
