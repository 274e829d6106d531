//! Reference Resolver: finds every expression that can reach a translate binding.
//!
//! Walks the module once per binding, following the binding through aliases,
//! and turns each reference into an [`AccessPath`]:
//!
//! | Source                               | Path                   |
//! |--------------------------------------|------------------------|
//! | `<p>{LABELS.a.b}</p>`                | `.a.b*subtree*`        |
//! | `LABELS.size[size]`                  | `.size[computed]*subtree*` |
//! | `LABELS.getDesc()`                   | `.getDesc(call)`       |
//! | `<Comp labels={LABELS.a} />`         | `.a*subtree*`          |
//!
//! Member assignments (`LABELS.a = ...`) are writes and produce no path.

pub mod scope;

use std::fmt;

use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    ArrayPat, ArrowExpr, AssignExpr, AssignOp, AssignTarget, AssignTargetPat, BinaryOp,
    BlockStmt, Callee, CatchClause, ClassDecl, Decl, ExportDecl, Expr, ExprOrSpread, FnDecl,
    Function, MemberExpr, MemberProp, Module, ModuleDecl, ModuleItem, ObjectPat, ObjectPatProp,
    OptChainBase, Pat, Prop, PropName, SimpleAssignTarget, Stmt, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};
use tracing::{debug, trace};

use crate::core::collect::helpers::{
    extract_binding_names, extract_prop_name, extract_static_index, unwrap_ts_expr,
};
use crate::core::{Locator, SourceContext};
use scope::AliasScopes;

/// One step of an access path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// `.name`, or a computed access with a literal index.
    Member(String),
    /// `[expr]` with an index that is not known statically.
    Computed,
    /// `(...)`: the value was invoked.
    Call,
    /// The value escaped as a whole (JSX child, argument, return, spread...).
    Subtree,
}

/// A resolved reference, relative to the root binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPath {
    pub segments: Vec<Segment>,
    /// Location of the referencing expression.
    pub context: SourceContext,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Member(name) => write!(f, ".{}", name),
            Segment::Computed => write!(f, "[computed]"),
            Segment::Call => write!(f, "(call)"),
            Segment::Subtree => write!(f, "*subtree*"),
        }
    }
}

impl fmt::Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Resolve every reference to `binding` (and its aliases) in `module`.
///
/// Paths are returned in source order of the referencing expressions.
/// Module-level aliases are visible everywhere in the module, including
/// functions written above their declaration.
pub fn resolve(module: &Module, binding: &str, locator: Locator<'_>) -> Vec<AccessPath> {
    let mut resolver = ReferenceResolver {
        locator,
        scopes: AliasScopes::new(binding),
        paths: Vec::new(),
        seeding: false,
    };
    resolver.seed_module_aliases(module);
    module.visit_with(&mut resolver);
    debug!(
        file = locator.file_path(),
        binding,
        paths = resolver.paths.len(),
        "resolved references"
    );
    resolver.paths
}

type Chains = Vec<Vec<Segment>>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum BindMode {
    Declare,
    Assign,
}

struct ReferenceResolver<'a> {
    locator: Locator<'a>,
    scopes: AliasScopes,
    paths: Vec<AccessPath>,
    /// Set while pre-binding module-level aliases; nothing is recorded.
    seeding: bool,
}

impl ReferenceResolver<'_> {
    /// Bind every module-level alias declarator before the walk.
    ///
    /// Declarators may refer to aliases declared below them, so binding is
    /// repeated until no new alias appears.
    fn seed_module_aliases(&mut self, module: &Module) {
        let declarators: Vec<&VarDeclarator> = module
            .body
            .iter()
            .filter_map(|item| match item {
                ModuleItem::Stmt(Stmt::Decl(Decl::Var(var)))
                | ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                    decl: Decl::Var(var),
                    ..
                })) => Some(var),
                _ => None,
            })
            .flat_map(|var| var.decls.iter())
            .collect();

        self.seeding = true;
        for round in 0..=declarators.len() {
            let before = self.scopes.alias_count();
            for declarator in &declarators {
                let Some(init) = &declarator.init else {
                    continue;
                };
                if let Some(chains) = self.alias_chains(init, &mut Vec::new()) {
                    self.bind_pattern(&declarator.name, chains, BindMode::Declare);
                }
            }
            if self.scopes.alias_count() == before {
                trace!(round, aliases = before, "module aliases seeded");
                break;
            }
        }
        self.seeding = false;
    }

    /// Resolve `expr` to key tree chains.
    ///
    /// Sub-expressions that are not part of the chain (dynamic indexes, call
    /// arguments, ternary tests) are pushed to `inner` for the caller to walk.
    fn chains_of<'e>(&self, expr: &'e Expr, inner: &mut Vec<&'e Expr>) -> Option<Chains> {
        match unwrap_ts_expr(expr) {
            Expr::Ident(ident) => self.scopes.lookup(ident.sym.as_str()).map(<[_]>::to_vec),
            Expr::Member(member) => self.member_chains(member, inner),
            Expr::Call(call) => match &call.callee {
                Callee::Expr(callee) => self.call_chains(callee, &call.args, inner),
                _ => None,
            },
            Expr::OptChain(chain) => match &*chain.base {
                OptChainBase::Member(member) => self.member_chains(member, inner),
                OptChainBase::Call(call) => self.call_chains(&call.callee, &call.args, inner),
            },
            Expr::Cond(cond) => {
                let chains = self.alternatives([&*cond.cons, &*cond.alt], inner)?;
                inner.push(&cond.test);
                Some(chains)
            }
            Expr::Bin(bin)
                if matches!(
                    bin.op,
                    BinaryOp::LogicalOr | BinaryOp::LogicalAnd | BinaryOp::NullishCoalescing
                ) =>
            {
                self.alternatives([&*bin.left, &*bin.right], inner)
            }
            _ => None,
        }
    }

    fn member_chains<'e>(
        &self,
        member: &'e MemberExpr,
        inner: &mut Vec<&'e Expr>,
    ) -> Option<Chains> {
        let mut chains = self.chains_of(&member.obj, inner)?;
        // Access on a call result is access on the translated string.
        if chains.iter().any(|c| c.last() == Some(&Segment::Call)) {
            return None;
        }

        let segment = match &member.prop {
            MemberProp::Ident(ident) => Segment::Member(ident.sym.to_string()),
            MemberProp::PrivateName(name) => Segment::Member(format!("#{}", name.name)),
            MemberProp::Computed(computed) => match extract_static_index(&computed.expr) {
                Some(index) => Segment::Member(index),
                None => {
                    inner.push(&computed.expr);
                    Segment::Computed
                }
            },
        };
        for chain in &mut chains {
            chain.push(segment.clone());
        }
        Some(chains)
    }

    fn call_chains<'e>(
        &self,
        callee: &'e Expr,
        args: &'e [ExprOrSpread],
        inner: &mut Vec<&'e Expr>,
    ) -> Option<Chains> {
        let mut chains = self.chains_of(callee, inner)?;
        if chains.iter().any(|c| c.last() == Some(&Segment::Call)) {
            return None;
        }
        inner.extend(args.iter().map(|arg| &*arg.expr));
        for chain in &mut chains {
            chain.push(Segment::Call);
        }
        Some(chains)
    }

    /// Branches of a ternary or logical expression, resolved independently.
    fn alternatives<'e>(
        &self,
        branches: [&'e Expr; 2],
        inner: &mut Vec<&'e Expr>,
    ) -> Option<Chains> {
        let mut chains = Vec::new();
        let mut unresolved = Vec::new();
        for branch in branches {
            let mut branch_inner = Vec::new();
            match self.chains_of(branch, &mut branch_inner) {
                Some(found) => {
                    chains.extend(found);
                    inner.extend(branch_inner);
                }
                None => unresolved.push(branch),
            }
        }
        if chains.is_empty() {
            return None;
        }
        inner.extend(unresolved);
        Some(chains)
    }

    /// Chains of an expression that can be bound to a variable as an alias.
    ///
    /// Call results are strings, not key tree nodes, so they never alias.
    fn alias_chains<'e>(&self, expr: &'e Expr, inner: &mut Vec<&'e Expr>) -> Option<Chains> {
        self.chains_of(expr, inner)
            .filter(|chains| chains.iter().all(|c| c.last() != Some(&Segment::Call)))
    }

    fn record(&mut self, chains: Chains, span: Span) {
        if self.seeding {
            return;
        }
        let context = self.locator.locate(span);
        for mut segments in chains {
            if segments.last() != Some(&Segment::Call) {
                segments.push(Segment::Subtree);
            }
            let path = AccessPath {
                segments,
                context: context.clone(),
            };
            trace!(path = %path, line = context.line(), "reference");
            self.paths.push(path);
        }
    }

    fn visit_all(&mut self, exprs: Vec<&Expr>) {
        for expr in exprs {
            expr.visit_with(self);
        }
    }

    fn shadow_pat(&mut self, pat: &Pat) {
        for name in extract_binding_names(pat) {
            self.scopes.shadow(&name);
        }
    }

    fn bind(&mut self, name: &str, chains: Chains, mode: BindMode) {
        trace!(name, "alias");
        match mode {
            BindMode::Declare => self.scopes.declare_alias(name, chains),
            BindMode::Assign => self.scopes.assign_alias(name, chains),
        }
    }

    /// Bind every name a pattern introduces to the matching part of `chains`.
    fn bind_pattern(&mut self, pat: &Pat, chains: Chains, mode: BindMode) {
        match pat {
            Pat::Ident(binding) => self.bind(binding.id.sym.as_str(), chains, mode),
            Pat::Object(object) => self.bind_object(object, &chains, mode),
            Pat::Array(array) => self.bind_array(array, &chains, mode),
            Pat::Assign(assign) => {
                assign.right.visit_with(self);
                self.bind_pattern(&assign.left, chains, mode);
            }
            Pat::Rest(rest) => self.bind_pattern(&rest.arg, chains, mode),
            Pat::Expr(expr) => expr.visit_with(self),
            Pat::Invalid(_) => {}
        }
    }

    fn bind_object(&mut self, object: &ObjectPat, chains: &Chains, mode: BindMode) {
        for prop in &object.props {
            match prop {
                ObjectPatProp::KeyValue(kv) => {
                    let segment = match extract_prop_name(&kv.key) {
                        Some(name) => Segment::Member(name),
                        None => {
                            if let PropName::Computed(computed) = &kv.key {
                                computed.expr.visit_with(self);
                            }
                            Segment::Computed
                        }
                    };
                    self.bind_pattern(&kv.value, extend(chains, segment), mode);
                }
                ObjectPatProp::Assign(assign) => {
                    if let Some(default) = &assign.value {
                        default.visit_with(self);
                    }
                    let name = assign.key.id.sym.as_str();
                    let segment = Segment::Member(name.to_string());
                    self.bind(name, extend(chains, segment), mode);
                }
                // `...rest` stands for the whole source node.
                ObjectPatProp::Rest(rest) => self.bind_pattern(&rest.arg, chains.clone(), mode),
            }
        }
    }

    fn bind_array(&mut self, array: &ArrayPat, chains: &Chains, mode: BindMode) {
        for (index, elem) in array.elems.iter().enumerate() {
            match elem {
                Some(Pat::Rest(rest)) => self.bind_pattern(&rest.arg, chains.clone(), mode),
                Some(pat) => {
                    let segment = Segment::Member(index.to_string());
                    self.bind_pattern(pat, extend(chains, segment), mode);
                }
                None => {}
            }
        }
    }
}

fn extend(chains: &Chains, segment: Segment) -> Chains {
    chains
        .iter()
        .map(|chain| {
            let mut chain = chain.clone();
            chain.push(segment.clone());
            chain
        })
        .collect()
}

impl Visit for ReferenceResolver<'_> {
    fn visit_expr(&mut self, node: &Expr) {
        let mut inner = Vec::new();
        match self.chains_of(node, &mut inner) {
            Some(chains) => {
                self.record(chains, node.span());
                self.visit_all(inner);
            }
            None => node.visit_children_with(self),
        }
    }

    fn visit_prop(&mut self, node: &Prop) {
        // `{ LABELS }` forwards the whole value.
        if let Prop::Shorthand(ident) = node
            && let Some(chains) = self.scopes.lookup(ident.sym.as_str())
        {
            let chains = chains.to_vec();
            self.record(chains, ident.span);
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        if let Some(init) = &node.init {
            let mut inner = Vec::new();
            if let Some(chains) = self.alias_chains(init, &mut inner) {
                self.visit_all(inner);
                self.bind_pattern(&node.name, chains, BindMode::Declare);
                return;
            }
            init.visit_with(self);
        }
        node.name.visit_with(self);
        self.shadow_pat(&node.name);
    }

    fn visit_assign_expr(&mut self, node: &AssignExpr) {
        let mut inner = Vec::new();
        match &node.left {
            AssignTarget::Simple(SimpleAssignTarget::Ident(binding))
                if node.op == AssignOp::Assign =>
            {
                match self.alias_chains(&node.right, &mut inner) {
                    Some(chains) => {
                        self.visit_all(inner);
                        self.bind(binding.id.sym.as_str(), chains, BindMode::Assign);
                    }
                    None => node.right.visit_with(self),
                }
            }
            AssignTarget::Simple(SimpleAssignTarget::Member(member)) => {
                match self.member_chains(member, &mut inner) {
                    Some(chains) => {
                        // `LABELS.a += x` reads before writing; `LABELS.a = x` only writes.
                        if node.op != AssignOp::Assign {
                            self.record(chains, member.span);
                        }
                        self.visit_all(inner);
                        node.right.visit_with(self);
                    }
                    None => node.visit_children_with(self),
                }
            }
            AssignTarget::Pat(pat) if node.op == AssignOp::Assign => {
                match self.alias_chains(&node.right, &mut inner) {
                    Some(chains) => {
                        self.visit_all(inner);
                        match pat {
                            AssignTargetPat::Object(object) => {
                                self.bind_object(object, &chains, BindMode::Assign)
                            }
                            AssignTargetPat::Array(array) => {
                                self.bind_array(array, &chains, BindMode::Assign)
                            }
                            AssignTargetPat::Invalid(_) => {}
                        }
                    }
                    None => node.visit_children_with(self),
                }
            }
            _ => node.visit_children_with(self),
        }
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.scopes.shadow(node.ident.sym.as_str());
        node.function.visit_with(self);
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.scopes.shadow(node.ident.sym.as_str());
        node.class.visit_with(self);
    }

    fn visit_function(&mut self, node: &Function) {
        self.scopes.enter_scope();
        for param in &node.params {
            self.shadow_pat(&param.pat);
        }
        node.visit_children_with(self);
        self.scopes.exit_scope();
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        self.scopes.enter_scope();
        for param in &node.params {
            self.shadow_pat(param);
        }
        node.visit_children_with(self);
        self.scopes.exit_scope();
    }

    fn visit_block_stmt(&mut self, node: &BlockStmt) {
        self.scopes.enter_scope();
        node.visit_children_with(self);
        self.scopes.exit_scope();
    }

    fn visit_catch_clause(&mut self, node: &CatchClause) {
        self.scopes.enter_scope();
        if let Some(param) = &node.param {
            self.shadow_pat(param);
        }
        node.visit_children_with(self);
        self.scopes.exit_scope();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::core::Locator;
    use crate::core::resolve::*;
    use crate::core::test_utils::parse_module;

    const DECL: &str = r#"const LABELS = translate({ a: "i18n.a" });"#;

    fn resolve_source(code: &str) -> Vec<AccessPath> {
        let parsed = parse_module(&format!("{}\n{}", DECL, code));
        let locator = Locator::new("test.tsx", &parsed.source_map);
        resolve(&parsed.module, "LABELS", locator)
    }

    fn paths(code: &str) -> Vec<String> {
        resolve_source(code).iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_declaration_alone_has_no_references() {
        assert!(paths("").is_empty());
    }

    #[test]
    fn test_jsx_child() {
        assert_eq!(
            paths("export const App = () => <p>{LABELS.a.b}</p>;"),
            vec![".a.b*subtree*"]
        );
    }

    #[test]
    fn test_dynamic_index_after_static_chain() {
        assert_eq!(
            paths("const Size = ({ type }) => <p>{LABELS.a.b.c[type]}</p>;"),
            vec![".a.b.c[computed]*subtree*"]
        );
    }

    #[test]
    fn test_literal_indexes_are_static() {
        assert_eq!(
            paths(r#"render(LABELS["a"][0], LABELS[`b`]);"#),
            vec![".a.0*subtree*", ".b*subtree*"]
        );
    }

    #[test]
    fn test_ternary_yields_both_branches() {
        assert_eq!(
            paths("const Pet = ({ flying }) => <p>{flying ? LABELS.bird : LABELS.cat}</p>;"),
            vec![".bird*subtree*", ".cat*subtree*"]
        );
    }

    #[test]
    fn test_member_access_on_ternary() {
        assert_eq!(
            paths("render((flying ? LABELS.bird : LABELS.cat).name);"),
            vec![".bird.name*subtree*", ".cat.name*subtree*"]
        );
    }

    #[test]
    fn test_lazy_call_and_access_after_call() {
        assert_eq!(
            paths("render(LABELS.getDesc(), LABELS.getTitle().length);"),
            vec![".getDesc(call)", ".getTitle(call)"]
        );
    }

    #[test]
    fn test_optional_chaining_is_regular_access() {
        assert_eq!(
            paths("render(LABELS?.a?.b, LABELS.getDesc?.());"),
            vec![".a.b*subtree*", ".getDesc(call)"]
        );
    }

    #[test]
    fn test_call_arguments_are_walked() {
        assert_eq!(
            paths("render(LABELS.format(LABELS.a));"),
            vec![".format(call)", ".a*subtree*"]
        );
    }

    #[test]
    fn test_pass_through_and_shorthand() {
        assert_eq!(
            paths("const x = <Comp labels={LABELS.a} {...LABELS.b} />;\nrender({ LABELS });"),
            vec![".a*subtree*", ".b*subtree*", "*subtree*"]
        );
    }

    #[test]
    fn test_strings_and_comments_are_ignored() {
        assert!(paths("const s = \"LABELS.a\"; // LABELS.b\n/* LABELS.c */").is_empty());
    }

    #[test]
    fn test_member_writes_are_not_uses() {
        assert_eq!(
            paths("LABELS.a = \"x\";\nLABELS[key] = \"y\";\nLABELS.count += 1;"),
            vec![".count*subtree*"]
        );
    }

    #[test]
    fn test_params_and_inner_declarations_shadow() {
        let code = r#"
            function Bird(LABELS) { return LABELS.a; }
            const Cat = ({ LABELS }) => LABELS.b;
            { const LABELS = {}; render(LABELS.c); }
            try {} catch (LABELS) { render(LABELS.d); }
            render(LABELS.e);
        "#;
        assert_eq!(paths(code), vec![".e*subtree*"]);
    }

    #[test]
    fn test_const_alias_is_not_a_use() {
        assert!(paths("const fly = LABELS.fly;").is_empty());
    }

    #[test]
    fn test_aliases_chain_transitively() {
        let code = r#"
            const fly = LABELS.fly;
            const bird = fly.bird;
            function Bird() { return <p>{bird.name}</p>; }
        "#;
        assert_eq!(paths(code), vec![".fly.bird.name*subtree*"]);
    }

    #[test]
    fn test_alias_declared_below_its_use() {
        let code = r#"
            export function Bird() { return <p>{fly.bird}</p>; }
            export const Wing = () => <p>{wing.size}</p>;
            const wing = fly.wing;
            const fly = LABELS.fly;
        "#;
        assert_eq!(
            paths(code),
            vec![".fly.bird*subtree*", ".fly.wing.size*subtree*"]
        );
    }

    #[test]
    fn test_local_declaration_still_shadows_module_alias() {
        let code = r#"
            function Bird() { const fly = {}; return fly.bird; }
            const fly = LABELS.fly;
        "#;
        assert!(paths(code).is_empty());
    }

    #[test]
    fn test_destructuring_aliases() {
        let code = r#"
            const a = LABELS.a;
            const { b, c: { d }, "e": f, ...rest } = a;
            render(b, d.x, f, rest);
        "#;
        assert_eq!(
            paths(code),
            vec![
                ".a.b*subtree*",
                ".a.c.d.x*subtree*",
                ".a.e*subtree*",
                ".a*subtree*",
            ]
        );
    }

    #[test]
    fn test_array_destructuring_uses_indexes() {
        assert_eq!(
            paths("const [first, , third] = LABELS.list;\nrender(first, third);"),
            vec![".list.0*subtree*", ".list.2*subtree*"]
        );
    }

    #[test]
    fn test_assignment_alias() {
        assert_eq!(
            paths("let x;\nx = LABELS.a;\nrender(x.b);"),
            vec![".a.b*subtree*"]
        );
    }

    #[test]
    fn test_destructuring_assignment_alias() {
        assert_eq!(
            paths("let b;\n({ b } = LABELS.a);\nrender(b);"),
            vec![".a.b*subtree*"]
        );
    }

    #[test]
    fn test_ternary_alias_keeps_both_targets() {
        assert_eq!(
            paths("const pet = flying ? LABELS.bird : LABELS.cat;\nrender(pet.name);"),
            vec![".bird.name*subtree*", ".cat.name*subtree*"]
        );
    }

    #[test]
    fn test_call_result_is_not_an_alias() {
        assert_eq!(
            paths("const desc = LABELS.getDesc();\nrender(desc.length);"),
            vec![".getDesc(call)"]
        );
    }

    #[test]
    fn test_non_alias_declaration_is_a_use() {
        assert_eq!(
            paths("const all = [LABELS.a, LABELS.b];"),
            vec![".a*subtree*", ".b*subtree*"]
        );
    }

    #[test]
    fn test_location_points_at_expression_start() {
        let found = resolve_source("function App() {\n  return <p>{LABELS.a}</p>;\n}");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].context.line(), 3);
        assert_eq!(found[0].context.col(), 14);
        assert_eq!(found[0].context.source_line, "  return <p>{LABELS.a}</p>;");
    }
}
