//! Key Tree Builder: turns the object literal passed to `translate(...)` into a [`KeyTree`].
//!
//! Only the overall shape can make a declaration unanalyzable ([`BuildError`]).
//! Problems with single properties are collected as findings and the rest of
//! the tree is still built.

use swc_common::{Span, Spanned};
use swc_ecma_ast::{ArrayLit, CallExpr, Expr, ExprOrSpread, ObjectLit, Prop, PropOrSpread};
use tracing::trace;

use super::{ComputedNode, InternalNode, KeyChild, KeyNode, KeyTree, LeafNode, Usage};
use crate::core::Locator;
use crate::core::collect::helpers::{
    describe_expr, extract_prop_name, extract_string_value, unwrap_ts_expr,
};
use crate::issues::{DuplicateKeyFinding, Finding, UnsupportedLeafShapeFinding};

/// Marker string in the second slot of a lazy pair: `["i18n.id", "lazy"]`.
pub const LAZY_MARKER: &str = "lazy";

/// Why a whole translate declaration cannot be analyzed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("translate() expects an object literal, found {found}")]
    NotStaticObject { found: &'static str },
    #[error("translate() was called without arguments")]
    MissingArgument,
}

/// A built tree together with the non-fatal findings met while building it.
#[derive(Debug)]
pub struct KeyTreeBuild {
    pub tree: KeyTree,
    pub findings: Vec<Finding>,
}

/// Build the tree of a recognized `translate(...)` call from its first argument.
pub fn build_from_call(
    binding: &str,
    binding_span: Span,
    call: &CallExpr,
    locator: Locator<'_>,
) -> Result<KeyTreeBuild, BuildError> {
    let arg = match call.args.first() {
        Some(ExprOrSpread { spread: None, expr }) => expr,
        Some(ExprOrSpread { spread: Some(_), .. }) => {
            return Err(BuildError::NotStaticObject {
                found: "spread argument",
            });
        }
        None => return Err(BuildError::MissingArgument),
    };
    build(binding, binding_span, arg, locator)
}

/// Build a key tree from a translate-call literal expression.
pub fn build(
    binding: &str,
    binding_span: Span,
    literal: &Expr,
    locator: Locator<'_>,
) -> Result<KeyTreeBuild, BuildError> {
    let Expr::Object(object) = unwrap_ts_expr(literal) else {
        return Err(BuildError::NotStaticObject {
            found: describe_expr(literal),
        });
    };

    let mut builder = TreeBuilder {
        binding,
        locator,
        findings: Vec::new(),
    };
    let root = builder.build_object(object, &mut Vec::new())?;

    Ok(KeyTreeBuild {
        tree: KeyTree {
            binding: binding.to_string(),
            context: locator.locate(binding_span),
            root: KeyNode::Internal(root),
        },
        findings: builder.findings,
    })
}

struct TreeBuilder<'a> {
    binding: &'a str,
    locator: Locator<'a>,
    findings: Vec<Finding>,
}

impl TreeBuilder<'_> {
    fn display_path(&self, path: &[String]) -> String {
        std::iter::once(self.binding)
            .chain(path.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn build_object(
        &mut self,
        object: &ObjectLit,
        path: &mut Vec<String>,
    ) -> Result<InternalNode, BuildError> {
        let mut node = InternalNode::default();
        // Static names whose value could not be built.
        let mut unbuilt: Vec<String> = Vec::new();

        for (index, prop) in object.props.iter().enumerate() {
            let prop = match prop {
                PropOrSpread::Prop(prop) => prop,
                PropOrSpread::Spread(_) => {
                    return Err(BuildError::NotStaticObject {
                        found: "object with spread element",
                    });
                }
            };

            let Prop::KeyValue(kv) = &**prop else {
                if let Some(name) = self.unsupported_prop(prop, path) {
                    self.record_unbuilt(&mut node, &mut unbuilt, name, prop.span(), path);
                }
                continue;
            };

            let (name, computed) = match extract_prop_name(&kv.key) {
                Some(name) => (name, false),
                None => (format!("[computed#{}]", index), true),
            };
            let context = self.locator.locate(kv.key.span());

            path.push(name.clone());
            let built = self.build_value(&kv.value, path);
            let key_path = self.display_path(path);
            path.pop();

            let Some(built) = built? else {
                self.findings
                    .push(Finding::UnsupportedLeafShape(UnsupportedLeafShapeFinding {
                        context,
                        key_path,
                        found: describe_value(&kv.value),
                    }));
                if !computed {
                    self.record_unbuilt(&mut node, &mut unbuilt, name, kv.key.span(), path);
                }
                continue;
            };

            let built = if computed {
                KeyNode::Computed(ComputedNode {
                    body: Box::new(built),
                })
            } else {
                built
            };

            let follows_unbuilt = unbuilt.contains(&name);
            let child = KeyChild {
                name,
                context: context.clone(),
                node: built,
            };
            if node.insert(child) || follows_unbuilt {
                trace!(key = %key_path, "duplicate key, keeping the later value");
                self.findings
                    .push(Finding::DuplicateKey(DuplicateKeyFinding { context, key_path }));
            }
        }

        Ok(node)
    }

    /// `Ok(None)` means the value has an unsupported shape.
    fn build_value(
        &mut self,
        value: &Expr,
        path: &mut Vec<String>,
    ) -> Result<Option<KeyNode>, BuildError> {
        let value = unwrap_ts_expr(value);
        if let Expr::Object(object) = value {
            return Ok(Some(KeyNode::Internal(self.build_object(object, path)?)));
        }
        if let Some(id) = extract_string_value(value) {
            return Ok(Some(leaf(id, false)));
        }
        if let Expr::Array(array) = value
            && let Some(id) = extract_lazy_pair(array)
        {
            return Ok(Some(leaf(id, true)));
        }
        Ok(None)
    }

    /// Report a property that is not `key: value`.
    ///
    /// Returns the property name when it is static.
    fn unsupported_prop(&mut self, prop: &Prop, path: &[String]) -> Option<String> {
        let (name, found) = match prop {
            Prop::Shorthand(ident) => (Some(ident.sym.to_string()), "shorthand property"),
            Prop::Assign(assign) => (Some(assign.key.sym.to_string()), "assignment"),
            Prop::Getter(getter) => (extract_prop_name(&getter.key), "getter"),
            Prop::Setter(setter) => (extract_prop_name(&setter.key), "setter"),
            Prop::Method(method) => (extract_prop_name(&method.key), "method"),
            Prop::KeyValue(_) => return None,
        };
        let mut key_path = path.to_vec();
        key_path.push(name.clone().unwrap_or_else(|| "[computed]".to_string()));
        self.findings
            .push(Finding::UnsupportedLeafShape(UnsupportedLeafShapeFinding {
                context: self.locator.locate(prop.span()),
                key_path: self.display_path(&key_path),
                found: found.to_string(),
            }));
        name
    }

    /// Remove any earlier child shadowed by the unbuilt property `name`.
    fn record_unbuilt(
        &mut self,
        node: &mut InternalNode,
        unbuilt: &mut Vec<String>,
        name: String,
        span: Span,
        path: &[String],
    ) {
        let repeated = node.remove(&name) || unbuilt.contains(&name);
        let mut key_path = path.to_vec();
        key_path.push(name.clone());
        unbuilt.push(name);
        if !repeated {
            return;
        }
        let key_path = self.display_path(&key_path);
        trace!(key = %key_path, "duplicate key with an unsupported value, dropping the earlier one");
        self.findings
            .push(Finding::DuplicateKey(DuplicateKeyFinding {
                context: self.locator.locate(span),
                key_path,
            }));
    }
}

fn leaf(id: String, lazy: bool) -> KeyNode {
    KeyNode::Leaf(LeafNode {
        id,
        lazy,
        usage: Usage::Unreached,
    })
}

/// Match `["i18n.id", "lazy"]` exactly.
fn extract_lazy_pair(array: &ArrayLit) -> Option<String> {
    let [Some(first), Some(second)] = array.elems.as_slice() else {
        return None;
    };
    if first.spread.is_some() || second.spread.is_some() {
        return None;
    }
    let id = extract_string_value(&first.expr)?;
    (extract_string_value(&second.expr)? == LAZY_MARKER).then_some(id)
}

fn describe_value(value: &Expr) -> String {
    match unwrap_ts_expr(value) {
        Expr::Array(array) => format!(
            r#"array literal with {} element(s), expected ["id", "{}"]"#,
            array.elems.len(),
            LAZY_MARKER
        ),
        other => describe_expr(other).to_string(),
    }
}
