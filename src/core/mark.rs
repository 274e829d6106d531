//! Usage Marker: reconciles access paths against a key tree.
//!
//! Marking only raises usage annotations, so applying the same paths twice
//! leaves the tree unchanged. Computed accesses fan out over every child;
//! findings raised inside a fan-out are dropped as soon as one alternative
//! accepts the access. A computed access that ends the path marks every
//! object child and its descendants `Used`, not merely forwarded.

use tracing::trace;

use crate::core::resolve::{AccessPath, Segment};
use crate::core::tree::{KeyChild, KeyNode, KeyTree, LeafNode, Usage};
use crate::issues::{AccessedButUndeclaredFinding, Finding, LazyMisuse, MisuseOfLazyKeyFinding};

/// Apply `paths` to `tree`, returning usage-site findings.
pub fn mark(tree: &mut KeyTree, paths: &[AccessPath]) -> Vec<Finding> {
    let KeyTree { binding, root, .. } = tree;
    let mut marker = Marker {
        binding: binding.as_str(),
        findings: Vec::new(),
    };

    for path in paths {
        trace!(binding = %marker.binding, path = %path, "mark");
        marker.apply(root, &path.segments, &mut Vec::new(), path);
    }

    marker.findings
}

/// What an exhausted path stands for: the node itself is the value.
static END_OF_PATH: Segment = Segment::Subtree;

struct Marker<'a> {
    binding: &'a str,
    findings: Vec<Finding>,
}

impl Marker<'_> {
    /// Returns true when the access landed on something it may legally reach.
    fn apply(
        &mut self,
        node: &mut KeyNode,
        rest: &[Segment],
        trail: &mut Vec<String>,
        path: &AccessPath,
    ) -> bool {
        let segment = rest.first().unwrap_or(&END_OF_PATH);
        let tail = rest.get(1..).unwrap_or_default();

        let internal = match node {
            KeyNode::Computed(computed) => return self.apply(&mut computed.body, rest, trail, path),
            KeyNode::Leaf(leaf) => return self.apply_leaf(leaf, segment, trail, path),
            KeyNode::Internal(internal) => internal,
        };

        match segment {
            Segment::Subtree => {
                internal.mark_subtree();
                true
            }
            Segment::Call => {
                self.misuse(trail, None, LazyMisuse::CallOnObject, path);
                false
            }
            Segment::Member(name) => {
                let has_computed = internal.has_computed_children();
                match internal.child_mut(name) {
                    Some(child) => {
                        trail.push(name.clone());
                        let reached = self.apply(&mut child.node, tail, trail, path);
                        trail.pop();
                        reached
                    }
                    // The name may be the runtime value of a computed key.
                    None if has_computed => {
                        let computed = internal
                            .children
                            .iter_mut()
                            .filter(|c| matches!(c.node, KeyNode::Computed(_)));
                        self.fan_out(computed, rest, trail, path)
                    }
                    None => {
                        self.undeclared(trail, rest, path);
                        false
                    }
                }
            }
            Segment::Computed => {
                let reached = self.fan_out(internal.children.iter_mut(), rest, trail, path);
                // `LABELS.e[k]` selects one of the objects and uses it as a value.
                if matches!(tail, [] | [Segment::Subtree]) {
                    for child in &mut internal.children {
                        if child.node.as_internal().is_some() {
                            child.node.raise_all(Usage::Used);
                        }
                    }
                }
                reached
            }
        }
    }

    fn apply_leaf(
        &mut self,
        leaf: &mut LeafNode,
        segment: &Segment,
        trail: &[String],
        path: &AccessPath,
    ) -> bool {
        match segment {
            // A bare lazy key without a call is not a use of the translation.
            Segment::Subtree => {
                if !leaf.lazy {
                    leaf.usage.raise(Usage::Used);
                }
                true
            }
            Segment::Call if leaf.lazy => {
                leaf.usage.raise(Usage::Used);
                true
            }
            Segment::Call => {
                self.misuse(trail, Some(&leaf.id), LazyMisuse::CallOnPlainKey, path);
                false
            }
            Segment::Member(_) | Segment::Computed if leaf.lazy => {
                self.misuse(trail, Some(&leaf.id), LazyMisuse::AccessPastLazyKey, path);
                false
            }
            // String properties such as `.length` use the translated value.
            Segment::Member(_) | Segment::Computed => {
                leaf.usage.raise(Usage::Used);
                true
            }
        }
    }

    fn fan_out<'c>(
        &mut self,
        children: impl Iterator<Item = &'c mut KeyChild>,
        rest: &[Segment],
        trail: &mut Vec<String>,
        path: &AccessPath,
    ) -> bool {
        let tail = rest.get(1..).unwrap_or_default();
        let before = self.findings.len();
        let mut reached = false;

        for child in children {
            trail.push(child.name.clone());
            reached |= self.apply(&mut child.node, tail, trail, path);
            trail.pop();
        }

        if reached {
            self.findings.truncate(before);
        } else if self.findings.len() == before {
            self.undeclared(trail, rest, path);
        }
        reached
    }

    fn display(&self, trail: &[String]) -> String {
        std::iter::once(self.binding)
            .chain(trail.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn undeclared(&mut self, trail: &[String], rest: &[Segment], path: &AccessPath) {
        let mut key_path = self.display(trail);
        for segment in rest.iter().filter(|s| **s != Segment::Subtree) {
            key_path.push_str(&segment.to_string());
        }
        self.findings
            .push(Finding::AccessedButUndeclared(AccessedButUndeclaredFinding {
                context: path.context.clone(),
                key_path,
            }));
    }

    fn misuse(
        &mut self,
        trail: &[String],
        translation_id: Option<&str>,
        misuse: LazyMisuse,
        path: &AccessPath,
    ) {
        self.findings
            .push(Finding::MisuseOfLazyKey(MisuseOfLazyKeyFinding {
                context: path.context.clone(),
                key_path: self.display(trail),
                translation_id: translation_id.map(str::to_string),
                misuse,
            }));
    }
}
