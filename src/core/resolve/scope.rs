//! Lexical scopes for the root binding and its aliases.
//!
//! Every scope maps names to what they currently refer to:
//!
//! ```typescript
//! const LABELS = translate({ ... });  // scope 0: LABELS -> []
//! const fly = LABELS.fly;             // scope 0: fly -> [.fly]
//! function Bird({ fly }) {            // scope 1: fly -> shadowed
//!     return fly.bird;                // not a reference
//! }
//! ```

use std::collections::HashMap;

use super::Segment;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Binding {
    /// Refers to one or more nodes of the key tree (several after a ternary).
    Alias(Vec<Vec<Segment>>),
    /// A local declaration hiding an outer alias.
    Shadowed,
}

/// Stack of alias scopes, innermost last.
pub struct AliasScopes {
    scopes: Vec<HashMap<String, Binding>>,
}

impl AliasScopes {
    /// Create the global scope holding the root binding.
    pub fn new(root: &str) -> Self {
        let mut global = HashMap::new();
        global.insert(root.to_string(), Binding::Alias(vec![Vec::new()]));
        Self {
            scopes: vec![global],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Keeps at least the global scope.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declare `name` in the innermost scope as an alias of `chains`.
    pub fn declare_alias(&mut self, name: &str, chains: Vec<Vec<Segment>>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), Binding::Alias(chains));
        }
    }

    /// Assign `chains` to an existing variable.
    ///
    /// Updates the innermost scope declaring `name`, or the global scope for
    /// undeclared names. Earlier alias targets are kept alongside the new ones.
    pub fn assign_alias(&mut self, name: &str, chains: Vec<Vec<Segment>>) {
        let index = self
            .scopes
            .iter()
            .rposition(|scope| scope.contains_key(name))
            .unwrap_or(0);
        let scope = &mut self.scopes[index];

        match scope.get_mut(name) {
            Some(Binding::Alias(existing)) => {
                for chain in chains {
                    if !existing.contains(&chain) {
                        existing.push(chain);
                    }
                }
            }
            _ => {
                scope.insert(name.to_string(), Binding::Alias(chains));
            }
        }
    }

    /// Hide outer aliases named `name` for the rest of the innermost scope.
    ///
    /// A name already declared in the innermost scope keeps its binding, so the
    /// declarator of the root binding itself does not hide it.
    pub fn shadow(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.entry(name.to_string()).or_insert(Binding::Shadowed);
        }
    }

    /// Number of live aliases in the global scope, the root included.
    pub fn alias_count(&self) -> usize {
        self.scopes.first().map_or(0, |global| {
            global
                .values()
                .filter(|binding| matches!(binding, Binding::Alias(_)))
                .count()
        })
    }

    /// Key tree chains `name` refers to, if it is a live alias.
    pub fn lookup(&self, name: &str) -> Option<&[Vec<Segment>]> {
        for scope in self.scopes.iter().rev() {
            match scope.get(name) {
                Some(Binding::Alias(chains)) => return Some(chains),
                Some(Binding::Shadowed) => return None,
                None => {}
            }
        }
        None
    }
}
