#![forbid(unsafe_code)]

use std::collections::HashMap;

use rhea_ast::types::Binding;

/// Block-scoped mapping from names to bindings. A new table starts with
/// the root scope already open; inner scopes rebind freely (no
/// shadowing check), and lookup walks from the innermost scope out.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, Binding>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        assert!(self.scopes.len() > 1, "cannot pop the root scope");
        self.scopes.pop();
    }

    pub fn add_symbol(&mut self, name: impl Into<String>, binding: Binding) {
        let top = self
            .scopes
            .last_mut()
            .expect("symbol table has no open scope");
        top.insert(name.into(), binding);
    }

    pub fn find_symbol(&self, name: &str) -> Option<&Binding> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
