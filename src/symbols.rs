//! Symbol name interning shared by every `PropagatorDb` implementation.

use rustc_hash::FxHashMap as HashMap;

use crate::ids::SymbolId;

/// Interns symbol names to dense [`SymbolId`]s.
///
/// Pre-seeded with the two symbol ids every symbol table distinguishes:
/// [`SymbolId::STAR`] (`"*"`, the namespace) and [`SymbolId::DEFAULT`]
/// (`"default"`).
#[derive(Debug, Clone)]
pub struct SymbolTable {
    names: Vec<String>,
    ids: HashMap<String, SymbolId>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        let mut table = Self {
            names: Vec::new(),
            ids: HashMap::default(),
        };
        let star = table.intern("*");
        debug_assert_eq!(star, SymbolId::STAR);
        let default = table.intern("default");
        debug_assert_eq!(default, SymbolId::DEFAULT);
        table
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `name`, returning its existing id if already known.
    pub fn intern(&mut self, name: &str) -> SymbolId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = SymbolId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Resolve an id back to its interned string. Panics on an id this
    /// table never minted - every `SymbolId` reaching the propagator must
    /// have been produced by a call to `intern` on this same table.
    pub fn resolve(&self, id: SymbolId) -> &str {
        &self.names[id.0 as usize]
    }
}
