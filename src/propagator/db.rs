//! Read-only collaborator interface the propagator consumes: the asset
//! database's declared symbols, file paths, and side-effect flags. The
//! propagator never mutates anything reached through here.

use rustc_hash::FxHashMap as HashMap;

use crate::ids::{ContentKey, SymbolId};
use crate::propagator::diagnostic::SourceLocation;
use crate::symbols::SymbolTable;

/// How a bundle groups this asset relative to its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BundleBehavior {
    #[default]
    Normal,
    Isolated,
    Inline,
}

/// One entry of an asset's or dependency's declared symbol table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredSymbol {
    pub exported: SymbolId,
    pub local: SymbolId,
    pub is_weak: bool,
    pub loc: Option<SourceLocation>,
}

/// Everything the propagator needs to know about an asset, read from the
/// external asset database.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetRecord {
    pub symbols: Option<Vec<DeclaredSymbol>>,
    pub file_path: String,
    pub side_effects: bool,
    pub bundle_behavior: BundleBehavior,
}

/// Everything the propagator needs to know about a dependency, read from
/// the external asset database.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DependencyRecord {
    pub symbols: Option<Vec<DeclaredSymbol>>,
    pub specifier: String,
    pub source_asset_id: Option<ContentKey>,
}

/// The `db` collaborator named throughout the specification: `DbAsset`,
/// `DbDependency`, and `readCachedString` collapsed into one trait so
/// `propagate_symbols` only has to thread a single generic parameter.
pub trait PropagatorDb {
    fn asset(&self, key: &ContentKey) -> Option<&AssetRecord>;
    fn dependency(&self, key: &ContentKey) -> Option<&DependencyRecord>;
    fn resolve_symbol_name(&self, id: SymbolId) -> &str;
}

/// Simple in-memory `PropagatorDb`, for callers without their own asset
/// database (and for this crate's own tests).
#[derive(Debug, Clone, Default)]
pub struct InMemoryDb {
    assets: HashMap<ContentKey, AssetRecord>,
    dependencies: HashMap<ContentKey, DependencyRecord>,
    symbols: SymbolTable,
}

impl InMemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, name: &str) -> SymbolId {
        self.symbols.intern(name)
    }

    pub fn insert_asset(&mut self, key: impl Into<ContentKey>, record: AssetRecord) {
        self.assets.insert(key.into(), record);
    }

    pub fn insert_dependency(&mut self, key: impl Into<ContentKey>, record: DependencyRecord) {
        self.dependencies.insert(key.into(), record);
    }
}

impl PropagatorDb for InMemoryDb {
    fn asset(&self, key: &ContentKey) -> Option<&AssetRecord> {
        self.assets.get(key)
    }

    fn dependency(&self, key: &ContentKey) -> Option<&DependencyRecord> {
        self.dependencies.get(key)
    }

    fn resolve_symbol_name(&self, id: SymbolId) -> &str {
        self.symbols.resolve(id)
    }
}
