//! Symbol interning: variable names and cache-assigned composite names.
//!
//! Two append-only tables live here. `VarId` maps variable names (`x`, `y`)
//! to compact indices. `CompositeId` is the `?k` name the cache mints for a
//! composite sub-expression, keyed by the structural key of its child list.
//! Both tables are append-only -- ids are never invalidated.

use rustc_hash::FxHashMap;
use std::fmt;

/// A compact identifier for an interned variable name.
///
/// `VarId` is `Copy` and cheap to compare (u32 equality).
/// Use [`SymbolCache::var_name`] to retrieve the original string.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct VarId(pub(crate) u32);

/// The internal `?k` name assigned to a composite sub-expression.
///
/// Two composites built from the same structural key share one name for the
/// whole search, so state keys recognize structurally identical
/// sub-expressions.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct CompositeId(pub(crate) u32);

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0 + 1)
    }
}

/// Append-only registry for variable names and composite structural keys.
///
/// Guarantees:
/// - Interning the same name or key twice returns the same id.
/// - Ids are stable for the lifetime of the cache (never invalidated).
/// - O(1) lookup by name/key (via `FxHashMap`) and by id (via `Vec` index).
#[derive(Debug, Default)]
pub struct SymbolCache {
    var_names: Vec<String>,
    var_lookup: FxHashMap<String, VarId>,
    keys: Vec<String>,
    key_lookup: FxHashMap<String, CompositeId>,
}

impl SymbolCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a variable name, returning its `VarId`.
    pub fn intern_var(&mut self, name: &str) -> VarId {
        if let Some(&id) = self.var_lookup.get(name) {
            return id;
        }
        assert!(
            self.var_names.len() < u32::MAX as usize,
            "symbol cache exhausted: too many variable names"
        );
        let id = VarId(self.var_names.len() as u32);
        self.var_names.push(name.to_owned());
        self.var_lookup.insert(name.to_owned(), id);
        id
    }

    /// Retrieve the name for a given `VarId`.
    ///
    /// # Panics
    ///
    /// Panics if the id is invalid (cannot happen with append-only semantics).
    pub fn var_name(&self, id: VarId) -> &str {
        &self.var_names[id.0 as usize]
    }

    /// Intern a composite structural key, minting a fresh `?k` name the
    /// first time the key is seen.
    ///
    /// The key is the compute tag (if any) joined with the children's
    /// canonical symbols, so a pending sum and a pending product of the same
    /// operands receive distinct names.
    pub fn intern_composite(&mut self, key: &str) -> CompositeId {
        if let Some(&id) = self.key_lookup.get(key) {
            return id;
        }
        assert!(
            self.keys.len() < u32::MAX as usize,
            "symbol cache exhausted: too many composite names"
        );
        let id = CompositeId(self.keys.len() as u32);
        self.keys.push(key.to_owned());
        self.key_lookup.insert(key.to_owned(), id);
        id
    }

    /// The structural key a composite name was minted for.
    ///
    /// # Panics
    ///
    /// Panics if the id is invalid (cannot happen with append-only semantics).
    pub fn composite_key(&self, id: CompositeId) -> &str {
        &self.keys[id.0 as usize]
    }

    /// Number of interned composite names.
    pub fn composite_count(&self) -> usize {
        self.keys.len()
    }

    /// Number of interned variable names.
    pub fn var_count(&self) -> usize {
        self.var_names.len()
    }
}
