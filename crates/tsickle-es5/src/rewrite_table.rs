//! [`ModuleRewriteTable`] (spec §3): per converted file, the mapping from
//! a local `require()` binding to the Closure module it now resolves to.

use rustc_hash::FxHashMap;

/// What a local binding actually imports from its module: the whole
/// namespace object (`*`, the common case for a `require()` binding) or
/// one specific named export (reserved for re-export aliasing).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportedName {
    Star,
    Named(String),
}

/// `localName -> (moduleId, importedName)` for one file (spec §3).
///
/// Invariant: every `require` in the input CommonJS appears exactly once
/// on the left-hand side of a `goog.require` in the output -- callers
/// populate this table as they rewrite requires, one `insert` per line
/// matched.
#[derive(Clone, Debug, Default)]
pub struct ModuleRewriteTable {
    entries: FxHashMap<String, (String, ImportedName)>,
}

impl ModuleRewriteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, local_name: impl Into<String>, module_id: impl Into<String>, imported: ImportedName) {
        self.entries.insert(local_name.into(), (module_id.into(), imported));
    }

    #[must_use]
    pub fn get(&self, local_name: &str) -> Option<&(String, ImportedName)> {
        self.entries.get(local_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn extend(&mut self, other: ModuleRewriteTable) {
        self.entries.extend(other.entries);
    }
}
