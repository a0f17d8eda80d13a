//! Symbol qualification for the type translator (spec §4.2: "symbol
//! qualification uses the value identifier path").
//!
//! The translator never walks a binder or symbol table itself — passes
//! upstream resolve a type's declaration and hand the translator a
//! [`Symbol`] describing how (or whether) that declaration is visible as a
//! value in the emitted JS.

/// How a named type's declaration is reachable from emitted JS.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Symbol {
    /// The type's declared name (for diagnostics and fully qualified forms).
    pub name: String,
    /// The identifier this type resolves to in the emitted JS, if any: the
    /// in-file name for a same-file declaration, or the local import alias
    /// for an imported one. `None` means the declaration has no value
    /// representation in emitted JS (e.g. a type-only import, or an
    /// ambient `.d.ts` type with no corresponding runtime binding).
    pub value_identifier: Option<String>,
}

impl Symbol {
    /// A symbol visible as a value under `identifier`.
    #[must_use]
    pub fn value(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self {
            name: name.into(),
            value_identifier: Some(identifier),
        }
    }

    /// A symbol with the same declared name and value identifier (the
    /// common case for a same-file, non-aliased reference).
    #[must_use]
    pub fn local(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            value_identifier: Some(name.clone()),
            name,
        }
    }

    /// A symbol with no value representation in emitted JS; any type
    /// reference through it degrades to `?` (spec §4.2: "types not visible
    /// as values in the emitted JS degrade to `?`").
    #[must_use]
    pub fn opaque(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_identifier: None,
        }
    }

    #[must_use]
    pub fn is_value(&self) -> bool {
        self.value_identifier.is_some()
    }
}
