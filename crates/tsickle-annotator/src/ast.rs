//! The declaration-level view the annotator consumes (spec §4.3).
//!
//! The host compiler owns the real syntax tree (spec §6 Non-goal: parsing
//! and type-checking are not this crate's job). What the annotator needs
//! per declaration is small and settled by the time it runs: a kind, a
//! name, modifiers, a resolved type, and whatever JSDoc the source already
//! carried — so that's the shape [`Declaration`] captures, mirroring how
//! the teacher's `DeclarationEmitter` dispatches on a small enum of
//! declaration kinds rather than walking raw syntax nodes itself.

use tsickle_common::span::Span;
use tsickle_types::TsType;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclarationKind {
    Variable,
    Function,
    Class,
    Interface,
    TypeAlias,
    Enum,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub private: bool,
    pub protected: bool,
    pub readonly: bool,
    pub is_abstract: bool,
    pub exported: bool,
    pub deprecated: bool,
}

/// A `@param` description preserved from user-written JSDoc (spec §4.3:
/// "preserving user-written `@param` descriptions but overriding any user
/// type with the translator's output").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDoc {
    pub name: String,
    pub description: String,
}

/// A function parameter, as the annotator needs it: name, resolved type,
/// and whether it's optional (folded into the type as `(T|undefined)` per
/// spec §4.2's record-field rule, reused here for params).
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
}

/// JSDoc already present on the declaration in source, before
/// closurization (spec §4.3 step 3).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExistingJsDoc {
    pub description: Option<String>,
    pub param_docs: Vec<ParamDoc>,
    /// A user-written `@type {...}` tag, if present. Only legal to keep
    /// around for diagnostics: spec §4.3 always prefers the translator's
    /// own type.
    pub user_type: Option<String>,
    pub license: Option<String>,
    pub fileoverview: Option<String>,
    pub deprecated_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceMember {
    pub name: String,
    pub ty: TsType,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EnumMemberValue {
    Number(f64),
    String(String),
    /// A non-const enum member whose value isn't known until runtime
    /// (e.g. `A, B = A + 1`): Closure still needs the declaration, just
    /// without an inlined value.
    Computed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: EnumMemberValue,
}

/// One declaration the annotator will attach a JSDoc block to (or, for
/// interfaces, a trailing runtime-witness block).
#[derive(Clone, Debug)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: String,
    pub span: Span,
    pub modifiers: Modifiers,
    pub type_params: Vec<String>,
    /// Resolved type for variables/functions/properties. `None` for
    /// classes, interfaces and enums, which are annotated structurally
    /// instead of via a single `@type`.
    pub ty: Option<TsType>,
    pub params: Vec<Parameter>,
    pub return_type: Option<TsType>,
    pub existing_jsdoc: Option<ExistingJsDoc>,
    /// Interface/class heritage, as value identifiers (spec §4.2):
    /// `extends` bases for interfaces and classes, `implements` for
    /// classes only.
    pub extends: Vec<String>,
    pub implements: Vec<String>,
    pub members: Vec<InterfaceMember>,
    pub enum_members: Vec<EnumMember>,
    pub is_const_enum: bool,
}

impl Declaration {
    #[must_use]
    pub fn new(kind: DeclarationKind, name: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            name: name.into(),
            span,
            modifiers: Modifiers::default(),
            type_params: Vec::new(),
            ty: None,
            params: Vec::new(),
            return_type: None,
            existing_jsdoc: None,
            extends: Vec::new(),
            implements: Vec::new(),
            members: Vec::new(),
            enum_members: Vec::new(),
            is_const_enum: false,
        }
    }
}

/// A local binding the host compiler reports as imported into this file
/// (spec §4.3 "Re-exports and type-only imports"). The annotator doesn't
/// resolve imports itself -- this is exactly the information the host
/// compiler's elision analysis already has, per the same parsing
/// Non-goal that keeps [`Declaration`] a flat, pre-resolved shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportedSymbol {
    pub local_name: String,
    pub module_specifier: String,
}

impl ImportedSymbol {
    #[must_use]
    pub fn new(local_name: impl Into<String>, module_specifier: impl Into<String>) -> Self {
        Self { local_name: local_name.into(), module_specifier: module_specifier.into() }
    }
}
