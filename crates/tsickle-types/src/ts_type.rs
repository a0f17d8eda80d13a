//! The `TsType` model: a resolved TypeScript type as handed to the
//! translator. Closed under the constructors spec §3 names for
//! `TypeExpression` (`nullable`, `array`, `union`, `function`, `record`,
//! `templated`) plus the primitive and reference leaves those constructors
//! bottom out at.

use crate::symbol::Symbol;

/// A resolved TypeScript type, input to [`crate::translator::TypeTranslator`].
///
/// This is not a type *checker* — nothing here performs inference or
/// assignability; every variant is already a settled answer to "what type
/// is this declaration/expression", handed in by whatever pass resolved it.
#[derive(Clone, Debug, PartialEq)]
pub enum TsType {
    Number,
    String,
    Boolean,
    Null,
    Undefined,
    Void,
    /// `any` and `unknown` both translate to `?` (spec §4.2 table); kept as
    /// separate variants so a future pass can tell them apart before
    /// translation.
    Any,
    Unknown,
    Never,
    BigInt,
    Symbol,
    Nullable(Box<TsType>),
    Array(Box<TsType>),
    Union(Vec<TsType>),
    Function(FunctionType),
    Record(Vec<RecordField>),
    /// A class/interface/type-alias reference by name, with its type
    /// arguments. `non_null` tracks whether the declaration is known to
    /// never hold `null` (classes and interfaces are non-null by
    /// declaration in Closure; a type alias's own body decides).
    Reference(TypeReference),
    /// An enum member, pre-qualified to the enum's fully qualified name —
    /// the translator does not resolve enum membership itself.
    EnumMember(String),
    /// A generic type parameter, translated to its bare name.
    TypeParameter(String),
    /// A reference to a named type alias, resolved through the
    /// translator's alias table so cyclic aliases can be detected.
    Alias(AliasId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionType {
    pub params: Vec<TsType>,
    pub this_param: Option<Box<TsType>>,
    pub return_type: Box<TsType>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordField {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeReference {
    pub symbol: Symbol,
    pub type_args: Vec<TsType>,
    pub non_null: bool,
}

/// Identifier of a type alias registered with a [`crate::translator::TypeTranslator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AliasId(pub u32);

/// A named type alias body, kept in the translator's alias table so
/// self-referential aliases (`type R = { next: R }`) can be detected
/// rather than looping forever.
#[derive(Clone, Debug)]
pub struct TypeAlias {
    pub name: String,
    pub body: TsType,
}

impl TsType {
    /// `nullable(T) = (T|null)` (spec §3). Collapses `nullable(any-ish)`
    /// and re-nullable-wrapping into themselves rather than stacking, since
    /// Closure has no notion of a doubly-nullable type.
    #[must_use]
    pub fn nullable(inner: TsType) -> TsType {
        match inner {
            TsType::Nullable(_) | TsType::Any | TsType::Unknown | TsType::Null => inner,
            other => TsType::Nullable(Box::new(other)),
        }
    }

    /// `array(T) = Array<T>` (spec §3); the translator additionally marks
    /// the result non-null (spec §4.2: `T[]` translates to `!Array<T>`).
    #[must_use]
    pub fn array(inner: TsType) -> TsType {
        TsType::Array(Box::new(inner))
    }

    /// `union(Ts)` (spec §3). A union of one element collapses to that
    /// element; nested unions are flattened so printing doesn't need to
    /// recurse through redundant parenthesization.
    #[must_use]
    pub fn union(parts: Vec<TsType>) -> TsType {
        let mut flat = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                TsType::Union(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            1 => flat.into_iter().next().unwrap(),
            _ => TsType::Union(flat),
        }
    }

    /// `function(params, this?, ret)` (spec §3).
    #[must_use]
    pub fn function(params: Vec<TsType>, this_param: Option<TsType>, return_type: TsType) -> TsType {
        TsType::Function(FunctionType {
            params,
            this_param: this_param.map(Box::new),
            return_type: Box::new(return_type),
        })
    }

    /// `record({k: T, …})` (spec §3).
    #[must_use]
    pub fn record(fields: Vec<RecordField>) -> TsType {
        TsType::Record(fields)
    }

    /// `templated(name, [T, …])` (spec §3): a class/interface reference,
    /// non-null by declaration unless the caller says otherwise.
    #[must_use]
    pub fn templated(symbol: Symbol, args: Vec<TsType>) -> TsType {
        TsType::Reference(TypeReference {
            symbol,
            type_args: args,
            non_null: true,
        })
    }
}
