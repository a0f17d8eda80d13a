//! Translates resolved TypeScript types into Closure Compiler JSDoc type
//! expressions (spec §4.2). This crate owns the `TsType` model and the
//! translator; it does not resolve types itself — upstream passes (the
//! annotator, the decorator downleveler) hand it already-resolved types
//! and consume the resulting strings.

pub mod symbol;
pub mod translator;
pub mod ts_type;

pub use symbol::Symbol;
pub use translator::{TranslationMode, TypeTranslator, UNKNOWN_TYPE};
pub use ts_type::{AliasId, FunctionType, RecordField, TsType, TypeAlias, TypeReference};
