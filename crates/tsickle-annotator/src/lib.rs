//! JSDoc closurization and externs generation (spec §4.3, §4.4): turns
//! resolved declarations into the JSDoc blocks Closure Compiler's type
//! system reads, and ambient declarations into a standalone externs file.

pub mod annotator;
pub mod ast;
pub mod externs;
pub mod jsdoc;

pub use annotator::JsDocAnnotator;
pub use ast::{
    Declaration, DeclarationKind, EnumMember, EnumMemberValue, ExistingJsDoc, ImportedSymbol, InterfaceMember, Modifiers,
    ParamDoc, Parameter,
};
pub use externs::{ExternDeclaration, ExternsGenerator};
pub use jsdoc::{AnnotationPlan, JsDocTag};
