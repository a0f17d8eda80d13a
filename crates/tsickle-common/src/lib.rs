//! Foundations shared by every tsickle pass: source spans, line/column
//! positions (for source-map generation), comment extraction (for JSDoc
//! merging), and the diagnostic sink passes append to instead of throwing.

pub mod comments;
pub mod compilation_options;
pub mod diagnostics;
pub mod position;
pub mod span;

pub use compilation_options::CompilationOptions;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSink};
pub use position::{LineMap, Position};
pub use span::Span;
