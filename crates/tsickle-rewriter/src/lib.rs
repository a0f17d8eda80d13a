//! The position-preserving rewriter shared by every pass that edits source
//! text (spec §4.1), plus the source-map machinery it feeds (spec §4.1,
//! "Source maps").

pub mod rewriter;
pub mod source_map;
pub mod source_writer;

pub use rewriter::{NodeArena, ProcessResult, RewriteOutput, RewriteVisitor, Rewriter};
pub use source_map::{SourceMap, SourceMapGenerator};
pub use source_writer::{SourcePosition, SourceWriter};
