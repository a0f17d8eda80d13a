pub mod converter;
pub mod host;
pub mod rewrite_table;

pub use converter::{convert, ConvertedModule, TypeOnlyReexport};
pub use host::{Es5ProcessorHost, PathDerivedHost};
pub use rewrite_table::{ImportedName, ModuleRewriteTable};
