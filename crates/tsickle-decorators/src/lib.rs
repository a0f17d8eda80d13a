//! Decorator downleveling (spec §4.5): lowers `@Annotation`-marked
//! decorators into static `decorators`/`ctorParameters`/`propDecorators`
//! class fields, so ahead-of-time compilation doesn't need a runtime
//! decorator library.

pub mod downlevel;
pub mod metadata;

pub use downlevel::{ClassArena, DecoratorDownlevelVisitor, DecoratorSite, SiteKind};
pub use metadata::{ClassMetadata, DecoratorCall, ParameterEntry};
