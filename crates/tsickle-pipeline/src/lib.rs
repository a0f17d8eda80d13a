pub mod coordinator;
pub mod host;

pub use coordinator::{PipelineCoordinator, PipelineResult};
pub use host::{
    CompilerHost, HostProgram, ModuleNameMapper, OutputRetainingCompilerHost, SourceReplacingCompilerHost,
    SourceUnit, StaticHostProgram,
};
