use std::path::PathBuf;

use clap::Parser;

/// CLI arguments for the `tsickle` binary.
#[derive(Parser, Debug)]
#[command(name = "tsickle", version, about = "Converts CommonJS-shaped JS into goog.module-wrapped Closure input")]
pub struct CliArgs {
    /// Files to convert.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    // ==================== Pass toggles ====================
    /// Run the standalone ES5/goog.module converter only, skipping
    /// type-checking and the decorator/annotator passes. This is the
    /// only mode this binary can run without a host compiler plugged
    /// in, so it is required unless a host integration is supplied.
    #[arg(long = "devMode", alias = "dev-mode")]
    pub dev_mode: bool,

    /// Emit `@suppress`-annotated JSDoc instead of precise Closure types.
    #[arg(long)]
    pub untyped: bool,

    /// Skip decorator downleveling.
    #[arg(long = "noDecoratorDownlevel", alias = "no-decorator-downlevel")]
    pub no_decorator_downlevel: bool,

    /// Skip the ES5/goog.module conversion pass.
    #[arg(long = "noEs5", alias = "no-es5")]
    pub no_es5: bool,

    /// Skip externs generation.
    #[arg(long = "noExterns", alias = "no-externs")]
    pub no_externs: bool,

    /// Emit Google-internal TypeScript code generation conventions.
    #[arg(long = "googTsCodeGeneration", alias = "goog-ts-code-generation")]
    pub goog_ts_code_generation: bool,

    // ==================== Output ====================
    /// Directory to write converted `.js` files into. Defaults to
    /// overwriting each input file's own directory.
    #[arg(short = 'o', long = "outDir", alias = "out-dir")]
    pub out_dir: Option<PathBuf>,

    /// Path to write the concatenated externs file to.
    #[arg(long = "externsPath", alias = "externs-path", default_value = "externs.js")]
    pub externs_path: PathBuf,

    // ==================== Diagnostics ====================
    /// Print translation warnings and per-pass tracing spans.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
