//! `CompilationOptions`: the subset of tsickle's real `TsickleHost`/
//! `Settings` surface this core cares about (SPEC_FULL §3.1). Grounded on
//! `tsz_common::checker_options::CheckerOptions` — a plain, `Default`-able
//! options struct several passes consume by shared reference.

/// Mode switches threaded through the pipeline and every pass it drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompilationOptions {
    /// Type Translator mode switch (spec §4.2): `true` means every
    /// translation request returns `?`.
    pub untyped: bool,
    /// Whether to emit the expanded `@fileoverview`/`@suppress` block
    /// tsickle's Google-internal pipeline uses (spec §4.3).
    pub google_ts_code_generation: bool,
    pub generate_externs: bool,
    pub transform_decorators: bool,
    pub transform_typescript_types: bool,
    pub es5_mode: bool,
    /// Gates translation-warning and other degradation diagnostics
    /// (spec §4.2/§7: "only surfaced in verbose mode").
    pub verbose: bool,
    /// Spec §4.7 dev mode: skip type-checking and run each file standalone
    /// through only the ES5 converter, suppressing the annotator and
    /// decorator-downlevel passes.
    pub dev_mode: bool,
}

impl Default for CompilationOptions {
    fn default() -> Self {
        Self {
            untyped: false,
            google_ts_code_generation: false,
            generate_externs: true,
            transform_decorators: true,
            transform_typescript_types: true,
            es5_mode: true,
            verbose: false,
            dev_mode: false,
        }
    }
}
