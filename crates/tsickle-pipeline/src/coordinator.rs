//! The Pipeline Coordinator (spec §4.7): sequences the decorator,
//! annotator and ES5 passes over a host program's in-scope files,
//! re-parsing (here: re-reading the overlaid text) between each.
//!
//! The actual decorator/annotator passes need a concrete syntax tree
//! (`ClassArena`/`Declaration`) that only the host compiler can supply
//! (spec §6's parsing Non-goal), so this crate takes them as callbacks
//! rather than owning `tsickle-decorators`/`tsickle-annotator` directly
//! — the same shape as `tsz-cli::driver`'s `EmitOutputsContext`, which
//! threads closures/contexts through `compile_inner` instead of the
//! driver owning the checker's internals itself.

use rustc_hash::FxHashMap;
use tsickle_common::compilation_options::CompilationOptions;
use tsickle_common::diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSink};
use tsickle_es5::Es5ProcessorHost;

use crate::host::{HostProgram, ModuleNameMapper, SourceUnit};

/// What the Pipeline Coordinator hands back (spec §6 Outputs).
pub struct PipelineResult {
    pub js_files: FxHashMap<String, String>,
    pub externs: String,
    pub diagnostics: DiagnosticSink,
    /// The "overall success" boolean: no `DiagnosticCategory::Error` in
    /// `diagnostics`.
    pub success: bool,
}

pub struct PipelineCoordinator<'a> {
    options: CompilationOptions,
    mapper: &'a dyn ModuleNameMapper,
    es5_host: &'a dyn Es5ProcessorHost,
}

impl<'a> PipelineCoordinator<'a> {
    #[must_use]
    pub fn new(options: CompilationOptions, mapper: &'a dyn ModuleNameMapper, es5_host: &'a dyn Es5ProcessorHost) -> Self {
        Self { options, mapper, es5_host }
    }

    /// Runs the pipeline over every in-scope unit `program` names.
    ///
    /// - `sources`: each unit's original text, keyed by `file_name`.
    /// - `type_check`: step 2 — parses and type-checks the whole
    ///   program once; an empty result (or one with no errors) lets the
    ///   pipeline continue. Skipped entirely in dev mode (spec §4.7).
    /// - `decorator_pass`: step 3 (spec §4.5) — returns `Some(rewritten)`
    ///   when the file contained lowerable decorators, `None` to leave
    ///   the text as-is.
    /// - `annotator_pass`: step 4 (spec §4.3) — returns the annotated
    ///   text plus this file's externs fragment.
    /// - `emit_js`: step 5 — the host compiler's CommonJS emit for one
    ///   file, given its (possibly rewritten) text.
    pub fn run(
        &self,
        program: &dyn HostProgram,
        sources: &FxHashMap<String, String>,
        type_check: impl FnOnce() -> Vec<Diagnostic>,
        decorator_pass: impl Fn(&SourceUnit, &str, &mut DiagnosticSink) -> Option<String>,
        annotator_pass: impl Fn(&SourceUnit, &str, &mut DiagnosticSink) -> (String, String),
        emit_js: impl Fn(&SourceUnit, &str) -> String,
    ) -> PipelineResult {
        let mut diagnostics = DiagnosticSink::new();
        let mut externs = String::new();
        let mut js_files = FxHashMap::default();

        if !self.options.dev_mode {
            let _span = tracing::debug_span!("type_check").entered();
            let type_errors = type_check();
            let has_errors = type_errors.iter().any(|d| d.category == DiagnosticCategory::Error);
            for diagnostic in type_errors {
                diagnostics.push(diagnostic);
            }
            if has_errors {
                tracing::debug!("aborting pipeline: type-check errors present");
                return PipelineResult { js_files, externs, diagnostics, success: false };
            }
        }

        let run_decorators = !self.options.dev_mode && self.options.transform_decorators;
        let run_annotator = !self.options.dev_mode;

        for unit in program.source_units() {
            if !program.is_in_scope(&unit.file_name) {
                continue;
            }
            let _span = tracing::debug_span!("process_unit", file = %unit.file_name).entered();

            let original = sources.get(&unit.file_name).cloned().unwrap_or_default();
            let mut text = original;

            if run_decorators {
                if let Some(rewritten) = decorator_pass(unit, &text, &mut diagnostics) {
                    tracing::debug!(file = %unit.file_name, "decorator-downleveled");
                    text = rewritten;
                }
            }

            if run_annotator {
                let (annotated, unit_externs) = annotator_pass(unit, &text, &mut diagnostics);
                text = annotated;
                if self.options.generate_externs {
                    externs.push_str(&unit_externs);
                }
                tracing::debug!(file = %unit.file_name, "annotated");
            }

            let commonjs = emit_js(unit, &text);

            let converted = if self.options.es5_mode {
                let module = tsickle_es5::convert(
                    &commonjs,
                    &unit.file_name,
                    &unit.relative_path,
                    self.es5_host,
                    &mut diagnostics,
                    &[],
                );
                tracing::debug!(file = %unit.file_name, "es5-converted");
                module.text
            } else {
                commonjs
            };

            js_files.insert(unit.file_name.clone(), converted);
        }

        let success = !diagnostics.has_errors();
        PipelineResult { js_files, externs, diagnostics, success }
    }

    #[must_use]
    pub fn mapper(&self) -> &dyn ModuleNameMapper {
        self.mapper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StaticHostProgram;
    use tsickle_es5::PathDerivedHost;

    struct FixedMapper;
    impl ModuleNameMapper for FixedMapper {
        fn path_to_module_name(&self, _context: &str, specifier: &str) -> String {
            specifier.trim_start_matches("./").to_string()
        }
    }

    fn program_with(file_name: &str) -> StaticHostProgram {
        let mut in_scope = rustc_hash::FxHashSet::default();
        in_scope.insert(file_name.to_string());
        StaticHostProgram {
            units: vec![SourceUnit {
                file_name: file_name.to_string(),
                module_id: "pkg.foo".to_string(),
                relative_path: "foo.js".to_string(),
            }],
            in_scope,
        }
    }

    #[test]
    fn runs_all_passes_and_converts_to_goog_module() {
        let options = CompilationOptions::default();
        let mapper = FixedMapper;
        let es5_host = PathDerivedHost;
        let coordinator = PipelineCoordinator::new(options, &mapper, &es5_host);
        let program = program_with("foo.ts");
        let mut sources = FxHashMap::default();
        sources.insert("foo.ts".to_string(), "class Foo {}".to_string());

        let result = coordinator.run(
            &program,
            &sources,
            || Vec::new(),
            |_unit, text, _sink| Some(format!("/* decorated */ {text}")),
            |_unit, text, _sink| (format!("/** @fileoverview */ {text}"), "var Foo;\n".to_string()),
            |_unit, text| format!("{text}\nexports.Foo = Foo;"),
        );

        assert!(result.success);
        assert!(result.externs.contains("var Foo;"));
        let output = result.js_files.get("foo.ts").unwrap();
        assert!(output.starts_with("goog.module('pkg.foo');"));
        assert!(output.contains("/* decorated */"));
        assert!(output.contains("/** @fileoverview */"));
    }

    #[test]
    fn aborts_on_type_check_errors_without_running_passes() {
        let options = CompilationOptions::default();
        let mapper = FixedMapper;
        let es5_host = PathDerivedHost;
        let coordinator = PipelineCoordinator::new(options, &mapper, &es5_host);
        let program = program_with("foo.ts");
        let sources = FxHashMap::default();

        let result = coordinator.run(
            &program,
            &sources,
            || vec![Diagnostic::error("foo.ts", tsickle_common::span::Span::new(0, 0), 2322, "type error")],
            |_unit, text, _sink| Some(text.to_string()),
            |_unit, text, _sink| (text.to_string(), String::new()),
            |_unit, text| text.to_string(),
        );

        assert!(!result.success);
        assert!(result.js_files.is_empty());
    }

    #[test]
    fn dev_mode_skips_type_check_decorator_and_annotator_passes() {
        let mut options = CompilationOptions::default();
        options.dev_mode = true;
        let mapper = FixedMapper;
        let es5_host = PathDerivedHost;
        let coordinator = PipelineCoordinator::new(options, &mapper, &es5_host);
        let program = program_with("foo.ts");
        let mut sources = FxHashMap::default();
        sources.insert("foo.ts".to_string(), "class Foo {}".to_string());

        let result = coordinator.run(
            &program,
            &sources,
            || panic!("type_check must not run in dev mode"),
            |_unit, _text, _sink| panic!("decorator pass must not run in dev mode"),
            |_unit, _text, _sink| panic!("annotator pass must not run in dev mode"),
            |_unit, text| format!("{text}\nexports.Foo = Foo;"),
        );

        assert!(result.success);
        let output = result.js_files.get("foo.ts").unwrap();
        assert!(output.starts_with("goog.module('pkg.foo');"));
    }
}
