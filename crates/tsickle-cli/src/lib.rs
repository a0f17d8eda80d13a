//! Driving logic for the `tsickle` binary, split out of `main.rs` so it
//! stays testable without spawning a process.

pub mod args;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use rustc_hash::FxHashMap;

use tsickle_common::compilation_options::CompilationOptions;
use tsickle_common::diagnostics::{Diagnostic, DiagnosticCategory};
use tsickle_es5::{Es5ProcessorHost, PathDerivedHost};
use tsickle_pipeline::{HostProgram, ModuleNameMapper, PipelineCoordinator, SourceUnit, StaticHostProgram};

use crate::args::CliArgs;

/// Delegates both collaborator traits the pipeline needs to
/// [`PathDerivedHost`], the only host this standalone binary has: there is
/// no BUILD-system module graph or host compiler wired in, so file paths
/// are their own module ids (spec §4.6/§9's "dev-mode pipeline with no
/// BUILD-system module graph to consult").
struct StandaloneHost(PathDerivedHost);

impl Es5ProcessorHost for StandaloneHost {
    fn path_to_module_name(&self, context_file: &str, specifier: &str) -> String {
        self.0.path_to_module_name(context_file, specifier)
    }

    fn file_name_to_module_id(&self, file: &str) -> String {
        self.0.file_name_to_module_id(file)
    }
}

impl ModuleNameMapper for StandaloneHost {
    fn path_to_module_name(&self, context: &str, specifier: &str) -> String {
        self.0.path_to_module_name(context, specifier)
    }
}

fn options_from_args(args: &CliArgs) -> CompilationOptions {
    CompilationOptions {
        untyped: args.untyped,
        google_ts_code_generation: args.goog_ts_code_generation,
        generate_externs: !args.no_externs,
        transform_decorators: !args.no_decorator_downlevel,
        transform_typescript_types: !args.untyped,
        es5_mode: !args.no_es5,
        verbose: args.verbose,
        dev_mode: args.dev_mode,
    }
}

fn output_path(input: &Path, out_dir: Option<&PathBuf>) -> PathBuf {
    let js_name = input.with_extension("js");
    match out_dir {
        Some(dir) => dir.join(js_name.file_name().unwrap_or_default()),
        None => js_name,
    }
}

fn print_diagnostic(d: &Diagnostic) {
    let severity = match d.category {
        DiagnosticCategory::Error => "error",
        DiagnosticCategory::Warning => "warning",
        DiagnosticCategory::Suggestion => "suggestion",
        DiagnosticCategory::Message => "message",
    };
    eprintln!("{}:{}-{} TS{} [{severity}] {}", d.file, d.span.start, d.span.end, d.code, d.message_text);
}

/// Runs the standalone conversion pipeline over `args.files` and writes
/// the results to disk. Returns whether the run succeeded.
pub fn run(args: CliArgs) -> anyhow::Result<bool> {
    if !args.dev_mode {
        bail!(
            "tsickle: full typed-mode compilation needs a host compiler (parsing and type-checking are out of \
             scope for this crate); pass --dev-mode to run the standalone ES5/goog.module converter"
        );
    }

    let options = options_from_args(&args);
    let host = StandaloneHost(PathDerivedHost);

    let mut units = Vec::with_capacity(args.files.len());
    let mut in_scope = rustc_hash::FxHashSet::default();
    let mut sources = FxHashMap::default();
    for path in &args.files {
        let file_name = path.to_string_lossy().into_owned();
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {file_name}"))?;
        let module_id = host.file_name_to_module_id(&file_name);
        units.push(SourceUnit { file_name: file_name.clone(), module_id, relative_path: file_name.clone() });
        in_scope.insert(file_name.clone());
        sources.insert(file_name, text);
    }
    let program = StaticHostProgram { units, in_scope };

    let coordinator = PipelineCoordinator::new(options, &host, &host);
    let result = coordinator.run(
        &program,
        &sources,
        || Vec::new(),
        |_unit, _text, _sink| None,
        |_unit, text, _sink| (text.to_string(), String::new()),
        |_unit, text| text.to_string(),
    );

    for diagnostic in result.diagnostics.as_slice() {
        print_diagnostic(diagnostic);
    }

    if !result.success {
        return Ok(false);
    }

    for unit in program.source_units() {
        let Some(js) = result.js_files.get(&unit.file_name) else { continue };
        let dest = output_path(Path::new(&unit.file_name), args.out_dir.as_ref());
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&dest, js).with_context(|| format!("writing {}", dest.display()))?;
        tracing::debug!(file = %unit.file_name, output = %dest.display(), "wrote converted module");
    }

    if options.generate_externs && !result.externs.is_empty() {
        std::fs::write(&args.externs_path, &result.externs)
            .with_context(|| format!("writing {}", args.externs_path.display()))?;
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bails_without_dev_mode() {
        let args = CliArgs {
            files: vec![PathBuf::from("a.js")],
            dev_mode: false,
            untyped: false,
            no_decorator_downlevel: false,
            no_es5: false,
            no_externs: false,
            goog_ts_code_generation: false,
            out_dir: None,
            externs_path: PathBuf::from("externs.js"),
            verbose: false,
        };
        assert!(run(args).is_err());
    }

    #[test]
    fn output_path_defaults_to_sibling_js_file() {
        assert_eq!(output_path(Path::new("src/foo.ts"), None), PathBuf::from("src/foo.js"));
    }

    #[test]
    fn output_path_honors_out_dir() {
        let out_dir = PathBuf::from("dist");
        assert_eq!(output_path(Path::new("src/foo.ts"), Some(&out_dir)), PathBuf::from("dist/foo.js"));
    }
}
