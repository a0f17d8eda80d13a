//! The ES5/`goog.module` converter (spec §4.6): a line-oriented rewrite
//! over already-transpiled CommonJS, not a re-parse. Each rule matches a
//! line shape `tsc --module commonjs` is known to emit and rewrites it;
//! anything else is copied through untouched so the source map stays
//! 1:1 on every line this pass doesn't understand.

use once_cell::sync::Lazy;
use regex::Regex;
use tsickle_common::diagnostics::{diagnostic_codes, Diagnostic, DiagnosticSink};
use tsickle_common::span::Span;

use crate::host::Es5ProcessorHost;
use crate::rewrite_table::{ImportedName, ModuleRewriteTable};

static REQUIRE_BINDING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?P<indent>\s*)(?:var|const)\s+(?P<name>[A-Za-z_$][\w$]*)\s*=\s*require\((?:'(?P<spec1>[^']+)'|"(?P<spec2>[^"]+)")\);\s*$"#)
        .expect("static regex")
});

static REQUIRE_SIDE_EFFECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?P<indent>\s*)require\((?:'(?P<spec1>[^']+)'|"(?P<spec2>[^"]+)")\);\s*$"#).expect("static regex")
});

static ES_MODULE_FLAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*Object\.defineProperty\(exports,\s*["']__esModule["'],\s*\{\s*value:\s*true\s*\}\);\s*$"#)
        .expect("static regex")
});

static EXPORT_STAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?P<indent>\s*)__export\(require\((?:'(?P<spec1>[^']+)'|"(?P<spec2>[^"]+)")\)\);\s*$"#)
        .expect("static regex")
});

static EXPORTS_ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*exports\.[A-Za-z_$][\w$]*\s*="#).expect("static regex"));

fn quoted_spec<'t>(caps: &regex::Captures<'t>) -> &'t str {
    caps.name("spec1").or_else(|| caps.name("spec2")).expect("quote alternative matched").as_str()
}

/// The result of converting one file: the rewritten text plus the
/// `require` -> `goog.require` bindings it recorded (spec §3).
pub struct ConvertedModule {
    pub text: String,
    pub rewrite_table: ModuleRewriteTable,
}

/// A `export * from './x'` the annotator recorded as type-only (spec
/// §4.3 "Re-exports and type-only imports"): nothing in `x` is used as a
/// value, so the only binding the re-export needs is a `@typedef` alias
/// that keeps the `goog.require` this rule emits live in Closure's eyes
/// (spec §4.6 rule 4).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeOnlyReexport {
    pub module_specifier: String,
    pub local_name: String,
}

/// Converts `source`, the compiler's CommonJS output for `file`, into
/// `goog.module` form. Appends a warning to `sink` for any `require`
/// specifier the host can't resolve to a module id (spec's
/// `UNRESOLVED_REQUIRE`, code 6050), keeping that line as a plain
/// `goog.require` using the specifier text itself so the rest of the
/// file still converts.
///
/// `type_only_reexports` lists the `__export(require(...))` specifiers
/// the annotator found were only ever used in a type position (spec
/// §4.3); for each match, the usual namespace re-export is emitted plus
/// a `@typedef` alias, and the alias's binding is recorded in the
/// rewrite table as [`ImportedName::Named`] rather than [`ImportedName::Star`].
pub fn convert(
    source: &str,
    file: &str,
    relative_path: &str,
    host: &dyn Es5ProcessorHost,
    sink: &mut DiagnosticSink,
    type_only_reexports: &[TypeOnlyReexport],
) -> ConvertedModule {
    let module_id = host.file_name_to_module_id(file);
    let mut rewrite_table = ModuleRewriteTable::new();
    let mut out_lines: Vec<String> = Vec::new();
    let mut saw_exports_assignment = false;
    let mut temp_reexport_counter = 0usize;
    let mut offset = 0u32;

    let resolve = |spec: &str, offset: u32, sink: &mut DiagnosticSink| -> String {
        let resolved = host.path_to_module_name(file, spec);
        if resolved.is_empty() {
            sink.push(Diagnostic::warning(
                file,
                Span::new(offset, offset + u32::try_from(spec.len()).unwrap_or(0)),
                diagnostic_codes::UNRESOLVED_REQUIRE,
                format!("could not resolve module specifier '{spec}'"),
            ));
            spec.to_string()
        } else {
            resolved
        }
    };

    let mut lines = source.lines().peekable();
    while let Some(line) = lines.next() {
        let line_start = offset;
        offset += u32::try_from(line.len()).unwrap_or(0) + 1;

        if ES_MODULE_FLAG.is_match(line) {
            continue;
        }

        if let Some(caps) = REQUIRE_BINDING.captures(line) {
            let indent = &caps["indent"];
            let name = &caps["name"];
            let spec = quoted_spec(&caps);
            let required_module_id = resolve(spec, line_start, sink);
            rewrite_table.insert(name, required_module_id.clone(), ImportedName::Star);
            out_lines.push(format!("{indent}var {name} = goog.require('{required_module_id}');"));
            continue;
        }

        if let Some(caps) = EXPORT_STAR.captures(line) {
            let indent = &caps["indent"];
            let spec = quoted_spec(&caps);
            let required_module_id = resolve(spec, line_start, sink);
            let temp = format!("tsickle_reexport_{temp_reexport_counter}");
            temp_reexport_counter += 1;
            out_lines.push(format!("{indent}var {temp} = goog.require('{required_module_id}');"));
            out_lines.push(format!("{indent}for (var p in {temp}) exports[p] = {temp}[p];"));
            if let Some(reexport) = type_only_reexports.iter().find(|r| r.module_specifier == spec) {
                out_lines.push(format!(
                    "{indent}/** @typedef {{{name}}} */ var {name};",
                    name = reexport.local_name
                ));
                rewrite_table.insert(
                    reexport.local_name.clone(),
                    required_module_id,
                    ImportedName::Named(reexport.local_name.clone()),
                );
            }
            continue;
        }

        if let Some(caps) = REQUIRE_SIDE_EFFECT.captures(line) {
            let indent = &caps["indent"];
            let spec = quoted_spec(&caps);
            let required_module_id = resolve(spec, line_start, sink);
            out_lines.push(format!("{indent}goog.require('{required_module_id}');"));
            continue;
        }

        if EXPORTS_ASSIGNMENT.is_match(line) {
            saw_exports_assignment = true;
        }

        out_lines.push(line.to_string());
    }

    if !saw_exports_assignment {
        out_lines.push("exports = {};".to_string());
    }

    let header = format!("goog.module('{module_id}');\nvar module = module || {{id: '{relative_path}'}};\n");
    let body = out_lines.join("\n");
    let trailing_newline = if source.ends_with('\n') { "\n" } else { "" };
    ConvertedModule { text: format!("{header}{body}{trailing_newline}"), rewrite_table }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::PathDerivedHost;

    #[test]
    fn prepends_goog_module_header() {
        let host = PathDerivedHost;
        let mut sink = DiagnosticSink::new();
        let result = convert("exports.x = 1;\n", "src/pkg/foo.js", "pkg/foo.js", &host, &mut sink, &[]);
        assert!(result.text.starts_with("goog.module('src.pkg.foo');\n"));
        assert!(result.text.contains("var module = module || {id: 'pkg/foo.js'};"));
    }

    #[test]
    fn rewrites_var_require_binding_and_records_table_entry() {
        let host = PathDerivedHost;
        let mut sink = DiagnosticSink::new();
        let result = convert(
            "var dep_1 = require('./dep');\nexports.x = dep_1;\n",
            "src/foo.js",
            "foo.js",
            &host,
            &mut sink,
            &[],
        );
        assert!(result.text.contains("var dep_1 = goog.require('dep');"));
        assert!(!result.text.contains("require('./dep')"));
        assert_eq!(result.rewrite_table.get("dep_1"), Some(&("dep".to_string(), ImportedName::Star)));
        assert!(sink.as_slice().is_empty());
    }

    #[test]
    fn rewrites_const_require_binding() {
        let host = PathDerivedHost;
        let mut sink = DiagnosticSink::new();
        let result = convert("const dep_1 = require('./dep');\n", "src/foo.js", "foo.js", &host, &mut sink, &[]);
        assert!(result.text.contains("var dep_1 = goog.require('dep');"));
    }

    #[test]
    fn rewrites_side_effect_require() {
        let host = PathDerivedHost;
        let mut sink = DiagnosticSink::new();
        let result = convert("require('./polyfills');\nexports.x = 1;\n", "src/foo.js", "foo.js", &host, &mut sink, &[]);
        assert!(result.text.contains("goog.require('polyfills');"));
        assert!(!result.text.contains("require('./polyfills')"));
    }

    #[test]
    fn drops_esmodule_flag_and_rewrites_export_star() {
        let host = PathDerivedHost;
        let mut sink = DiagnosticSink::new();
        let source = "Object.defineProperty(exports, \"__esModule\", { value: true });\n__export(require('./dep'));\n";
        let result = convert(source, "src/foo.js", "foo.js", &host, &mut sink, &[]);
        assert!(!result.text.contains("__esModule"));
        assert!(result.text.contains("var tsickle_reexport_0 = goog.require('dep');"));
        assert!(result.text.contains("for (var p in tsickle_reexport_0) exports[p] = tsickle_reexport_0[p];"));
    }

    #[test]
    fn synthesizes_empty_exports_when_module_has_no_exports_assignment() {
        let host = PathDerivedHost;
        let mut sink = DiagnosticSink::new();
        let result = convert("var x = 1;\n", "src/foo.js", "foo.js", &host, &mut sink, &[]);
        assert!(result.text.trim_end().ends_with("exports = {};"));
    }

    #[test]
    fn does_not_synthesize_exports_when_an_assignment_is_present() {
        let host = PathDerivedHost;
        let mut sink = DiagnosticSink::new();
        let result = convert("exports.x = 1;\n", "src/foo.js", "foo.js", &host, &mut sink, &[]);
        assert!(!result.text.contains("exports = {};"));
    }

    #[test]
    fn preserves_unrelated_lines_verbatim() {
        let host = PathDerivedHost;
        let mut sink = DiagnosticSink::new();
        let result = convert("function f() {\n  return 1;\n}\nexports.f = f;\n", "src/foo.js", "foo.js", &host, &mut sink, &[]);
        assert!(result.text.contains("function f() {\n  return 1;\n}"));
    }

    #[test]
    fn unresolved_specifier_is_reported_and_kept_as_is() {
        struct AlwaysUnresolvedHost;
        impl Es5ProcessorHost for AlwaysUnresolvedHost {
            fn path_to_module_name(&self, _context_file: &str, _specifier: &str) -> String {
                String::new()
            }
            fn file_name_to_module_id(&self, _file: &str) -> String {
                "src.foo".to_string()
            }
        }

        let host = AlwaysUnresolvedHost;
        let mut sink = DiagnosticSink::new();
        let result = convert("var dep_1 = require('./dep');\n", "src/foo.js", "foo.js", &host, &mut sink, &[]);
        assert!(result.text.contains("var dep_1 = goog.require('./dep');"));
        assert_eq!(sink.as_slice().len(), 1);
        assert_eq!(sink.as_slice()[0].code, diagnostic_codes::UNRESOLVED_REQUIRE);
    }

    #[test]
    fn type_only_reexport_gets_a_typedef_alias_and_a_named_binding() {
        let host = PathDerivedHost;
        let mut sink = DiagnosticSink::new();
        let reexports = vec![TypeOnlyReexport { module_specifier: "./types".to_string(), local_name: "types".to_string() }];
        let result = convert("__export(require('./types'));\n", "src/foo.js", "foo.js", &host, &mut sink, &reexports);
        assert!(result.text.contains("var tsickle_reexport_0 = goog.require('types');"));
        assert!(result.text.contains("/** @typedef {types} */ var types;"));
        assert_eq!(
            result.rewrite_table.get("types"),
            Some(&("types".to_string(), ImportedName::Named("types".to_string())))
        );
    }

    #[test]
    fn export_star_without_a_matching_reexport_entry_emits_no_typedef() {
        let host = PathDerivedHost;
        let mut sink = DiagnosticSink::new();
        let result = convert("__export(require('./dep'));\n", "src/foo.js", "foo.js", &host, &mut sink, &[]);
        assert!(!result.text.contains("@typedef"));
        assert!(result.rewrite_table.is_empty());
    }
}
