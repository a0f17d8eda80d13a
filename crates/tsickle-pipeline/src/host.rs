//! The three collaborators spec §6 names, with SPEC_FULL §6's concrete
//! Rust shapes, plus the two overlay hosts the Pipeline Coordinator
//! composes around them (spec §9: "overlay compiler host is naturally
//! expressed as composition").

use std::sync::Arc;

use rustc_hash::FxHashMap;

/// A logical TypeScript source file (spec §3 `SourceUnit`), reduced to
/// what the pipeline itself needs: its own identity and whether it's an
/// in-scope input rather than a transitively pulled-in library file.
#[derive(Clone, Debug)]
pub struct SourceUnit {
    pub file_name: String,
    pub module_id: String,
    pub relative_path: String,
}

/// The already-parsed-and-bound program the host compiler hands back
/// (`shouldSkipTsickleProcessing`, inverted into `is_in_scope`).
pub trait HostProgram {
    fn source_units(&self) -> &[SourceUnit];
    fn is_in_scope(&self, file_name: &str) -> bool;
}

/// A plain in-memory `HostProgram`, useful for tests and for a driver
/// that has already resolved its file list some other way.
#[derive(Clone, Debug, Default)]
pub struct StaticHostProgram {
    pub units: Vec<SourceUnit>,
    pub in_scope: rustc_hash::FxHashSet<String>,
}

impl HostProgram for StaticHostProgram {
    fn source_units(&self) -> &[SourceUnit] {
        &self.units
    }

    fn is_in_scope(&self, file_name: &str) -> bool {
        self.in_scope.contains(file_name)
    }
}

/// `spec.md` §6's `Compiler host` collaborator.
pub trait CompilerHost {
    fn get_source_file(&self, file_name: &str) -> Option<Arc<str>>;
    fn file_exists(&self, file_name: &str) -> bool;
    fn read_file(&self, file_name: &str) -> anyhow::Result<String>;
    fn write_file(&mut self, file_name: &str, contents: String) -> anyhow::Result<()>;
    fn get_canonical_file_name(&self, file_name: &str) -> String;
    fn use_case_sensitive_file_names(&self) -> bool;
    fn get_new_line(&self) -> &'static str;
}

/// `spec.md` §6's `Module-name mapper` collaborator.
pub trait ModuleNameMapper {
    fn path_to_module_name(&self, context: &str, specifier: &str) -> String;
}

/// Step 1 of §4.7: overlays rewritten texts over an inner host so a
/// later pass re-parses the *rewritten* source rather than the
/// original. Every method but `get_source_file`/`read_file` forwards
/// straight through to `inner`.
pub struct SourceReplacingCompilerHost<'a> {
    inner: &'a mut dyn CompilerHost,
    overlays: FxHashMap<String, Arc<str>>,
}

impl<'a> SourceReplacingCompilerHost<'a> {
    #[must_use]
    pub fn new(inner: &'a mut dyn CompilerHost) -> Self {
        Self { inner, overlays: FxHashMap::default() }
    }

    /// Replaces `file_name`'s content for every subsequent read.
    pub fn replace(&mut self, file_name: impl Into<String>, text: impl Into<Arc<str>>) {
        self.overlays.insert(file_name.into(), text.into());
    }
}

impl CompilerHost for SourceReplacingCompilerHost<'_> {
    fn get_source_file(&self, file_name: &str) -> Option<Arc<str>> {
        self.overlays.get(file_name).cloned().or_else(|| self.inner.get_source_file(file_name))
    }

    fn file_exists(&self, file_name: &str) -> bool {
        self.overlays.contains_key(file_name) || self.inner.file_exists(file_name)
    }

    fn read_file(&self, file_name: &str) -> anyhow::Result<String> {
        if let Some(text) = self.overlays.get(file_name) {
            return Ok(text.to_string());
        }
        self.inner.read_file(file_name)
    }

    fn write_file(&mut self, file_name: &str, contents: String) -> anyhow::Result<()> {
        self.inner.write_file(file_name, contents)
    }

    fn get_canonical_file_name(&self, file_name: &str) -> String {
        self.inner.get_canonical_file_name(file_name)
    }

    fn use_case_sensitive_file_names(&self) -> bool {
        self.inner.use_case_sensitive_file_names()
    }

    fn get_new_line(&self) -> &'static str {
        self.inner.get_new_line()
    }
}

/// Step 1 of §4.7's other overlay: captures every `write_file` into an
/// in-memory map instead of touching disk, so the coordinator can hand
/// back `outputPath -> JS text` (spec §6 Outputs) without a real
/// filesystem.
pub struct OutputRetainingCompilerHost<'a> {
    inner: &'a dyn CompilerHost,
    pub outputs: FxHashMap<String, String>,
}

impl<'a> OutputRetainingCompilerHost<'a> {
    #[must_use]
    pub fn new(inner: &'a dyn CompilerHost) -> Self {
        Self { inner, outputs: FxHashMap::default() }
    }
}

impl CompilerHost for OutputRetainingCompilerHost<'_> {
    fn get_source_file(&self, file_name: &str) -> Option<Arc<str>> {
        self.inner.get_source_file(file_name)
    }

    fn file_exists(&self, file_name: &str) -> bool {
        self.inner.file_exists(file_name)
    }

    fn read_file(&self, file_name: &str) -> anyhow::Result<String> {
        self.inner.read_file(file_name)
    }

    fn write_file(&mut self, file_name: &str, contents: String) -> anyhow::Result<()> {
        self.outputs.insert(file_name.to_string(), contents);
        Ok(())
    }

    fn get_canonical_file_name(&self, file_name: &str) -> String {
        self.inner.get_canonical_file_name(file_name)
    }

    fn use_case_sensitive_file_names(&self) -> bool {
        self.inner.use_case_sensitive_file_names()
    }

    fn get_new_line(&self) -> &'static str {
        self.inner.get_new_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct InMemoryHost {
        files: FxHashMap<String, String>,
    }

    impl CompilerHost for InMemoryHost {
        fn get_source_file(&self, file_name: &str) -> Option<Arc<str>> {
            self.files.get(file_name).map(|s| Arc::from(s.as_str()))
        }

        fn file_exists(&self, file_name: &str) -> bool {
            self.files.contains_key(file_name)
        }

        fn read_file(&self, file_name: &str) -> anyhow::Result<String> {
            self.files.get(file_name).cloned().ok_or_else(|| anyhow::anyhow!("not found: {file_name}"))
        }

        fn write_file(&mut self, file_name: &str, contents: String) -> anyhow::Result<()> {
            self.files.insert(file_name.to_string(), contents);
            Ok(())
        }

        fn get_canonical_file_name(&self, file_name: &str) -> String {
            file_name.to_string()
        }

        fn use_case_sensitive_file_names(&self) -> bool {
            true
        }

        fn get_new_line(&self) -> &'static str {
            "\n"
        }
    }

    #[test]
    fn source_replacing_host_prefers_overlay_over_inner() {
        let mut files = FxHashMap::default();
        files.insert("a.ts".to_string(), "original".to_string());
        let mut inner = InMemoryHost { files };
        let mut overlay = SourceReplacingCompilerHost::new(&mut inner);
        overlay.replace("a.ts", "rewritten");
        assert_eq!(overlay.read_file("a.ts").unwrap(), "rewritten");
        assert_eq!(overlay.get_source_file("a.ts").unwrap().as_ref(), "rewritten");
    }

    #[test]
    fn source_replacing_host_falls_through_for_unreplaced_files() {
        let mut files = FxHashMap::default();
        files.insert("a.ts".to_string(), "original".to_string());
        let mut inner = InMemoryHost { files };
        let overlay = SourceReplacingCompilerHost::new(&mut inner);
        assert_eq!(overlay.read_file("a.ts").unwrap(), "original");
    }

    #[test]
    fn output_retaining_host_captures_writes_in_memory() {
        let inner = InMemoryHost { files: FxHashMap::default() };
        let mut retaining = OutputRetainingCompilerHost::new(&inner);
        retaining.write_file("out.js", "goog.module('x');".to_string()).unwrap();
        assert_eq!(retaining.outputs.get("out.js").unwrap(), "goog.module('x');");
    }
}
