//! The converter's only collaborator (spec §4.6): resolving a module
//! specifier to Closure's dotted module id, and a file path to its own
//! module id, are both decisions the host build system owns (a BUILD
//! target's namespace, a tsconfig path mapping, ...), not this crate.

/// Resolves specifiers and file paths to Closure module ids.
pub trait Es5ProcessorHost {
    /// `require('./foo')` inside `context_file` -> `'pkg.foo'`.
    fn path_to_module_name(&self, context_file: &str, specifier: &str) -> String;

    /// The module id a given source file itself is known as.
    fn file_name_to_module_id(&self, file: &str) -> String;
}

/// A host that derives both ids directly from the file path, dropping
/// the extension and replacing path separators with dots. Useful for
/// tests and for a dev-mode pipeline with no BUILD-system module graph
/// to consult.
pub struct PathDerivedHost;

impl PathDerivedHost {
    fn to_module_id(path: &str) -> String {
        let without_ext = path
            .strip_suffix(".ts")
            .or_else(|| path.strip_suffix(".js"))
            .unwrap_or(path);
        without_ext.trim_start_matches("./").replace(['/', '\\'], ".")
    }
}

impl Es5ProcessorHost for PathDerivedHost {
    fn path_to_module_name(&self, _context_file: &str, specifier: &str) -> String {
        Self::to_module_id(specifier)
    }

    fn file_name_to_module_id(&self, file: &str) -> String {
        Self::to_module_id(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_derived_host_strips_extension_and_dots_the_path() {
        let host = PathDerivedHost;
        assert_eq!(host.file_name_to_module_id("src/pkg/foo.ts"), "src.pkg.foo");
        assert_eq!(host.path_to_module_name("src/pkg/foo.ts", "./dep"), "dep");
    }
}
