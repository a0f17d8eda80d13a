//! The type translator (spec §4.2): turns a resolved [`TsType`] into a
//! Closure JSDoc type expression string.
//!
//! Mirrors the teacher's `TypeNodeChecker` shape (`tsz-checker::type_node`):
//! a small struct wrapping mutable translation state, a depth-limited
//! recursive dispatch (`translate` → `translate_type`), and a cache-like
//! set (there, resolved types; here, the currently-translating alias set)
//! consulted before recursing.

use rustc_hash::FxHashSet;
use tsickle_common::diagnostics::{diagnostic_codes, Diagnostic, DiagnosticSink};
use tsickle_common::span::Span;

use crate::ts_type::{AliasId, TsType, TypeAlias};

/// Stack overflow guard for pathologically deep (but non-cyclic) types.
const MAX_TRANSLATE_DEPTH: u32 = 250;

/// `?`, Closure's "unknown type" sentinel (spec §3).
pub const UNKNOWN_TYPE: &str = "?";

/// Whether the translator produces precise types or always degrades to `?`
/// (spec §4.2: typed vs. untyped mode).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TranslationMode {
    Typed,
    Untyped,
}

/// Translates [`TsType`] values to Closure JSDoc type strings.
///
/// Holds the alias table types are registered into (so `TsType::Alias`
/// references can be expanded) and the mode switch; everything else is
/// per-call state threaded through `translate`.
pub struct TypeTranslator {
    mode: TranslationMode,
    aliases: Vec<TypeAlias>,
}

impl TypeTranslator {
    #[must_use]
    pub fn new(mode: TranslationMode) -> Self {
        Self {
            mode,
            aliases: Vec::new(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> TranslationMode {
        self.mode
    }

    /// Register a type alias body and get back the `AliasId` that refers
    /// to it from other `TsType` values.
    pub fn register_alias(&mut self, name: impl Into<String>, body: TsType) -> AliasId {
        let id = AliasId(u32::try_from(self.aliases.len()).unwrap_or(u32::MAX));
        self.aliases.push(TypeAlias {
            name: name.into(),
            body,
        });
        id
    }

    /// Translate `ty` to a Closure type expression.
    ///
    /// Never fails (spec §4.2: "the translator never throws on input").
    /// In untyped mode this always returns `?` without inspecting `ty`
    /// beyond that. `file` and `span` are used only to attribute
    /// verbose-mode diagnostics.
    pub fn translate(
        &self,
        ty: &TsType,
        file: &str,
        span: Span,
        verbose: bool,
        sink: &mut DiagnosticSink,
    ) -> String {
        if self.mode == TranslationMode::Untyped {
            return UNKNOWN_TYPE.to_string();
        }
        let mut currently_translating = FxHashSet::default();
        self.translate_inner(ty, file, span, verbose, sink, &mut currently_translating, 0)
    }

    fn translate_inner(
        &self,
        ty: &TsType,
        file: &str,
        span: Span,
        verbose: bool,
        sink: &mut DiagnosticSink,
        currently_translating: &mut FxHashSet<AliasId>,
        depth: u32,
    ) -> String {
        if depth >= MAX_TRANSLATE_DEPTH {
            self.warn_untranslatable(file, span, verbose, sink, "<deeply nested type>");
            return UNKNOWN_TYPE.to_string();
        }

        match ty {
            TsType::Number => "number".to_string(),
            TsType::String => "string".to_string(),
            TsType::Boolean => "boolean".to_string(),
            TsType::Null => "null".to_string(),
            TsType::Undefined => "undefined".to_string(),
            TsType::Void => "void".to_string(),
            TsType::Any | TsType::Unknown => UNKNOWN_TYPE.to_string(),
            TsType::Never => "!Object".to_string(),
            TsType::BigInt => "bigint".to_string(),
            TsType::Symbol => "symbol".to_string(),
            TsType::TypeParameter(name) => name.clone(),
            TsType::EnumMember(qualified_name) => qualified_name.clone(),

            TsType::Nullable(inner) => {
                let inner = self.translate_inner(inner, file, span, verbose, sink, currently_translating, depth + 1);
                format!("({inner}|null)")
            }

            TsType::Array(element) => {
                let element =
                    self.translate_inner(element, file, span, verbose, sink, currently_translating, depth + 1);
                format!("!Array<{element}>")
            }

            TsType::Union(parts) => {
                let rendered: Vec<String> = parts
                    .iter()
                    .map(|p| self.translate_inner(p, file, span, verbose, sink, currently_translating, depth + 1))
                    .collect();
                format!("({})", rendered.join("|"))
            }

            TsType::Function(f) => {
                let mut pieces = Vec::new();
                if let Some(this_param) = &f.this_param {
                    let this_ty =
                        self.translate_inner(this_param, file, span, verbose, sink, currently_translating, depth + 1);
                    pieces.push(format!("this: {this_ty}"));
                }
                for param in &f.params {
                    pieces.push(self.translate_inner(param, file, span, verbose, sink, currently_translating, depth + 1));
                }
                let ret = self.translate_inner(&f.return_type, file, span, verbose, sink, currently_translating, depth + 1);
                format!("function({}): {ret}", pieces.join(", "))
            }

            TsType::Record(fields) => {
                let rendered: Vec<String> = fields
                    .iter()
                    .map(|field| {
                        let field_ty = if field.optional {
                            self.translate_inner(
                                &TsType::Union(vec![field.ty.clone(), TsType::Undefined]),
                                file,
                                span,
                                verbose,
                                sink,
                                currently_translating,
                                depth + 1,
                            )
                        } else {
                            self.translate_inner(&field.ty, file, span, verbose, sink, currently_translating, depth + 1)
                        };
                        format!("{}: {field_ty}", field.name)
                    })
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }

            TsType::Reference(reference) => {
                let Some(identifier) = &reference.symbol.value_identifier else {
                    self.warn_untranslatable(file, span, verbose, sink, &reference.symbol.name);
                    return UNKNOWN_TYPE.to_string();
                };
                let base = if reference.type_args.is_empty() {
                    identifier.clone()
                } else {
                    let args: Vec<String> = reference
                        .type_args
                        .iter()
                        .map(|arg| self.translate_inner(arg, file, span, verbose, sink, currently_translating, depth + 1))
                        .collect();
                    format!("{identifier}<{}>", args.join(", "))
                };
                if reference.non_null {
                    format!("!{base}")
                } else {
                    base
                }
            }

            TsType::Alias(alias_id) => {
                let Some(alias) = self.aliases.get(alias_id.0 as usize) else {
                    self.warn_untranslatable(file, span, verbose, sink, "<unregistered alias>");
                    return UNKNOWN_TYPE.to_string();
                };
                if !currently_translating.insert(*alias_id) {
                    if verbose {
                        sink.push(Diagnostic::warning(
                            file,
                            span,
                            diagnostic_codes::RECURSIVE_TYPE_UNFOLDED,
                            format!("type {} is recursive; replacing the cyclic reference with '?'", alias.name),
                        ));
                    }
                    return UNKNOWN_TYPE.to_string();
                }
                let body = alias.body.clone();
                let result = self.translate_inner(&body, file, span, verbose, sink, currently_translating, depth + 1);
                currently_translating.remove(alias_id);
                result
            }
        }
    }

    fn warn_untranslatable(
        &self,
        file: &str,
        span: Span,
        verbose: bool,
        sink: &mut DiagnosticSink,
        what: &str,
    ) {
        if verbose {
            sink.push(Diagnostic::warning(
                file,
                span,
                diagnostic_codes::UNTRANSLATABLE_TYPE,
                format!("could not translate type {what} precisely; emitting '?'"),
            ));
        }
    }
}
