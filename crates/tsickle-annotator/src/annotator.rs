//! The JSDoc Annotator (spec §4.3): for each declaration, builds an
//! [`AnnotationPlan`] from its modifiers, its resolved type (via the Type
//! Translator), and any pre-existing JSDoc, then renders it.
//!
//! Grounded on `tsz-emitter::declaration_emitter`'s dispatch-by-kind shape
//! (one `emit_*` method per declaration kind, called from a single
//! entry point) — here, one `plan_*` method per [`DeclarationKind`].

use std::cell::RefCell;
use std::collections::BTreeSet;

use tsickle_common::diagnostics::{diagnostic_codes, Diagnostic, DiagnosticSink};
use tsickle_common::span::Span;
use tsickle_common::CompilationOptions;
use tsickle_types::{TsType, TypeTranslator};

use crate::ast::{Declaration, DeclarationKind, EnumMemberValue, ExistingJsDoc, ImportedSymbol};
use crate::jsdoc::{AnnotationPlan, JsDocTag};

/// Whole-word search for `needle` in `haystack`, so e.g. the import `Foo`
/// isn't falsely flagged as used by a rendered type `FooBar`.
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let is_ident = |b: u8| b.is_ascii_alphanumeric() || b == b'_' || b == b'$';
    let bytes = haystack.as_bytes();
    let mut search_from = 0;
    while let Some(offset) = haystack[search_from..].find(needle) {
        let start = search_from + offset;
        let end = start + needle.len();
        let before_ok = start == 0 || !is_ident(bytes[start - 1]);
        let after_ok = end == bytes.len() || !is_ident(bytes[end]);
        if before_ok && after_ok {
            return true;
        }
        search_from = start + 1;
        if search_from >= haystack.len() {
            break;
        }
    }
    false
}

/// The default `@suppress` taxonomy tsickle emits for low-confidence
/// output (spec §4.3: "an expanded `@suppress` list ... covering the
/// taxonomy of Closure warnings the author of this spec has chosen to
/// silence").
const LOW_CONFIDENCE_SUPPRESSIONS: &[&str] = &[
    "checkTypes",
    "extraRequire",
    "missingOverride",
    "missingReturn",
    "unusedPrivateMembers",
    "uselessCode",
];

pub struct JsDocAnnotator<'t> {
    translator: &'t TypeTranslator,
    options: CompilationOptions,
    /// Spec §4.3 step 3: "unless in a mode that bans type-in-comment --
    /// then a diagnostic is raised".
    ban_type_in_comment: bool,
    /// Locally-bound names the host compiler reports as imported into the
    /// file under annotation (spec §4.3 "Re-exports and type-only
    /// imports"). Empty unless the caller opts in via [`Self::with_imports`].
    imports: &'t [ImportedSymbol],
    used_imports: RefCell<BTreeSet<String>>,
}

impl<'t> JsDocAnnotator<'t> {
    #[must_use]
    pub fn new(translator: &'t TypeTranslator, options: CompilationOptions, ban_type_in_comment: bool) -> Self {
        Self::with_imports(translator, options, ban_type_in_comment, &[])
    }

    /// Like [`Self::new`], but also tracks which of `imports` end up
    /// referenced from a type position, so a companion `/** @typedef */`
    /// alias can be emitted for each (spec §4.3: "the annotator records
    /// such usages and emits a companion `@typedef` alias so the
    /// `goog.require` at the ES5 stage remains live").
    #[must_use]
    pub fn with_imports(
        translator: &'t TypeTranslator,
        options: CompilationOptions,
        ban_type_in_comment: bool,
        imports: &'t [ImportedSymbol],
    ) -> Self {
        Self {
            translator,
            options,
            ban_type_in_comment,
            imports,
            used_imports: RefCell::new(BTreeSet::new()),
        }
    }

    fn translate(&self, ty: &TsType, file: &str, span: Span, sink: &mut DiagnosticSink) -> String {
        let rendered = self.translator.translate(ty, file, span, self.options.verbose, sink);
        self.note_type_position_usage(&rendered);
        rendered
    }

    /// Marks any tracked import whose local name occurs (as a whole word)
    /// in `rendered_type` as used. Called for every type the annotator
    /// renders, plus class/interface heritage clauses, which are type
    /// positions too even though they're plain identifiers rather than a
    /// translated [`TsType`].
    fn note_type_position_usage(&self, rendered_type: &str) {
        if self.imports.is_empty() {
            return;
        }
        let mut used = self.used_imports.borrow_mut();
        for imp in self.imports {
            if !used.contains(&imp.local_name) && contains_word(rendered_type, &imp.local_name) {
                used.insert(imp.local_name.clone());
            }
        }
    }

    /// Spec §4.3: one `/** @typedef {name} */ var name;` alias per
    /// imported symbol actually referenced from a type position, so the
    /// `goog.require` the ES5 stage emits for it has a use Closure can
    /// see and doesn't get flagged or stripped as unused.
    #[must_use]
    pub fn type_only_import_aliases(&self) -> Vec<String> {
        let used = self.used_imports.borrow();
        self.imports
            .iter()
            .filter(|imp| used.contains(&imp.local_name))
            .map(|imp| {
                let mut plan = AnnotationPlan::new();
                plan.push(JsDocTag::Typedef(imp.local_name.clone()));
                format!("{} var {};", plan.render(), imp.local_name)
            })
            .collect()
    }

    fn check_user_type(&self, existing: Option<&ExistingJsDoc>, file: &str, span: Span, sink: &mut DiagnosticSink) {
        let Some(existing) = existing else { return };
        let Some(_user_type) = &existing.user_type else { return };
        if self.ban_type_in_comment {
            sink.push(Diagnostic::error(
                file,
                span,
                diagnostic_codes::TYPE_IN_COMMENT_BANNED,
                "user-written type annotation in JSDoc is not allowed in this mode",
            ));
        }
    }

    fn push_common_modifiers(&self, plan: &mut AnnotationPlan, decl: &Declaration) {
        if decl.modifiers.private {
            plan.push(JsDocTag::Private);
        }
        if decl.modifiers.protected {
            plan.push(JsDocTag::Protected);
        }
        if decl.modifiers.is_abstract {
            plan.push(JsDocTag::Abstract);
        }
        if decl.modifiers.exported {
            plan.push(JsDocTag::Export);
        }
        if decl.modifiers.deprecated {
            let reason = decl
                .existing_jsdoc
                .as_ref()
                .and_then(|doc| doc.deprecated_reason.clone());
            plan.push(JsDocTag::Deprecated(reason));
        }
        if !decl.type_params.is_empty() {
            plan.push(JsDocTag::Template(decl.type_params.clone()));
        }
    }

    /// Build the leading [`AnnotationPlan`] for `decl` (spec §4.3 steps
    /// 1-3; step 4, emitting it before the declaration, is the caller's
    /// job once it drives the rewriter).
    pub fn plan_for(&self, decl: &Declaration, file: &str, sink: &mut DiagnosticSink) -> AnnotationPlan {
        self.check_user_type(decl.existing_jsdoc.as_ref(), file, decl.span, sink);

        match decl.kind {
            DeclarationKind::Variable => self.plan_value(decl, file, sink),
            DeclarationKind::Function => self.plan_function(decl, file, sink),
            DeclarationKind::Class => self.plan_class(decl, file, sink),
            DeclarationKind::Interface => self.plan_interface_header(decl),
            DeclarationKind::TypeAlias => self.plan_type_alias(decl, file, sink),
            DeclarationKind::Enum => self.plan_enum(decl, file, sink),
        }
    }

    fn plan_value(&self, decl: &Declaration, file: &str, sink: &mut DiagnosticSink) -> AnnotationPlan {
        let mut plan = AnnotationPlan::new();
        if let Some(description) = decl.existing_jsdoc.as_ref().and_then(|d| d.description.clone()) {
            plan.set_description(description);
        }
        if let Some(ty) = &decl.ty {
            let rendered = self.translate(ty, file, decl.span, sink);
            plan.push(JsDocTag::Type(rendered));
        }
        if decl.modifiers.readonly {
            plan.push(JsDocTag::Const);
        }
        self.push_common_modifiers(&mut plan, decl);
        plan
    }

    fn param_type_string(&self, param: &crate::ast::Parameter, file: &str, span: Span, sink: &mut DiagnosticSink) -> String {
        if param.optional {
            let unioned = TsType::union(vec![param.ty.clone(), TsType::Undefined]);
            self.translate(&unioned, file, span, sink)
        } else {
            self.translate(&param.ty, file, span, sink)
        }
    }

    fn plan_function(&self, decl: &Declaration, file: &str, sink: &mut DiagnosticSink) -> AnnotationPlan {
        let mut plan = AnnotationPlan::new();
        if let Some(description) = decl.existing_jsdoc.as_ref().and_then(|d| d.description.clone()) {
            plan.set_description(description);
        }
        let existing_params = decl
            .existing_jsdoc
            .as_ref()
            .map(|d| d.param_docs.as_slice())
            .unwrap_or(&[]);

        for param in &decl.params {
            let ty = self.param_type_string(param, file, decl.span, sink);
            let description = existing_params
                .iter()
                .find(|doc| doc.name == param.name)
                .map(|doc| doc.description.clone());
            plan.push(JsDocTag::Param {
                ty,
                name: param.name.clone(),
                description,
            });
        }

        let return_ty = decl.return_type.clone().unwrap_or(TsType::Void);
        if !matches!(return_ty, TsType::Void) {
            let rendered = self.translate(&return_ty, file, decl.span, sink);
            plan.push(JsDocTag::Return(rendered));
        }

        self.push_common_modifiers(&mut plan, decl);
        plan
    }

    fn plan_class(&self, decl: &Declaration, file: &str, sink: &mut DiagnosticSink) -> AnnotationPlan {
        let mut plan = AnnotationPlan::new();
        if let Some(description) = decl.existing_jsdoc.as_ref().and_then(|d| d.description.clone()) {
            plan.set_description(description);
        }
        for base in &decl.extends {
            self.note_type_position_usage(base);
            plan.push(JsDocTag::Extends(base.clone()));
        }
        for iface in &decl.implements {
            self.note_type_position_usage(iface);
            plan.push(JsDocTag::Implements(iface.clone()));
        }
        self.push_common_modifiers(&mut plan, decl);
        let _ = (file, sink); // classes have no single translated type of their own
        plan
    }

    /// Interfaces get no leading `@type`-bearing block of their own (spec
    /// §4.3: "TypeScript interfaces are erased at emit time"); only
    /// modifiers/description carry over, the runtime witness is a
    /// trailing block built by [`Self::interface_trailer`].
    fn plan_interface_header(&self, decl: &Declaration) -> AnnotationPlan {
        let mut plan = AnnotationPlan::new();
        if let Some(description) = decl.existing_jsdoc.as_ref().and_then(|d| d.description.clone()) {
            plan.set_description(description);
        }
        self.push_common_modifiers(&mut plan, decl);
        plan
    }

    fn plan_type_alias(&self, decl: &Declaration, file: &str, sink: &mut DiagnosticSink) -> AnnotationPlan {
        let mut plan = AnnotationPlan::new();
        if let Some(description) = decl.existing_jsdoc.as_ref().and_then(|d| d.description.clone()) {
            plan.set_description(description);
        }
        let ty = decl.ty.clone().unwrap_or(TsType::Any);
        let rendered = self.translate(&ty, file, decl.span, sink);
        plan.push(JsDocTag::Typedef(rendered));
        self.push_common_modifiers(&mut plan, decl);
        plan
    }

    fn plan_enum(&self, decl: &Declaration, file: &str, sink: &mut DiagnosticSink) -> AnnotationPlan {
        let mut plan = AnnotationPlan::new();
        if let Some(description) = decl.existing_jsdoc.as_ref().and_then(|d| d.description.clone()) {
            plan.set_description(description);
        }
        plan.push(JsDocTag::Enum(self.enum_member_type(decl)));
        self.push_common_modifiers(&mut plan, decl);
        let _ = (file, sink);
        plan
    }

    fn enum_member_type(&self, decl: &Declaration) -> String {
        let all_numbers = decl
            .enum_members
            .iter()
            .all(|m| matches!(m.value, EnumMemberValue::Number(_)));
        let all_strings = decl
            .enum_members
            .iter()
            .all(|m| matches!(m.value, EnumMemberValue::String(_)));
        if decl.enum_members.is_empty() || all_numbers {
            "number".to_string()
        } else if all_strings {
            "string".to_string()
        } else {
            "?".to_string()
        }
    }

    /// Spec §4.3, "Interfaces": the trailing runtime-witness block for an
    /// exported interface. Emitted by the pass after the interface's
    /// (erased) declaration site.
    #[must_use]
    pub fn interface_trailer(&self, decl: &Declaration, file: &str, sink: &mut DiagnosticSink) -> String {
        let mut out = String::new();
        let mut header = AnnotationPlan::new();
        header.push(JsDocTag::Record);
        for base in &decl.extends {
            self.note_type_position_usage(base);
            header.push(JsDocTag::Extends(base.clone()));
        }
        out.push_str(&header.render());
        out.push_str(&format!(" function {}() {{}}\n", decl.name));

        for member in &decl.members {
            let mut field_plan = AnnotationPlan::new();
            let rendered = self.translate(&member.ty, file, decl.span, sink);
            field_plan.push(JsDocTag::Type(rendered));
            out.push_str(&field_plan.render());
            out.push_str(&format!(" {}.prototype.{};\n", decl.name, member.name));
        }
        out
    }

    /// Spec §4.3, "Fileoverview": the file-level block prefixed to every
    /// annotator output, merging a pre-existing `@fileoverview`/`@license`
    /// block if one was present.
    #[must_use]
    pub fn file_overview(&self, existing: Option<&ExistingJsDoc>, low_confidence: bool) -> String {
        let mut plan = AnnotationPlan::new();
        let mut overview = String::from("added by tsickle");
        if let Some(existing) = existing {
            if let Some(text) = &existing.fileoverview {
                overview = format!("{text}\n\nadded by tsickle");
            }
        }
        plan.push(JsDocTag::Fileoverview(overview));
        if let Some(license) = existing.and_then(|e| e.license.clone()) {
            plan.push(JsDocTag::License(license));
        }
        let suppressions: Vec<String> = if low_confidence || self.options.untyped {
            LOW_CONFIDENCE_SUPPRESSIONS.iter().map(|s| s.to_string()).collect()
        } else {
            vec!["checkTypes".to_string()]
        };
        plan.push(JsDocTag::Suppress(suppressions));
        plan.render()
    }
}
