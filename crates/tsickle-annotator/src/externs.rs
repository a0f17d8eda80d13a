//! The Externs Generator (spec §4.4): walks ambient (`declare`/`.d.ts`)
//! declarations and emits a Closure externs file -- `var`/`function`/
//! `class` skeletons carrying the same JSDoc types the annotator would
//! attach to a real declaration, with no executable body.
//!
//! Grounded on `tsz-emitter::declaration_emitter`'s per-kind dispatch,
//! reused here over a namespace-flattened, FQN-deduplicated declaration
//! list instead of a live syntax tree.

use rustc_hash::FxHashMap;

use tsickle_common::diagnostics::{diagnostic_codes, Diagnostic, DiagnosticSink};
use tsickle_common::span::Span;
use tsickle_types::TypeTranslator;

use crate::ast::{Declaration, DeclarationKind};
use crate::jsdoc::{AnnotationPlan, JsDocTag};

/// One ambient declaration, already flattened to its fully-qualified dotted
/// name (spec §4.4: "namespace nesting collapses to a dotted global name").
pub struct ExternDeclaration {
    pub fqn: String,
    pub declaration: Declaration,
}

impl ExternDeclaration {
    #[must_use]
    pub fn new(fqn: impl Into<String>, declaration: Declaration) -> Self {
        Self {
            fqn: fqn.into(),
            declaration,
        }
    }
}

pub struct ExternsGenerator<'t> {
    translator: &'t TypeTranslator,
}

impl<'t> ExternsGenerator<'t> {
    #[must_use]
    pub fn new(translator: &'t TypeTranslator) -> Self {
        Self { translator }
    }

    /// Render `declarations` to a single externs file body.
    ///
    /// Declarations sharing a fully-qualified name keep the first
    /// occurrence and raise [`diagnostic_codes::EXTERNS_CONFLICTING_DECLARATION`]
    /// for the rest (spec §4.4: "first wins, rest are diagnostics, never a
    /// hard failure").
    #[must_use]
    pub fn generate(&self, declarations: &[ExternDeclaration], file: &str, sink: &mut DiagnosticSink) -> String {
        let mut seen: FxHashMap<&str, Span> = FxHashMap::default();
        let mut out = String::new();

        for entry in declarations {
            if let Some(first_span) = seen.get(entry.fqn.as_str()) {
                sink.push(
                    Diagnostic::warning(
                        file,
                        entry.declaration.span,
                        diagnostic_codes::EXTERNS_CONFLICTING_DECLARATION,
                        format!("conflicting ambient declaration for {}; keeping the first and discarding the rest", entry.fqn),
                    )
                    .with_related(file, *first_span, "first declared here"),
                );
                continue;
            }
            seen.insert(entry.fqn.as_str(), entry.declaration.span);
            out.push_str(&self.render_one(entry, file, sink));
            out.push('\n');
        }

        out
    }

    fn render_one(&self, entry: &ExternDeclaration, file: &str, sink: &mut DiagnosticSink) -> String {
        let decl = &entry.declaration;
        match decl.kind {
            DeclarationKind::Variable => self.render_variable(entry, file, sink),
            DeclarationKind::Function => self.render_function(entry, file, sink),
            DeclarationKind::Class => self.render_class(entry, file, sink),
            DeclarationKind::Interface => self.render_interface(entry, file, sink),
            DeclarationKind::Enum => self.render_enum(entry, file, sink),
            // A type alias has no runtime extern of its own; Closure only
            // needs the JSDoc `@typedef`, kept global by the dotted name.
            DeclarationKind::TypeAlias => self.render_typedef(entry, file, sink),
        }
    }

    fn render_variable(&self, entry: &ExternDeclaration, file: &str, sink: &mut DiagnosticSink) -> String {
        let decl = &entry.declaration;
        let mut plan = AnnotationPlan::new();
        if let Some(ty) = &decl.ty {
            let rendered = self.translator.translate(ty, file, decl.span, false, sink);
            plan.push(JsDocTag::Type(rendered));
        }
        format!("{} var {};\n", plan.render(), entry.fqn)
    }

    fn render_function(&self, entry: &ExternDeclaration, file: &str, sink: &mut DiagnosticSink) -> String {
        let decl = &entry.declaration;
        let mut plan = AnnotationPlan::new();
        for param in &decl.params {
            let ty = self.translator.translate(&param.ty, file, decl.span, false, sink);
            plan.push(JsDocTag::Param { ty, name: param.name.clone(), description: None });
        }
        if let Some(ret) = &decl.return_type {
            let ty = self.translator.translate(ret, file, decl.span, false, sink);
            plan.push(JsDocTag::Return(ty));
        }
        let params = decl.params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ");
        format!("{} function {}({}) {{}}\n", plan.render(), entry.fqn, params)
    }

    fn render_class(&self, entry: &ExternDeclaration, file: &str, sink: &mut DiagnosticSink) -> String {
        let decl = &entry.declaration;
        let mut plan = AnnotationPlan::new();
        for base in &decl.extends {
            plan.push(JsDocTag::Extends(base.clone()));
        }
        for iface in &decl.implements {
            plan.push(JsDocTag::Implements(iface.clone()));
        }
        let ctor_params = decl.params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ");
        for param in &decl.params {
            let ty = self.translator.translate(&param.ty, file, decl.span, false, sink);
            plan.push(JsDocTag::Param { ty, name: param.name.clone(), description: None });
        }
        let mut out = plan.render();
        out.push_str(&format!(" function {}({}) {{}}\n", entry.fqn, ctor_params));

        for member in &decl.members {
            let member_plan_ty = self.translator.translate(&member.ty, file, decl.span, false, sink);
            let mut member_plan = AnnotationPlan::new();
            member_plan.push(JsDocTag::Type(member_plan_ty));
            out.push_str(&member_plan.render());
            out.push_str(&format!(" {}.prototype.{};\n", entry.fqn, member.name));
        }
        out
    }

    fn render_interface(&self, entry: &ExternDeclaration, file: &str, sink: &mut DiagnosticSink) -> String {
        let decl = &entry.declaration;
        let mut header = AnnotationPlan::new();
        header.push(JsDocTag::Record);
        for base in &decl.extends {
            header.push(JsDocTag::Extends(base.clone()));
        }
        let mut out = header.render();
        out.push_str(&format!(" function {}() {{}}\n", entry.fqn));
        for member in &decl.members {
            if member.name.contains('.') {
                sink.push(Diagnostic::suggestion(
                    file,
                    decl.span,
                    diagnostic_codes::NAMESPACE_QUALIFIED_INTERFACE_MEMBER,
                    format!("namespace-qualified interface member {} is not fully specified by the source; emitting a best-effort extern", member.name),
                ));
            }
            let ty = self.translator.translate(&member.ty, file, decl.span, false, sink);
            let mut member_plan = AnnotationPlan::new();
            member_plan.push(JsDocTag::Type(ty));
            out.push_str(&member_plan.render());
            out.push_str(&format!(" {}.prototype.{};\n", entry.fqn, member.name));
        }
        out
    }

    fn render_enum(&self, entry: &ExternDeclaration, _file: &str, _sink: &mut DiagnosticSink) -> String {
        let decl = &entry.declaration;
        let ty = if decl
            .enum_members
            .iter()
            .all(|m| matches!(m.value, crate::ast::EnumMemberValue::String(_)))
            && !decl.enum_members.is_empty()
        {
            "string"
        } else {
            "number"
        };
        let mut plan = AnnotationPlan::new();
        plan.push(JsDocTag::Enum(ty.to_string()));
        format!("{} var {} = {{}};\n", plan.render(), entry.fqn)
    }

    fn render_typedef(&self, entry: &ExternDeclaration, file: &str, sink: &mut DiagnosticSink) -> String {
        let decl = &entry.declaration;
        let ty = decl.ty.clone().unwrap_or(tsickle_types::TsType::Any);
        let rendered = self.translator.translate(&ty, file, decl.span, false, sink);
        let mut plan = AnnotationPlan::new();
        plan.push(JsDocTag::Typedef(rendered));
        format!("{} var {};\n", plan.render(), entry.fqn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{InterfaceMember, Parameter};
    use tsickle_types::{TranslationMode, TsType};

    #[test]
    fn variable_extern_renders_typed_declaration() {
        let translator = TypeTranslator::new(TranslationMode::Typed);
        let generator = ExternsGenerator::new(&translator);
        let mut decl = Declaration::new(DeclarationKind::Variable, "x", Span::new(0, 1));
        decl.ty = Some(TsType::String);
        let mut sink = DiagnosticSink::new();
        let out = generator.generate(&[ExternDeclaration::new("ns.x", decl)], "a.d.ts", &mut sink);
        assert_eq!(out, "/** @type {string} */ var ns.x;\n\n");
    }

    #[test]
    fn function_extern_lists_params_and_return() {
        let translator = TypeTranslator::new(TranslationMode::Typed);
        let generator = ExternsGenerator::new(&translator);
        let mut decl = Declaration::new(DeclarationKind::Function, "f", Span::new(0, 1));
        decl.params = vec![Parameter { name: "x".into(), ty: TsType::Number, optional: false }];
        decl.return_type = Some(TsType::Boolean);
        let mut sink = DiagnosticSink::new();
        let out = generator.generate(&[ExternDeclaration::new("ns.f", decl)], "a.d.ts", &mut sink);
        assert!(out.contains("@param {number} x"));
        assert!(out.contains("@return {boolean}"));
        assert!(out.contains("function ns.f(x) {}"));
    }

    #[test]
    fn duplicate_fqn_keeps_first_and_warns() {
        let translator = TypeTranslator::new(TranslationMode::Typed);
        let generator = ExternsGenerator::new(&translator);
        let first = Declaration::new(DeclarationKind::Variable, "x", Span::new(0, 1));
        let second = Declaration::new(DeclarationKind::Variable, "x", Span::new(10, 11));
        let mut sink = DiagnosticSink::new();
        let out = generator.generate(
            &[ExternDeclaration::new("ns.x", first), ExternDeclaration::new("ns.x", second)],
            "a.d.ts",
            &mut sink,
        );
        assert_eq!(out.matches("var ns.x").count(), 1);
        assert!(sink
            .as_slice()
            .iter()
            .any(|d| d.code == diagnostic_codes::EXTERNS_CONFLICTING_DECLARATION));
    }

    #[test]
    fn interface_extern_emits_record_and_prototype_fields() {
        let translator = TypeTranslator::new(TranslationMode::Typed);
        let generator = ExternsGenerator::new(&translator);
        let mut decl = Declaration::new(DeclarationKind::Interface, "I", Span::new(0, 1));
        decl.members = vec![InterfaceMember { name: "a".into(), ty: TsType::Number }];
        let mut sink = DiagnosticSink::new();
        let out = generator.generate(&[ExternDeclaration::new("ns.I", decl)], "a.d.ts", &mut sink);
        assert!(out.contains("@record"));
        assert!(out.contains("ns.I.prototype.a"));
    }
}
