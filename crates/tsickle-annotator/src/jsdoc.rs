//! [`AnnotationPlan`] (spec §3): the per-declaration JSDoc block the
//! annotator builds, then renders to text immediately before handing
//! control back to the rewriter.

/// One JSDoc tag line. Kept as a small closed enum (rather than raw
/// strings) so the annotator can inspect/merge plans before rendering —
/// e.g. to detect "this declaration already got a `@param` for `x`".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JsDocTag {
    Type(String),
    Const,
    Private,
    Protected,
    Export,
    Abstract,
    Template(Vec<String>),
    Deprecated(Option<String>),
    Param { ty: String, name: String, description: Option<String> },
    Return(String),
    Implements(String),
    Extends(String),
    Record,
    Enum(String),
    Typedef(String),
    License(String),
    Fileoverview(String),
    Suppress(Vec<String>),
}

impl JsDocTag {
    fn render(&self) -> String {
        match self {
            JsDocTag::Type(ty) => format!("@type {{{ty}}}"),
            JsDocTag::Const => "@const".to_string(),
            JsDocTag::Private => "@private".to_string(),
            JsDocTag::Protected => "@protected".to_string(),
            JsDocTag::Export => "@export".to_string(),
            JsDocTag::Abstract => "@abstract".to_string(),
            JsDocTag::Template(names) => format!("@template {}", names.join(", ")),
            JsDocTag::Deprecated(Some(reason)) => format!("@deprecated {reason}"),
            JsDocTag::Deprecated(None) => "@deprecated".to_string(),
            JsDocTag::Param { ty, name, description: Some(desc) } => {
                format!("@param {{{ty}}} {name} {desc}")
            }
            JsDocTag::Param { ty, name, description: None } => format!("@param {{{ty}}} {name}"),
            JsDocTag::Return(ty) => format!("@return {{{ty}}}"),
            JsDocTag::Implements(ty) => format!("@implements {{{ty}}}"),
            JsDocTag::Extends(ty) => format!("@extends {{{ty}}}"),
            JsDocTag::Record => "@record".to_string(),
            JsDocTag::Enum(ty) => format!("@enum {{{ty}}}"),
            JsDocTag::Typedef(ty) => format!("@typedef {{{ty}}}"),
            JsDocTag::License(text) => format!("@license {text}"),
            JsDocTag::Fileoverview(text) => format!("@fileoverview {text}"),
            JsDocTag::Suppress(codes) => format!("@suppress {{{}}}", codes.join(",")),
        }
    }
}

/// The (possibly empty) JSDoc block to emit immediately before a
/// declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnnotationPlan {
    pub description: Option<String>,
    pub tags: Vec<JsDocTag>,
}

impl AnnotationPlan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: JsDocTag) -> &mut Self {
        self.tags.push(tag);
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.tags.is_empty()
    }

    /// Render as a `/** ... */` block, one line per logical entry, with no
    /// trailing newline. Returns the empty string for an empty plan (spec
    /// §3: "the possibly empty block").
    #[must_use]
    pub fn render(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        // A lone description, or a lone single-line tag with no
        // description, renders as a one-liner — the common case for a bare
        // `/** Some doc. */` comment or a `/** @type {string} */`/
        // `/** @record */` witness line; anything else uses the block form.
        if self.tags.is_empty() {
            if let Some(description) = &self.description {
                if !description.contains('\n') {
                    return format!("/** {description} */");
                }
            }
        } else if self.description.is_none() && self.tags.len() == 1 {
            let rendered = self.tags[0].render();
            if !rendered.contains('\n') {
                return format!("/** {rendered} */");
            }
        }

        let mut lines = Vec::new();
        if let Some(description) = &self.description {
            for line in description.lines() {
                lines.push(line.to_string());
            }
        }
        for tag in &self.tags {
            lines.push(tag.render());
        }

        let mut out = String::from("/**\n");
        for line in lines {
            out.push_str(" * ");
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(" */");
        out
    }
}
