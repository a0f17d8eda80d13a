//! Diagnostic types and message lookup shared by every tsickle pass.
//!
//! Passes never fail on bad input (§7 of the design): they record a
//! [`Diagnostic`] and keep going. `data` holds the small, hand-maintained
//! table of tsickle-specific messages; codes live in the `6000`-`6999`
//! range so they never collide with the host compiler's own `TS````` codes.

use crate::span::Span;
use serde::Serialize;

mod data;
pub use data::{DIAGNOSTIC_MESSAGES, diagnostic_codes};

/// Diagnostic category, mirroring the host compiler's own taxonomy so a
/// driver can sort/filter tsickle diagnostics next to type-check errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

/// Related information for a diagnostic (e.g. "first declared here").
#[derive(Clone, Debug, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub span: Span,
    pub message_text: String,
}

/// A `(file, position, message)` triple with severity (spec §3). All passes
/// append to a shared sink; none of them throw on source errors.
#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub span: Span,
    pub category: DiagnosticCategory,
    pub code: u32,
    pub message_text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(
        file: impl Into<String>,
        span: Span,
        category: DiagnosticCategory,
        code: u32,
        message_text: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            span,
            category,
            code,
            message_text: message_text.into(),
            related_information: Vec::new(),
        }
    }

    #[must_use]
    pub fn error(file: impl Into<String>, span: Span, code: u32, message: impl Into<String>) -> Self {
        Self::new(file, span, DiagnosticCategory::Error, code, message)
    }

    #[must_use]
    pub fn warning(file: impl Into<String>, span: Span, code: u32, message: impl Into<String>) -> Self {
        Self::new(file, span, DiagnosticCategory::Warning, code, message)
    }

    #[must_use]
    pub fn suggestion(file: impl Into<String>, span: Span, code: u32, message: impl Into<String>) -> Self {
        Self::new(file, span, DiagnosticCategory::Suggestion, code, message)
    }

    #[must_use]
    pub fn with_related(mut self, file: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            file: file.into(),
            span,
            message_text: message.into(),
        });
        self
    }
}

/// Append-only sink passes accumulate into (spec §5: "the diagnostic sink
/// is the only shared mutable collection; all passes append-only").
#[derive(Debug, Default, Clone)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.category == DiagnosticCategory::Error)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn extend(&mut self, other: DiagnosticSink) {
        self.diagnostics.extend(other.diagnostics);
    }
}

/// A diagnostic message definition with code, category, and template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Format a message template by replacing `{0}`, `{1}`, … with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_tracks_errors_but_not_warnings() {
        let mut sink = DiagnosticSink::new();
        sink.push(Diagnostic::warning("a.ts", Span::new(0, 1), diagnostic_codes::UNTRANSLATABLE_TYPE, "x"));
        assert!(!sink.has_errors());
        sink.push(Diagnostic::error("a.ts", Span::new(0, 1), diagnostic_codes::REWRITER_CURSOR_OVERRUN, "y"));
        assert!(sink.has_errors());
        assert_eq!(sink.as_slice().len(), 2);
    }

    #[test]
    fn format_message_substitutes_positional_args() {
        let out = format_message("cannot lower decorator on {0}", &["Symbol.iterator"]);
        assert_eq!(out, "cannot lower decorator on Symbol.iterator");
    }

    #[test]
    fn message_table_round_trips_known_code() {
        let template = get_message_template(diagnostic_codes::DECORATOR_ON_COMPUTED_NAME).unwrap();
        assert!(template.contains("computed"));
    }
}
