//! Hand-maintained diagnostic message table for the tsickle core.
//!
//! Unlike a full type checker, tsickle's own diagnostic surface is small:
//! translation degradation, decorator-lowering refusals, module-conversion
//! fallbacks, and a couple of internal-invariant assertions. Codes live in
//! `6000..7000` to stay clear of the host compiler's `TS````` numbering.

use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const UNTRANSLATABLE_TYPE: u32 = 6001;
    pub const RECURSIVE_TYPE_UNFOLDED: u32 = 6002;
    pub const TYPE_IN_COMMENT_BANNED: u32 = 6010;
    pub const EXTERNS_CONFLICTING_DECLARATION: u32 = 6020;
    pub const NAMESPACE_QUALIFIED_INTERFACE_MEMBER: u32 = 6030;
    pub const DECORATOR_ON_COMPUTED_NAME: u32 = 6040;
    pub const DECORATOR_ON_NAMESPACE_MEMBER: u32 = 6041;
    pub const UNRESOLVED_REQUIRE: u32 = 6050;
    pub const REWRITER_CURSOR_OVERRUN: u32 = 6060;
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::UNTRANSLATABLE_TYPE,
        category: DiagnosticCategory::Warning,
        message: "could not translate type {0} precisely; emitting '?'",
    },
    DiagnosticMessage {
        code: diagnostic_codes::RECURSIVE_TYPE_UNFOLDED,
        category: DiagnosticCategory::Warning,
        message: "type {0} is recursive; replacing the cyclic reference with '?'",
    },
    DiagnosticMessage {
        code: diagnostic_codes::TYPE_IN_COMMENT_BANNED,
        category: DiagnosticCategory::Error,
        message: "user-written type annotation in JSDoc for {0} is not allowed in this mode",
    },
    DiagnosticMessage {
        code: diagnostic_codes::EXTERNS_CONFLICTING_DECLARATION,
        category: DiagnosticCategory::Warning,
        message: "conflicting ambient declaration for {0}; keeping the first and discarding the rest",
    },
    DiagnosticMessage {
        code: diagnostic_codes::NAMESPACE_QUALIFIED_INTERFACE_MEMBER,
        category: DiagnosticCategory::Suggestion,
        message: "namespace-qualified interface member {0} is not fully specified by the source; emitting a best-effort extern",
    },
    DiagnosticMessage {
        code: diagnostic_codes::DECORATOR_ON_COMPUTED_NAME,
        category: DiagnosticCategory::Warning,
        message: "cannot lower decorator on computed member name {0}; leaving it untransformed",
    },
    DiagnosticMessage {
        code: diagnostic_codes::DECORATOR_ON_NAMESPACE_MEMBER,
        category: DiagnosticCategory::Warning,
        message: "cannot lower decorator on namespace member {0}; leaving it untransformed",
    },
    DiagnosticMessage {
        code: diagnostic_codes::UNRESOLVED_REQUIRE,
        category: DiagnosticCategory::Warning,
        message: "require({0}) could not be matched to a resolved specifier; leaving it untransformed",
    },
    DiagnosticMessage {
        code: diagnostic_codes::REWRITER_CURSOR_OVERRUN,
        category: DiagnosticCategory::Error,
        message: "rewriter cursor advanced past the end of {0}",
    },
];
