//! The position-preserving rewriter (spec §4.1).
//!
//! Parameterized over a [`NodeArena`] rather than a concrete AST: per the
//! host-compiler non-goal (spec §6), parsing and node storage belong to
//! the collaborator that owns the syntax tree; this crate only needs to
//! know a node's span and its children to splice rewritten sub-ranges
//! into an otherwise-verbatim copy. Grounded on the teacher's own
//! arena-index convention (`tsz_parser::parser::NodeIndex`): nodes are
//! small `Copy` handles, not owned trees.
//!
//! The rewriter/visitor mutual dependency (spec §9: "resolved by
//! inversion") is expressed as [`RewriteVisitor`]: the rewriter drives
//! traversal and offers each node to the visitor before falling back to a
//! verbatim copy.

use tsickle_common::diagnostics::{Diagnostic, DiagnosticSink};
use tsickle_common::position::{LineMap, Position};
use tsickle_common::span::Span;

use crate::source_map::SourceMapGenerator;
use crate::source_writer::{SourcePosition, SourceWriter};

/// What a syntax tree needs to expose for the rewriter to traverse it.
pub trait NodeArena {
    type NodeId: Copy + Eq;

    fn span(&self, node: Self::NodeId) -> Span;
    fn children(&self, node: Self::NodeId) -> Vec<Self::NodeId>;
}

/// Whether a visitor's `maybe_process` consumed a node itself (and is
/// responsible for having written its replacement) or left it for the
/// rewriter's default verbatim-copy-with-recursion behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    Handled,
    NotHandled,
}

/// A pass's hook into the rewriter's traversal (spec §9's "RewriteVisitor
/// capability").
pub trait RewriteVisitor<A: NodeArena> {
    fn maybe_process(&mut self, rewriter: &mut Rewriter<'_, A>, node: A::NodeId) -> ProcessResult;
}

/// Streams a rewritten copy of `source` to an internal buffer, guaranteeing
/// that any byte range no `RewriteVisitor::maybe_process` override claims
/// is reproduced identically (spec §4.1's compositionality contract).
pub struct Rewriter<'a, A: NodeArena> {
    arena: &'a A,
    source: &'a str,
    file: String,
    cursor: u32,
    writer: SourceWriter,
    input_lines: Option<LineMap>,
    diagnostics: DiagnosticSink,
}

impl<'a, A: NodeArena> Rewriter<'a, A> {
    #[must_use]
    pub fn new(arena: &'a A, source: &'a str, file: impl Into<String>) -> Self {
        Self {
            arena,
            source,
            file: file.into(),
            cursor: 0,
            writer: SourceWriter::new(),
            input_lines: None,
            diagnostics: DiagnosticSink::new(),
        }
    }

    /// Enable source-map recording: mappings are generated against
    /// `generator`'s `source_index` entry for this file.
    #[must_use]
    pub fn with_source_map(mut self, generator: SourceMapGenerator, source_index: u32) -> Self {
        self.writer = self.writer.with_source_map(generator, source_index);
        self.input_lines = Some(LineMap::build(self.source));
        self
    }

    fn input_position(&self, offset: u32) -> Option<Position> {
        self.input_lines
            .as_ref()
            .map(|lines| lines.offset_to_position(offset, self.source))
    }

    /// Copy the verbatim substring `[start, end)` of the input to the
    /// output, advancing the cursor. A no-op if `end <= start`.
    pub fn write_range(&mut self, start: u32, end: u32) {
        if end <= start {
            return;
        }
        let text = Span::new(start, end).slice_safe(self.source);
        if let Some(pos) = self.input_position(start) {
            self.writer
                .write_node(text, SourcePosition::new(pos.line, pos.character));
        } else {
            self.writer.write(text);
        }
        if end > self.cursor {
            self.cursor = end;
        }
    }

    /// Append synthetic text that has no corresponding input range (e.g. a
    /// `goog.require` line, a JSDoc comment). Does not advance the cursor.
    pub fn emit(&mut self, text: &str) {
        self.writer.write(text);
    }

    /// Dispatch to `visitor.maybe_process`; on [`ProcessResult::NotHandled`]
    /// copy the node verbatim, recursing into its children so their own
    /// overrides still apply.
    pub fn visit(&mut self, visitor: &mut impl RewriteVisitor<A>, node: A::NodeId) {
        match visitor.maybe_process(self, node) {
            ProcessResult::Handled => {
                let span = self.arena.span(node);
                if span.end > self.cursor {
                    self.cursor = span.end;
                }
            }
            ProcessResult::NotHandled => {
                let span = self.arena.span(node);
                self.write_node_from(visitor, node, span.start);
            }
        }
    }

    /// Copy `[start, node.end)`, descending into `node`'s children so a
    /// visitor override on any of them replaces just that sub-range.
    pub fn write_node_from(&mut self, visitor: &mut impl RewriteVisitor<A>, node: A::NodeId, start: u32) {
        let node_span = self.arena.span(node);
        let mut pos = start;
        for child in self.arena.children(node) {
            let child_span = self.arena.span(child);
            if child_span.start < pos {
                continue;
            }
            self.write_range(pos, child_span.start);
            self.visit(visitor, child);
            pos = self.cursor.max(child_span.end);
        }
        self.write_range(pos, node_span.end);
    }

    /// Record a diagnostic at `node`'s position and keep going (spec
    /// §4.1: "`error(node, msg)` records a diagnostic ... and keeps
    /// going").
    pub fn error(&mut self, node: A::NodeId, code: u32, message: impl Into<String>) {
        let span = self.arena.span(node);
        self.diagnostics
            .push(Diagnostic::error(self.file.clone(), span, code, message));
    }

    pub fn warn(&mut self, node: A::NodeId, code: u32, message: impl Into<String>) {
        let span = self.arena.span(node);
        self.diagnostics
            .push(Diagnostic::warning(self.file.clone(), span, code, message));
    }

    #[must_use]
    pub fn current_output(&self) -> &str {
        self.writer.get_output()
    }

    /// Flush any remaining input up to `end_of_file`, then return the
    /// output text, diagnostics, and (if enabled) the source map
    /// generator with this file's mappings folded in.
    pub fn finish(mut self, end_of_file: u32) -> RewriteOutput {
        self.write_range(self.cursor, end_of_file);
        RewriteOutput {
            text: self.writer.into_output(),
            diagnostics: self.diagnostics,
        }
    }
}

pub struct RewriteOutput {
    pub text: String,
    pub diagnostics: DiagnosticSink,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    struct NodeId(usize);

    struct FlatArena {
        spans: Vec<Span>,
        children: Vec<Vec<usize>>,
    }

    impl NodeArena for FlatArena {
        type NodeId = NodeId;

        fn span(&self, node: NodeId) -> Span {
            self.spans[node.0]
        }

        fn children(&self, node: NodeId) -> Vec<NodeId> {
            self.children[node.0].iter().map(|&i| NodeId(i)).collect()
        }
    }

    struct UppercaseIdentifiers;

    impl RewriteVisitor<FlatArena> for UppercaseIdentifiers {
        fn maybe_process(&mut self, rewriter: &mut Rewriter<'_, FlatArena>, node: NodeId) -> ProcessResult {
            if node.0 != 1 {
                return ProcessResult::NotHandled;
            }
            let span = rewriter.arena.span(node);
            let text = span.slice(rewriter.source).to_uppercase();
            rewriter.emit(&text);
            rewriter.cursor = span.end;
            ProcessResult::Handled
        }
    }

    #[test]
    fn unhandled_subtree_is_copied_verbatim() {
        let source = "let x = 1;";
        let arena = FlatArena {
            spans: vec![Span::new(0, 10)],
            children: vec![vec![]],
        };
        let mut rewriter = Rewriter::new(&arena, source, "a.ts");
        let mut visitor = NoopVisitor;
        rewriter.visit(&mut visitor, NodeId(0));
        let output = rewriter.finish(10);
        assert_eq!(output.text, source);
        assert!(output.diagnostics.as_slice().is_empty());
    }

    struct NoopVisitor;
    impl RewriteVisitor<FlatArena> for NoopVisitor {
        fn maybe_process(&mut self, _rewriter: &mut Rewriter<'_, FlatArena>, _node: NodeId) -> ProcessResult {
            ProcessResult::NotHandled
        }
    }

    #[test]
    fn overridden_child_replaces_its_range_only() {
        // "let abc = 1;" with node 1 spanning "abc" (the identifier).
        let source = "let abc = 1;";
        let arena = FlatArena {
            spans: vec![Span::new(0, 12), Span::new(4, 7)],
            children: vec![vec![1], vec![]],
        };
        let mut rewriter = Rewriter::new(&arena, source, "a.ts");
        let mut visitor = UppercaseIdentifiers;
        rewriter.visit(&mut visitor, NodeId(0));
        let output = rewriter.finish(12);
        assert_eq!(output.text, "let ABC = 1;");
    }

    #[test]
    fn error_records_diagnostic_and_continues() {
        let source = "let x = 1;";
        let arena = FlatArena {
            spans: vec![Span::new(0, 10)],
            children: vec![vec![]],
        };
        let mut rewriter = Rewriter::new(&arena, source, "a.ts");
        rewriter.error(NodeId(0), 6060, "something went wrong");
        let mut visitor = NoopVisitor;
        rewriter.visit(&mut visitor, NodeId(0));
        let output = rewriter.finish(10);
        assert_eq!(output.text, source);
        assert_eq!(output.diagnostics.as_slice().len(), 1);
    }
}
