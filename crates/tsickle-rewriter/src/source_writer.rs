//! Low-level output buffer the [`crate::rewriter::Rewriter`] streams
//! through. Tracks line/column of the *output* so a `write_node*` call can
//! hand a `(outputLine, outputColumn)` pair to the source-map generator
//! alongside the `SourcePosition` the caller supplies for the input side.

use crate::source_map::SourceMapGenerator;

const INDENT_UNIT: &str = "    ";

/// An input-side position a `write_node*` call is emitting text for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

impl SourcePosition {
    #[must_use]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Compute the 0-indexed (line, column) of a byte offset in `text`,
/// treating `\n` as the sole line separator (matching
/// [`tsickle_common::position::LineMap`]'s own convention).
#[must_use]
pub fn compute_line_col(text: &str, offset: usize) -> (u32, u32) {
    let mut line = 0u32;
    let mut last_newline = None;
    for (i, ch) in text.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            last_newline = Some(i);
        }
    }
    let line_start = last_newline.map_or(0, |i| i + 1);
    let column = u32::try_from(offset.saturating_sub(line_start)).unwrap_or(u32::MAX);
    (line, column)
}

/// Accumulates output text plus (optionally) source-map mappings for it.
pub struct SourceWriter {
    output: String,
    line: u32,
    column: u32,
    indent_level: u32,
    at_line_start: bool,
    source_map: Option<(SourceMapGenerator, u32)>,
}

impl SourceWriter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::new(),
            line: 0,
            column: 0,
            indent_level: 0,
            at_line_start: true,
            source_map: None,
        }
    }

    /// Enable source-map recording against `source_index` (the index
    /// `source_map.add_source` returned for the input file this writer is
    /// emitting from).
    pub fn with_source_map(mut self, generator: SourceMapGenerator, source_index: u32) -> Self {
        self.source_map = Some((generator, source_index));
        self
    }

    /// Take back the source map generator, consuming the accumulated
    /// mappings (call once emission for a file is done).
    pub fn into_source_map(self) -> Option<SourceMapGenerator> {
        self.source_map.map(|(generator, _)| generator)
    }

    fn advance(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.output.push_str(text);
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
                self.at_line_start = true;
            } else {
                if self.at_line_start && ch != ' ' {
                    self.at_line_start = false;
                }
                self.column += 1;
            }
        }
    }

    fn write_indent_if_needed(&mut self) {
        if self.at_line_start && self.indent_level > 0 {
            let indent = INDENT_UNIT.repeat(self.indent_level as usize);
            self.output.push_str(&indent);
            self.column += u32::try_from(indent.len()).unwrap_or(0);
            self.at_line_start = false;
        }
    }

    fn record_mapping(&mut self, source_pos: SourcePosition, name: Option<&str>) {
        let out_line = self.line;
        let out_col = self.column;
        if let Some((generator, source_index)) = &mut self.source_map {
            let name_index = name.map(|n| generator.add_name(n.to_string()));
            generator.add_mapping(
                out_line,
                out_col,
                *source_index,
                source_pos.line,
                source_pos.column,
                name_index,
            );
        }
    }

    /// Write plain text with no source-map attribution.
    pub fn write(&mut self, text: &str) {
        self.write_indent_if_needed();
        self.advance(text);
    }

    /// Write text attributed to `source_pos` in the input.
    pub fn write_node(&mut self, text: &str, source_pos: SourcePosition) {
        self.write_indent_if_needed();
        self.record_mapping(source_pos, None);
        self.advance(text);
    }

    /// Write text attributed to `source_pos`, additionally recording the
    /// original identifier name (for renamed/minified output).
    pub fn write_node_with_name(&mut self, text: &str, source_pos: SourcePosition, name: &str) {
        self.write_indent_if_needed();
        self.record_mapping(source_pos, Some(name));
        self.advance(text);
    }

    pub fn write_node_usize(&mut self, value: usize, source_pos: SourcePosition) {
        self.write_node(&value.to_string(), source_pos);
    }

    pub fn write_usize(&mut self, value: usize) {
        self.write(&value.to_string());
    }

    pub fn write_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.write(ch.encode_utf8(&mut buf));
    }

    pub fn write_space(&mut self) {
        self.write(" ");
    }

    pub fn write_line(&mut self) {
        self.write_indent_if_needed();
        self.advance("\n");
    }

    pub fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    #[must_use]
    pub fn current_line(&self) -> u32 {
        self.line
    }

    #[must_use]
    pub fn current_column(&self) -> u32 {
        self.column
    }

    #[must_use]
    pub fn get_output(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub fn into_output(self) -> String {
        self.output
    }
}

impl Default for SourceWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_write() {
        let mut writer = SourceWriter::new();
        writer.write("hello");
        writer.write(" ");
        writer.write("world");
        assert_eq!(writer.get_output(), "hello world");
    }

    #[test]
    fn test_newline_tracking() {
        let mut writer = SourceWriter::new();
        writer.write("line 1");
        writer.write_line();
        writer.write("line 2");

        assert_eq!(writer.current_line(), 1);
        assert_eq!(writer.get_output(), "line 1\nline 2");
    }

    #[test]
    fn test_indentation() {
        let mut writer = SourceWriter::new();
        writer.write("start");
        writer.write_line();
        writer.increase_indent();
        writer.write("indented");
        writer.write_line();
        writer.decrease_indent();
        writer.write("back");

        assert_eq!(writer.get_output(), "start\n    indented\nback");
    }

    #[test]
    fn test_compute_line_col() {
        let text = "line1\nline2\nline3";

        assert_eq!(compute_line_col(text, 0), (0, 0));
        assert_eq!(compute_line_col(text, 5), (0, 5));
        assert_eq!(compute_line_col(text, 6), (1, 0));
        assert_eq!(compute_line_col(text, 12), (2, 0));
    }

    #[test]
    fn test_write_node_records_mapping() {
        let generator = SourceMapGenerator::new("out.js".to_string());
        let mut writer = SourceWriter::new().with_source_map(generator, 0);
        writer.write_node("const x", SourcePosition::new(0, 0));
        writer.write_line();
        writer.write_node("y", SourcePosition::new(1, 4));

        let generator = writer.into_source_map().unwrap();
        let map = generator.generate();
        assert!(!map.mappings.is_empty());
    }
}
