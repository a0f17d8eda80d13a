//! Source-map-v3 generation (spec §4.1: "an optional collaborator receives
//! `(outputLine, outputColumn) → (inputLine, inputColumn)` on every
//! verbatim copy and every emit").
//!
//! `vlq` implements the Base64 VLQ encoding the source-map-v3 `mappings`
//! field uses; `SourceMapGenerator` accumulates mapping entries and
//! renders them into that encoding.

use serde::Serialize;

const BASE64_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Base64 VLQ encoding, as used by source-map-v3's `mappings` field.
pub mod vlq {
    use super::BASE64_ALPHABET;

    const CONTINUATION_BIT: u32 = 0x20;
    const VALUE_MASK: u32 = 0x1f;

    /// Encode a signed delta as a Base64 VLQ string.
    #[must_use]
    pub fn encode(value: i64) -> String {
        let mut vlq = if value < 0 {
            ((-value) as u32) << 1 | 1
        } else {
            (value as u32) << 1
        };
        let mut out = String::new();
        loop {
            let mut digit = vlq & VALUE_MASK;
            vlq >>= 5;
            if vlq > 0 {
                digit |= CONTINUATION_BIT;
            }
            out.push(BASE64_ALPHABET[digit as usize] as char);
            if vlq == 0 {
                break;
            }
        }
        out
    }
}

/// One mapping entry: output position plus the input position it was
/// produced from (and, optionally, the original identifier name).
#[derive(Clone, Copy, Debug)]
struct Mapping {
    out_line: u32,
    out_col: u32,
    source_index: u32,
    in_line: u32,
    in_col: u32,
    name_index: Option<u32>,
}

/// The JSON-serializable source-map-v3 document.
#[derive(Clone, Debug, Serialize)]
pub struct SourceMap {
    pub version: u32,
    pub file: String,
    pub sources: Vec<String>,
    pub names: Vec<String>,
    pub mappings: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<String>>,
}

/// Accumulates mapping entries during a rewrite pass and renders them to a
/// [`SourceMap`]. Source/name tables are interned so repeated references
/// (the common case: many mappings point at the same input file) don't
/// duplicate entries.
#[derive(Debug, Default)]
pub struct SourceMapGenerator {
    file: String,
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    names: Vec<String>,
    mappings: Vec<Mapping>,
}

impl SourceMapGenerator {
    #[must_use]
    pub fn new(file: String) -> Self {
        Self {
            file,
            sources: Vec::new(),
            sources_content: Vec::new(),
            names: Vec::new(),
            mappings: Vec::new(),
        }
    }

    /// Register (or look up) an input source file, returning its index in
    /// the `sources` table.
    pub fn add_source(&mut self, source: String) -> u32 {
        if let Some(idx) = self.sources.iter().position(|s| *s == source) {
            return u32::try_from(idx).unwrap_or(u32::MAX);
        }
        self.sources.push(source);
        self.sources_content.push(None);
        u32::try_from(self.sources.len() - 1).unwrap_or(u32::MAX)
    }

    /// Register an input source file together with its full text, so the
    /// map is self-contained (no need to re-read the `.ts` file to view
    /// it in a debugger).
    pub fn add_source_with_content(&mut self, source: String, content: String) -> u32 {
        let idx = self.add_source(source);
        self.sources_content[idx as usize] = Some(content);
        idx
    }

    /// Register (or look up) an original identifier name, returning its
    /// index in the `names` table.
    pub fn add_name(&mut self, name: String) -> u32 {
        if let Some(idx) = self.names.iter().position(|n| *n == name) {
            return u32::try_from(idx).unwrap_or(u32::MAX);
        }
        self.names.push(name);
        u32::try_from(self.names.len() - 1).unwrap_or(u32::MAX)
    }

    /// Record a mapping without an associated original name.
    pub fn add_simple_mapping(
        &mut self,
        out_line: u32,
        out_col: u32,
        source_index: u32,
        in_line: u32,
        in_col: u32,
    ) {
        self.add_mapping(out_line, out_col, source_index, in_line, in_col, None);
    }

    /// Record a mapping, optionally attributing an original identifier
    /// name (from the `names` table).
    pub fn add_mapping(
        &mut self,
        out_line: u32,
        out_col: u32,
        source_index: u32,
        in_line: u32,
        in_col: u32,
        name_index: Option<u32>,
    ) {
        self.mappings.push(Mapping {
            out_line,
            out_col,
            source_index,
            in_line,
            in_col,
            name_index,
        });
    }

    /// Render the accumulated mappings into the source-map-v3 `mappings`
    /// field: semicolon-separated per output line, comma-separated per
    /// segment within a line, each segment's fields VLQ-delta-encoded
    /// relative to the previous segment's fields (generated column resets
    /// to 0 at the start of each line; the rest are carried across lines).
    fn encode_mappings(&self) -> String {
        if self.mappings.is_empty() {
            return String::new();
        }
        let mut sorted = self.mappings.clone();
        sorted.sort_by_key(|m| (m.out_line, m.out_col));

        let mut out = String::new();
        let mut prev_out_line = 0u32;
        let mut prev_out_col = 0i64;
        let mut prev_source = 0i64;
        let mut prev_in_line = 0i64;
        let mut prev_in_col = 0i64;
        let mut prev_name = 0i64;
        let mut first_on_line = true;

        for mapping in &sorted {
            while prev_out_line < mapping.out_line {
                out.push(';');
                prev_out_line += 1;
                prev_out_col = 0;
                first_on_line = true;
            }
            if !first_on_line {
                out.push(',');
            }
            first_on_line = false;

            out.push_str(&vlq::encode(i64::from(mapping.out_col) - prev_out_col));
            out.push_str(&vlq::encode(i64::from(mapping.source_index) - prev_source));
            out.push_str(&vlq::encode(i64::from(mapping.in_line) - prev_in_line));
            out.push_str(&vlq::encode(i64::from(mapping.in_col) - prev_in_col));
            if let Some(name_index) = mapping.name_index {
                out.push_str(&vlq::encode(i64::from(name_index) - prev_name));
                prev_name = i64::from(name_index);
            }

            prev_out_col = i64::from(mapping.out_col);
            prev_source = i64::from(mapping.source_index);
            prev_in_line = i64::from(mapping.in_line);
            prev_in_col = i64::from(mapping.in_col);
        }
        out
    }

    /// Build the final [`SourceMap`] document.
    #[must_use]
    pub fn generate(&self) -> SourceMap {
        let sources_content = if self.sources_content.iter().any(Option::is_some) {
            Some(
                self.sources_content
                    .iter()
                    .map(|c| c.clone().unwrap_or_default())
                    .collect(),
            )
        } else {
            None
        };
        SourceMap {
            version: 3,
            file: self.file.clone(),
            sources: self.sources.clone(),
            names: self.names.clone(),
            mappings: self.encode_mappings(),
            sources_content,
        }
    }

    /// Build the map and render it as a `//# sourceMappingURL=` comment
    /// with a base64-encoded inline JSON payload, for single-file output
    /// with no separate `.map` artifact.
    #[must_use]
    pub fn generate_inline(&self) -> String {
        let map = self.generate();
        let json = serde_json::to_string(&map).unwrap_or_default();
        format!(
            "//# sourceMappingURL=data:application/json;base64,{}",
            base64_encode(json.as_bytes())
        )
    }
}

fn base64_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);
    for chunk in data.chunks(3) {
        let b0 = chunk[0];
        let b1 = chunk.get(1).copied();
        let b2 = chunk.get(2).copied();

        out.push(BASE64_ALPHABET[(b0 >> 2) as usize] as char);
        out.push(BASE64_ALPHABET[((b0 & 0x03) << 4 | b1.unwrap_or(0) >> 4) as usize] as char);
        out.push(if let Some(b1) = b1 {
            BASE64_ALPHABET[((b1 & 0x0f) << 2 | b2.unwrap_or(0) >> 6) as usize] as char
        } else {
            '='
        });
        out.push(if let Some(b2) = b2 {
            BASE64_ALPHABET[(b2 & 0x3f) as usize] as char
        } else {
            '='
        });
    }
    out
}
