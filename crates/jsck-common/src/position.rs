//! Line/column positions for rendering diagnostics.

use serde::Serialize;

/// A zero-based line and character position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }
}

/// Precomputed line starts for fast offset to position conversion.
#[derive(Clone, Debug)]
pub struct LineMap {
    /// Starting offset of each line (line_starts[0] is always 0)
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map from source text.
    pub fn build(source: &str) -> Self {
        let mut line_starts = vec![0u32];

        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push((i + 1) as u32);
            } else if ch == '\r' && source.as_bytes().get(i + 1) != Some(&b'\n') {
                // Lone \r ends a line; \r\n is handled by the \n
                line_starts.push((i + 1) as u32);
            }
        }

        LineMap { line_starts }
    }

    /// Convert a byte offset to a position. Characters are counted as chars.
    pub fn offset_to_position(&self, offset: u32, source: &str) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_point) => insert_point.saturating_sub(1),
        };

        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        let clamped_end = (offset as usize).min(source.len());
        let start = (line_start as usize).min(clamped_end);
        let character = source.get(start..clamped_end).unwrap_or("").chars().count() as u32;

        Position {
            line: line as u32,
            character,
        }
    }

    /// The text of a zero-based line, without its terminator.
    pub fn line_text<'a>(&self, line: u32, source: &'a str) -> Option<&'a str> {
        let start = *self.line_starts.get(line as usize)? as usize;
        let end = self
            .line_starts
            .get(line as usize + 1)
            .map(|&next| next as usize)
            .unwrap_or(source.len());
        source
            .get(start..end)
            .map(|text| text.trim_end_matches(['\n', '\r']))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_map_basic() {
        let source = "var a;\nvar b;\nb = a;";
        let map = LineMap::build(source);

        assert_eq!(map.offset_to_position(0, source), Position::new(0, 0));
        assert_eq!(map.offset_to_position(4, source), Position::new(0, 4));
        assert_eq!(map.offset_to_position(7, source), Position::new(1, 0));
        assert_eq!(map.offset_to_position(18, source), Position::new(2, 4));
    }

    #[test]
    fn test_line_map_windows_line_endings() {
        let source = "line1\r\nline2\r\nline3";
        let map = LineMap::build(source);

        assert_eq!(map.offset_to_position(7, source), Position::new(1, 0));
        assert_eq!(map.line_text(1, source), Some("line2"));
        assert_eq!(map.line_text(2, source), Some("line3"));
    }

    #[test]
    fn test_line_text_out_of_range() {
        let map = LineMap::build("x");
        assert_eq!(map.line_text(0, "x"), Some("x"));
        assert_eq!(map.line_text(3, "x"), None);
    }
}
