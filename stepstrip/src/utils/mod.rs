//! Utilities shared by the analyzer and the commands.

mod paths;

pub use paths::{collect_csharp_files, is_excluded, normalize_display_path, validate_output_path};

use crate::constants::{GENERATED_FILE_RE, GENERATED_HEADER_RE};

/// Converts byte offsets to 1-based line and column numbers.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new `LineIndex` by scanning the source code for newlines.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a byte offset to a 1-indexed line number.
    #[must_use]
    pub fn line_index(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// Converts a byte offset to a 1-indexed `(line, column)` pair.
    ///
    /// Columns count UTF-16 code units, like compiler diagnostics for C#: a
    /// tab or `ü` is one column, a character outside the BMP is two.
    #[must_use]
    pub fn line_col(&self, source: &str, offset: usize) -> (usize, usize) {
        let line = self.line_index(offset);
        let start = self.line_starts.get(line - 1).copied().unwrap_or(0);
        let column = source
            .get(start..offset)
            .map_or(offset - start, |prefix| prefix.encode_utf16().count());
        (line, column + 1)
    }
}

/// Checks if a path names a generated source file.
#[must_use]
pub fn is_generated_path(p: &str) -> bool {
    GENERATED_FILE_RE().is_match(p)
}

/// Checks if the source starts with an `<auto-generated>` comment.
#[must_use]
pub fn has_generated_header(source: &str) -> bool {
    source
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .is_some_and(|line| GENERATED_HEADER_RE().is_match(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let source = "ab\n\tcd\nü[x]";
        let index = LineIndex::new(source);
        assert_eq!(index.line_col(source, 0), (1, 1));
        assert_eq!(index.line_col(source, 4), (2, 2));
        // 'ü' is two bytes but one column
        assert_eq!(index.line_col(source, 9), (3, 2));
    }

    #[test]
    fn test_line_col_counts_utf16_units() {
        let source = "/* 😀 */ [x]";
        let index = LineIndex::new(source);
        let offset = source.find('[').expect("bracket");
        assert_eq!(index.line_col(source, offset), (1, 10));
    }

    #[test]
    fn test_generated_detection() {
        assert!(is_generated_path("Forms/Main.Designer.cs"));
        assert!(is_generated_path("obj/Debug/App.g.i.cs"));
        assert!(is_generated_path("Api.generated.cs"));
        assert!(!is_generated_path("src/Program.cs"));
        assert!(has_generated_header(
            "\n// <auto-generated>\n//   tool\n// </auto-generated>\nclass A {}"
        ));
        assert!(!has_generated_header("// regular\nclass A {}"));
    }
}
