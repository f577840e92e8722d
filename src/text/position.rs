use crate::text::TextRange;

/// Line lookup over a document's text.
///
/// Lines are split on `\n`; a trailing `\r` belongs to the line terminator
/// and is excluded from [`LineIndex::line_range`].
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Create a new LineIndex with pre-computed line starts
    pub fn new(text: &'a str) -> Self {
        let line_starts = compute_line_starts(text);
        Self { text, line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Zero-based line containing `offset`. Offsets past the end map to the last line.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        }
    }

    /// Byte column of `offset` within its line.
    pub fn column(&self, offset: usize) -> usize {
        offset.saturating_sub(self.line_starts[self.line_of(offset)])
    }

    /// Content range of `line`, without its terminator.
    pub fn line_range(&self, line: usize) -> Option<TextRange> {
        let start = *self.line_starts.get(line)?;
        let mut end = match self.line_starts.get(line + 1) {
            Some(next) => next - 1, // Exclude the newline
            None => self.text.len(),
        };
        if end > start && self.text.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        Some(TextRange::new(start, end))
    }

    /// Text of `line`, without its terminator.
    pub fn line_text(&self, line: usize) -> Option<&'a str> {
        self.line_range(line).map(|range| range.slice(self.text))
    }
}

/// Byte length of the leading whitespace of `line`.
pub fn first_non_whitespace(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Compute line start offsets for efficient position mapping
pub fn compute_line_starts(text: &str) -> Vec<usize> {
    let mut line_starts = vec![0];
    let mut offset = 0;

    for ch in text.chars() {
        offset += ch.len_utf8();
        if ch == '\n' {
            line_starts.push(offset);
        }
    }

    line_starts
}
