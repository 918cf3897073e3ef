//! Line buffer abstraction.
//!
//! The buffer is an ordered `Vec<String>` where index order is document order.
//! Lines never carry their terminator; `content()` re-adds one terminator after
//! every line when serializing, so a buffer of N lines always writes N
//! terminators. The terminator style is taken from the first line ending seen
//! on load (`\r\n` or `\n`).
//!
//! Columns are 1-based and count extended grapheme clusters. Column `len + 1`
//! is the insertion point past the last cluster. Every mutating helper takes a
//! `(row, col)` pair and reports whether anything changed so callers (the
//! dispatcher) can decide if the modified flag flips.

/// A cursor position: 0-based row and 1-based grapheme column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Top-left insertion point (row 0, column 1).
    pub fn origin() -> Self {
        Self { row: 0, col: 1 }
    }

    /// Clamp into the valid range for a buffer with `line_count` lines whose
    /// per-line grapheme length is reported by `line_len_fn`.
    pub fn clamp_to<F>(&mut self, line_count: usize, mut line_len_fn: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            self.row = 0;
            self.col = 1;
            return;
        }
        if self.row >= line_count {
            self.row = line_count - 1;
        }
        let max_col = line_len_fn(self.row) + 1;
        self.col = self.col.clamp(1, max_col);
    }
}

/// Line terminator written after every line by `Buffer::content`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Style of the first terminator in `content`; `Lf` when there is none.
    pub fn detect(content: &str) -> Self {
        match content.find('\n') {
            Some(i) if content[..i].ends_with('\r') => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Ordered sequence of text lines for the file being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    lines: Vec<String>,
    ending: LineEnding,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split file text into lines. `\n` and `\r\n` both terminate a line; a
    /// final terminator does not create an extra empty line.
    pub fn from_text(content: &str) -> Self {
        Self {
            lines: content.lines().map(str::to_owned).collect(),
            ending: LineEnding::detect(content),
        }
    }

    pub fn line_ending(&self) -> LineEnding {
        self.ending
    }

    /// Replace all content.
    pub fn load<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = lines.into_iter().map(Into::into).collect();
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Append a line at the end of the document.
    pub fn insert_line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Length of a line in grapheme clusters (0 for rows past the end).
    pub fn line_len(&self, row: usize) -> usize {
        self.lines
            .get(row)
            .map(|l| grapheme::count(l))
            .unwrap_or(0)
    }

    /// Make sure at least one (empty) line exists so an insertion point is
    /// addressable. Returns true when a line was created.
    pub fn ensure_line(&mut self) -> bool {
        if self.lines.is_empty() {
            self.lines.push(String::new());
            true
        } else {
            false
        }
    }

    /// Split `row` at `col`: the prefix stays in place and the suffix becomes
    /// a new line directly after it. Returns false if `row` does not exist.
    pub fn splice_at(&mut self, row: usize, col: usize) -> bool {
        let Some(line) = self.lines.get_mut(row) else {
            return false;
        };
        let at = grapheme::byte_offset(line, col);
        let suffix = line.split_off(at);
        self.lines.insert(row + 1, suffix);
        true
    }

    /// Concatenate `row` onto the end of `row - 1` and remove it. Returns the
    /// column where the join happened (former predecessor length + 1), or
    /// `None` for row 0 / out-of-range rows.
    pub fn merge_up(&mut self, row: usize) -> Option<usize> {
        if row == 0 || row >= self.lines.len() {
            return None;
        }
        let tail = self.lines.remove(row);
        let prev = &mut self.lines[row - 1];
        let join_col = grapheme::count(prev) + 1;
        prev.push_str(&tail);
        Some(join_col)
    }

    /// Insert `text` (normally a single character) before the cluster at
    /// `col`. Returns false if `row` does not exist.
    pub fn insert_str(&mut self, row: usize, col: usize, text: &str) -> bool {
        let Some(line) = self.lines.get_mut(row) else {
            return false;
        };
        let at = grapheme::byte_offset(line, col);
        line.insert_str(at, text);
        true
    }

    pub fn insert_char(&mut self, row: usize, col: usize, ch: char) -> bool {
        let mut tmp = [0u8; 4];
        self.insert_str(row, col, ch.encode_utf8(&mut tmp))
    }

    /// Remove the cluster immediately before `col` (no-op at column 1).
    pub fn delete_before(&mut self, row: usize, col: usize) -> bool {
        if col <= 1 {
            return false;
        }
        let Some(line) = self.lines.get_mut(row) else {
            return false;
        };
        let end = grapheme::byte_offset(line, col);
        let start = grapheme::byte_offset(line, col - 1);
        if start == end {
            return false;
        }
        line.replace_range(start..end, "");
        true
    }

    /// All lines joined, each followed by the buffer's line ending.
    pub fn content(&self) -> String {
        let eol = self.ending.as_str();
        let cap = self.lines.iter().map(|l| l.len() + eol.len()).sum();
        let mut out = String::with_capacity(cap);
        for line in &self.lines {
            out.push_str(line);
            out.push_str(eol);
        }
        out
    }
}

/// Grapheme helpers operating on a single line.
pub mod grapheme {
    use unicode_segmentation::UnicodeSegmentation;
    use unicode_width::UnicodeWidthStr;

    pub fn iter(line: &str) -> impl Iterator<Item = &str> {
        line.graphemes(true)
    }

    /// Number of grapheme clusters in `line`.
    pub fn count(line: &str) -> usize {
        line.graphemes(true).count()
    }

    /// Byte offset of the insertion point at 1-based `col`. Columns past the
    /// end clamp to `line.len()`.
    pub fn byte_offset(line: &str, col: usize) -> usize {
        let skip = col.saturating_sub(1);
        line.grapheme_indices(true)
            .nth(skip)
            .map(|(idx, _)| idx)
            .unwrap_or(line.len())
    }

    /// Terminal cells occupied by the clusters before 1-based `col`.
    pub fn visual_col(line: &str, col: usize) -> usize {
        line.graphemes(true)
            .take(col.saturating_sub(1))
            .map(cluster_width)
            .sum()
    }

    /// Width in terminal cells of one cluster (never less than one so the
    /// cursor always has a cell to sit on).
    pub fn cluster_width(g: &str) -> usize {
        UnicodeWidthStr::width(g).max(1)
    }
}
