//! Newline index for 1-based line → byte-offset mapping.
//!
//! Goals
//! - Single pass over bytes to record '\n' positions.
//! - 1-based external line numbers (matches report addresses).
//! - O(1) line→byte start via the index.
//!
//! Notes
//! - An empty buffer has 0 lines.
//! - A non-empty buffer without '\n' has 1 line.
//! - A trailing '\n' terminates the last line; it does not open a phantom
//!   empty line ("a\nb\n" is 2 lines).

#[derive(Debug, Clone)]
pub struct NewlineIndex {
    /// Byte positions of every '\n' in the buffer.
    nl_positions: Vec<usize>,
    /// Total byte length of the buffer.
    len: usize,
    /// Whether the buffer ends with '\n'.
    ends_with_nl: bool,
}

impl NewlineIndex {
    /// Build an index recording positions of '\n'.
    pub fn build(bytes: &[u8]) -> Self {
        let mut nl_positions = Vec::with_capacity(bytes.len() / 48);
        let mut i = 0usize;

        // Single pass; record every '\n' offset.
        while let Some(pos) = memchr::memchr(b'\n', &bytes[i..]) {
            let abs = i + pos;
            nl_positions.push(abs);
            i = abs + 1;
        }

        Self {
            nl_positions,
            len: bytes.len(),
            ends_with_nl: bytes.last() == Some(&b'\n'),
        }
    }

    /// Total number of logical lines.
    /// Empty buffer => 0 lines; a trailing '\n' closes the last line
    /// instead of starting an empty one.
    pub fn line_count(&self) -> usize {
        if self.len == 0 {
            0
        } else if self.ends_with_nl {
            self.nl_positions.len()
        } else {
            self.nl_positions.len() + 1
        }
    }

    /// Start byte (inclusive) of a 1-based line.
    /// Returns None if line is out of range.
    pub fn start_byte_of_line(&self, line1: usize) -> Option<usize> {
        let total = self.line_count();
        if line1 == 0 || line1 > total {
            return None;
        }
        if line1 == 1 {
            return Some(0);
        }
        // For line L>1, start is one past the previous '\n'.
        self.nl_positions.get(line1 - 2).map(|&prev_nl| prev_nl + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_lines() {
        assert_eq!(NewlineIndex::build(b"").line_count(), 0);
        assert_eq!(NewlineIndex::build(b"one line").line_count(), 1);
        assert_eq!(NewlineIndex::build(b"a\nb\nc").line_count(), 3);
        assert_eq!(NewlineIndex::build(b"a\nb\nc\n").line_count(), 3);
        assert_eq!(NewlineIndex::build(b"\n").line_count(), 1);
    }

    #[test]
    fn line_starts() {
        let idx = NewlineIndex::build(b"ab\ncd\nef");
        assert_eq!(idx.start_byte_of_line(1), Some(0));
        assert_eq!(idx.start_byte_of_line(2), Some(3));
        assert_eq!(idx.start_byte_of_line(3), Some(6));
        assert_eq!(idx.start_byte_of_line(4), None);
        assert_eq!(idx.start_byte_of_line(0), None);
    }

    #[test]
    fn trailing_newline_opens_no_phantom_line() {
        let idx = NewlineIndex::build(b"ab\ncd\n");
        assert_eq!(idx.start_byte_of_line(2), Some(3));
        assert_eq!(idx.start_byte_of_line(3), None);
    }
}
