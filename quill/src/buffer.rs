//! # Buffer Module - Typeable Text Storage
//!
//! A [`Buffer`] holds the complete typeable content of one file. Raw bytes are normalised once
//! when the buffer is built:
//!
//! - tabs become a single space
//! - printable ASCII (`0x20..=0x7e`) and `\n` are kept
//! - every other byte (including `\r` and anything non-ASCII) is dropped
//!
//! Because only ASCII survives, every byte is exactly one character and buffer indices can be
//! used directly as character positions.
//!
//! ```text
//! raw:    [i][n][t][\t][x][;][\r][\n]
//! buffer: [i][n][t][ ][x][;][\n]
//! ```

use std::ops::Range;

/// Immutable, normalised text of a single file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Buffer {
    text: String,
}

impl Buffer {
    /// Build a buffer from raw file contents
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let text = bytes
            .iter()
            .filter_map(|&byte| match byte {
                b'\t' => Some(' '),
                b'\n' | 0x20..=0x7e => Some(byte as char),
                _ => None,
            })
            .collect();

        Self { text }
    }

    /// Number of characters in the buffer
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true if nothing typeable survived normalisation
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Get the character at `index`
    pub fn get(&self, index: usize) -> Option<char> {
        self.text.as_bytes().get(index).map(|&byte| byte as char)
    }

    /// The raw bytes of the buffer
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// The buffer as a string slice
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns true if `needle` occurs at `index`
    pub fn starts_with_at(&self, index: usize, needle: &str) -> bool {
        self.as_bytes()
            .get(index..)
            .is_some_and(|rest| rest.starts_with(needle.as_bytes()))
    }

    /// Find `needle` at or after `from`, returning its starting index
    pub fn find_from(&self, from: usize, needle: &str) -> Option<usize> {
        self.text
            .get(from..)
            .and_then(|rest| rest.find(needle))
            .map(|offset| from + offset)
    }

    /// Get a slice of the text
    pub fn slice(&self, range: Range<usize>) -> &str {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        &self.text[start..end]
    }
}

impl From<&str> for Buffer {
    fn from(value: &str) -> Self {
        Self::from_bytes(value.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalisation() {
        let buffer = Buffer::from_bytes(b"a\tb\r\n\x07c");
        assert_eq!(buffer.as_str(), "a b\nc");
        assert_eq!(buffer.len(), 5);
    }

    #[test]
    fn test_non_ascii_is_dropped() {
        let buffer = Buffer::from("café\n");
        assert_eq!(buffer.as_str(), "caf\n");
    }

    #[test]
    fn test_empty() {
        assert!(Buffer::from_bytes(b"\x00\x01\r").is_empty());
        assert!(!Buffer::from("x").is_empty());
    }

    #[test]
    fn test_lookups() {
        let buffer = Buffer::from("/* a */ b");
        assert_eq!(buffer.get(0), Some('/'));
        assert_eq!(buffer.get(100), None);
        assert!(buffer.starts_with_at(0, "/*"));
        assert!(!buffer.starts_with_at(1, "/*"));
        assert!(!buffer.starts_with_at(100, "/*"));
        assert_eq!(buffer.find_from(2, "*/"), Some(5));
        assert_eq!(buffer.find_from(6, "*/"), None);
        assert_eq!(buffer.slice(3..100), "a */ b");
    }
}
