//! # Classifier Module - Comment and Filler Detection
//!
//! Marks the parts of a [`Buffer`] that should never be typed. This is a heuristic keyed on
//! the file's [`LanguageSyntax`], not a lexer: comment markers inside string literals are
//! treated as comments too.
//!
//! Two kinds of span are folded into [`CharFlags::COMMENT`]:
//!
//! - **Comments**, together with the whitespace around them. A span is extended forward over
//!   trailing spaces and newlines and backward over leading spaces and newlines. A leading
//!   newline the backward extension lands on stays typeable.
//! - **Filler whitespace**. Of every run of spaces and newlines only one character stays
//!   typeable: the first newline if the run has one, otherwise the first space. Leading
//!   whitespace at the very start of the buffer is folded completely.
//!
//! ```text
//! buffer:  i n t _ x ; ⏎ / / _ h i ⏎ y ; ⏎
//! flags:   . . . . . . N C C C C C C . . N
//! ```

use std::ops::Range;

use bitflags::bitflags;

use crate::syntax::{CommentStyle, Terminator};
use crate::{Buffer, LanguageSyntax};

bitflags! {
    /// Classification of a single buffer position
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CharFlags: u8 {
        /// The character is a newline
        const NEWLINE = 1;
        /// The character is background text (comment or filler whitespace)
        const COMMENT = 1 << 1;
    }
}

/// Options controlling classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Fold comments and filler whitespace. When false only newlines are marked.
    pub fold_comments: bool,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            fold_comments: true,
        }
    }
}

/// Per-character flags for a buffer, co-indexed with it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Flags(Vec<CharFlags>);

impl Flags {
    /// Number of flagged positions (always equal to the buffer length)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flags of the position, empty when out of bounds
    pub fn get(&self, index: usize) -> CharFlags {
        self.0.get(index).copied().unwrap_or_default()
    }

    pub fn is_comment(&self, index: usize) -> bool {
        self.get(index).contains(CharFlags::COMMENT)
    }

    pub fn is_newline(&self, index: usize) -> bool {
        self.get(index).contains(CharFlags::NEWLINE)
    }

    /// Iterate the flags in buffer order
    pub fn iter(&self) -> impl Iterator<Item = CharFlags> + '_ {
        self.0.iter().copied()
    }

    /// Maximal runs of comment positions
    pub fn comment_spans(&self) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut open: Option<usize> = None;

        for (index, flags) in self.0.iter().enumerate() {
            match (flags.contains(CharFlags::COMMENT), open) {
                (true, None) => open = Some(index),
                (false, Some(start)) => {
                    spans.push(start..index);
                    open = None;
                }
                _ => {}
            }
        }

        if let Some(start) = open {
            spans.push(start..self.0.len());
        }

        spans
    }

    fn mark(&mut self, range: Range<usize>, flag: CharFlags) {
        let end = range.end.min(self.0.len());
        let start = range.start.min(end);
        for flags in &mut self.0[start..end] {
            flags.insert(flag);
        }
    }
}

/// Classify a buffer, using `filename_hint` to resolve the comment syntax.
pub fn classify(filename_hint: &str, buffer: &Buffer, options: ClassifyOptions) -> Flags {
    let syntax = LanguageSyntax::resolve(filename_hint, buffer);
    classify_with(syntax, buffer, options)
}

/// Classify a buffer with an already resolved syntax.
pub fn classify_with(syntax: LanguageSyntax, buffer: &Buffer, options: ClassifyOptions) -> Flags {
    let bytes = buffer.as_bytes();
    let mut flags = Flags(
        bytes
            .iter()
            .map(|&byte| {
                if byte == b'\n' {
                    CharFlags::NEWLINE
                } else {
                    CharFlags::empty()
                }
            })
            .collect(),
    );

    if !options.fold_comments {
        return flags;
    }

    let builder = SpanBuilder { buffer, syntax };
    let mut index = 0;

    while index < bytes.len() {
        if let Some(span) = builder.comment_at(index) {
            index = span.end;
            flags.mark(span, CharFlags::COMMENT);
            continue;
        }

        if is_blank(bytes[index]) {
            let (end, kept) = builder.filler_at(index);
            match kept {
                Some(kept) => {
                    flags.mark(index..kept, CharFlags::COMMENT);
                    flags.mark(kept + 1..end, CharFlags::COMMENT);
                }
                None => flags.mark(index..end, CharFlags::COMMENT),
            }
            index = end;
            continue;
        }

        index += 1;
    }

    flags
}

const fn is_blank(byte: u8) -> bool {
    matches!(byte, b' ' | b'\n' | b'\t')
}

/// Computes the `(start, end)` pairs of spans for the outer scan.
struct SpanBuilder<'a> {
    buffer: &'a Buffer,
    syntax: LanguageSyntax,
}

impl SpanBuilder<'_> {
    /// The comment span opening at `index`, including its surrounding whitespace
    fn comment_at(&self, index: usize) -> Option<Range<usize>> {
        let body = self
            .syntax
            .styles()
            .find_map(|style| self.comment_body(style, index))?;

        let end = self.blank_run_end(body.end);
        let start = self.leading_blank_start(body.start);

        Some(start..end)
    }

    /// The comment itself, before whitespace extension
    fn comment_body(&self, style: &CommentStyle, index: usize) -> Option<Range<usize>> {
        if !self.buffer.starts_with_at(index, style.open) {
            return None;
        }

        let after_open = index + style.open.len();
        let close = match style.terminator {
            Terminator::EndOfLine => "\n",
            Terminator::Delimiter(close) => close,
        };

        let end = self
            .buffer
            .find_from(after_open, close)
            .map_or(self.buffer.len(), |found| found + close.len());

        Some(index..end.min(self.buffer.len()))
    }

    /// The whitespace run starting at `index`: where it ends, and which position in it (if any)
    /// stays typeable
    fn filler_at(&self, index: usize) -> (usize, Option<usize>) {
        let end = self.blank_run_end(index);

        if index == 0 {
            return (end, None);
        }

        let kept = self.buffer.as_bytes()[index..end]
            .iter()
            .position(|&byte| byte == b'\n')
            .map_or(index, |newline| index + newline);

        (end, Some(kept))
    }

    fn blank_run_end(&self, from: usize) -> usize {
        let bytes = self.buffer.as_bytes();
        let mut end = from;
        while end < bytes.len() && is_blank(bytes[end]) {
            end += 1;
        }
        end
    }

    /// Walk back over spaces and newlines before `start`, keeping a landed-on newline typeable
    fn leading_blank_start(&self, start: usize) -> usize {
        let bytes = self.buffer.as_bytes();
        let mut begin = start;
        while begin > 0 && matches!(bytes[begin - 1], b' ' | b'\n') {
            begin -= 1;
        }

        if begin < start && bytes[begin] == b'\n' {
            begin += 1;
        }

        begin
    }
}
