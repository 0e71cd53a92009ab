//! # Display Module - Cell-Addressed Drawing Seam
//!
//! The engine never owns a terminal. Everything it paints goes through the [`Display`] trait:
//! single glyphs or short strings at a `(row, col)` position, tagged with a named [`Attr`]. How
//! an attribute looks (colours, bold, reverse video) is entirely up to the implementation.
//!
//! Nothing is ever read back from a display, so a test double only has to record calls.

use std::io;

use crate::Grid;

/// Named drawing attributes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumIter, strum::EnumCount,
)]
#[strum(serialize_all = "snake_case")]
pub enum Attr {
    /// Untyped text
    #[default]
    Normal,
    /// The character to type next
    Cursor,
    /// A wrong keystroke
    Mistake,
    /// Typed correctly within the fast tier
    Fast,
    /// Typed correctly within the medium tier
    Medium,
    /// Typed correctly after the slow threshold
    Slow,
    /// The `¶` shown for a newline under the cursor or typed wrong
    NewlineMarker,
    /// Background text, only painted when comments are shown
    Comment,
    /// The border row between the text and the status line
    Border,
}

/// A cell grid the engine can paint on
pub trait Display {
    /// Current size of the drawable area
    fn size(&self) -> Grid;

    /// Blank every cell
    fn clear(&mut self);

    /// Paint a single glyph. Positions outside [`Display::size`] are ignored.
    fn put(&mut self, row: u16, col: u16, glyph: char, attr: Attr);

    /// Paint a string starting at `(row, col)`, one glyph per cell
    fn text(&mut self, row: u16, col: u16, text: &str, attr: Attr) {
        let mut col = col;
        for glyph in text.chars() {
            self.put(row, col, glyph, attr);
            col = col.saturating_add(1);
        }
    }

    /// Paint `glyph` over the whole row
    fn fill_row(&mut self, row: u16, glyph: char, attr: Attr) {
        for col in 0..self.size().cols {
            self.put(row, col, glyph, attr);
        }
    }

    /// Push everything painted so far to the user
    fn flush(&mut self) -> io::Result<()>;
}

impl<D: Display + ?Sized> Display for &mut D {
    fn size(&self) -> Grid {
        (**self).size()
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn put(&mut self, row: u16, col: u16, glyph: char, attr: Attr) {
        (**self).put(row, col, glyph, attr);
    }

    fn text(&mut self, row: u16, col: u16, text: &str, attr: Attr) {
        (**self).text(row, col, text, attr);
    }

    fn fill_row(&mut self, row: u16, glyph: char, attr: Attr) {
        (**self).fill_row(row, glyph, attr);
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}
