//! # Layout Module - Fitting a Page onto the Terminal
//!
//! [`PageLayout::compute`] walks the buffer from a starting offset and gives every index a
//! [`Cell`] until the text rows are full. The bottom three rows of the [`Grid`] are reserved:
//!
//! ```text
//! row 0         ┐
//! ...           ├ text, one margin column on the left
//! row rows-4    ┘
//! row rows-3      blank
//! row rows-2      border with the file name
//! row rows-1      WPM / accuracy / time
//! ```
//!
//! Newlines take one cell for their marker and then break the line. A glyph that would land on
//! or beyond the last column wraps to column 1 of the next row first.
//!
//! With [`CommentMode::Hidden`] background text takes no cell at all. Such an index still gets a
//! recorded cell (that of the previous rendered glyph) so backspace can restore the cursor
//! from stored positions alone. A hidden newline breaks the line only when the line already
//! holds text, so trailing comments keep code lines apart while blank lines collapse.

use tracing::debug;

use crate::{Buffer, Flags};

/// Terminal size in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Grid {
    pub rows: u16,
    pub cols: u16,
}

impl Grid {
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }

    /// Number of rows available for text. The row above the border stays empty.
    pub const fn text_rows(&self) -> u16 {
        self.rows.saturating_sub(3)
    }

    /// The row holding the border and file name
    pub const fn border_row(&self) -> u16 {
        self.rows.saturating_sub(2)
    }

    /// The row holding live statistics
    pub const fn status_row(&self) -> u16 {
        self.rows.saturating_sub(1)
    }

    /// Smallest grid that is guaranteed to fit at least one glyph per page
    pub const fn is_usable(&self) -> bool {
        self.rows >= 4 && self.cols >= 2
    }
}

/// How background text is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommentMode {
    /// Background text takes no cells
    #[default]
    Hidden,
    /// Background text is drawn in place, the cursor still skips it
    Shown,
}

/// Screen position of a buffer index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: u16,
    pub col: u16,
    /// False when the index occupies no cell of its own
    pub visible: bool,
}

/// One page worth of buffer positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    screen_start: usize,
    begin: usize,
    used: usize,
    grid: Grid,
    cells: Vec<Cell>,
}

impl PageLayout {
    /// Lay out the buffer starting at `start` onto `grid`.
    ///
    /// A page never starts inside background text: [`PageLayout::begin`] is the first typeable
    /// index at or after `start`. Laying out stops when a visible glyph does not fit or the
    /// buffer ends. Hidden background text never stops a page.
    pub fn compute(
        buffer: &Buffer,
        flags: &Flags,
        start: usize,
        grid: Grid,
        mode: CommentMode,
    ) -> Self {
        let bytes = buffer.as_bytes();
        let len = bytes.len();
        let screen_start = start.min(len);
        let text_rows = grid.text_rows();

        let mut cells = Vec::new();
        let (mut row, mut col) = (0u16, 1u16);
        let mut previous: Option<(u16, u16)> = None;
        let mut index = screen_start;

        while index < len {
            let newline = bytes[index] == b'\n';
            let comment = flags.is_comment(index);

            if comment && mode == CommentMode::Hidden {
                let (cell_row, cell_col) = previous.unwrap_or((row, col));
                cells.push(Cell {
                    row: cell_row,
                    col: cell_col,
                    visible: false,
                });
                // A hidden newline still ends a line that has text on it
                if newline && col > 1 {
                    row = row.saturating_add(1);
                    col = 1;
                }
                index += 1;
                continue;
            }

            if comment && newline {
                // Folded newline in shown mode: break the line without a marker
                cells.push(Cell {
                    row,
                    col,
                    visible: false,
                });
                row = row.saturating_add(1);
                col = 1;
                index += 1;
                continue;
            }

            if col >= grid.cols {
                row = row.saturating_add(1);
                col = 1;
            }
            if row >= text_rows {
                break;
            }

            cells.push(Cell {
                row,
                col,
                visible: true,
            });
            previous = Some((row, col));

            if newline {
                row = row.saturating_add(1);
                col = 1;
            } else {
                col = col.saturating_add(1);
            }
            index += 1;
        }

        let used = index;
        let begin = (screen_start..used)
            .find(|&index| !flags.is_comment(index))
            .unwrap_or(used);

        debug!(screen_start, begin, used, rows = grid.rows, cols = grid.cols, "page laid out");

        Self {
            screen_start,
            begin,
            used,
            grid,
            cells,
        }
    }

    /// The offset the page was requested at
    pub const fn screen_start(&self) -> usize {
        self.screen_start
    }

    /// First typeable index of the page, and the floor for backspace
    pub const fn begin(&self) -> usize {
        self.begin
    }

    /// First index past the page
    pub const fn used(&self) -> usize {
        self.used
    }

    pub const fn grid(&self) -> Grid {
        self.grid
    }

    /// True when the page has nothing left to type
    pub const fn is_trivially_complete(&self) -> bool {
        self.begin == self.used
    }

    /// Cell of a buffer index on this page
    pub fn cell(&self, index: usize) -> Option<Cell> {
        index
            .checked_sub(self.screen_start)
            .and_then(|offset| self.cells.get(offset))
            .copied()
    }

    /// Iterate `(index, cell)` pairs of the page
    pub fn cells(&self) -> impl Iterator<Item = (usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(offset, &cell)| (self.screen_start + offset, cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClassifyOptions, classify};

    fn layout(name: &str, text: &str, start: usize, grid: Grid, mode: CommentMode) -> PageLayout {
        let buffer = Buffer::from(text);
        let flags = classify(name, &buffer, ClassifyOptions::default());
        PageLayout::compute(&buffer, &flags, start, grid, mode)
    }

    #[test]
    fn test_newlines_break_rows() {
        let page = layout("t.txt", "ab\ncd", 0, Grid::new(10, 20), CommentMode::Hidden);

        assert_eq!(page.used(), 5);
        assert_eq!(page.begin(), 0);
        let positions: Vec<(u16, u16)> = page.cells().map(|(_, c)| (c.row, c.col)).collect();
        assert_eq!(positions, vec![(0, 1), (0, 2), (0, 3), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_wrap_at_last_column() {
        // cols = 4 leaves columns 1..=3 for glyphs
        let page = layout("t.txt", "abcdef", 0, Grid::new(10, 4), CommentMode::Hidden);

        assert_eq!(page.cell(2), Some(Cell { row: 0, col: 3, visible: true }));
        assert_eq!(page.cell(3), Some(Cell { row: 1, col: 1, visible: true }));
        assert_eq!(page.cell(5), Some(Cell { row: 1, col: 3, visible: true }));
    }

    #[test]
    fn test_page_stops_when_rows_are_full() {
        // rows = 4 leaves a single text row
        let page = layout("t.txt", "a\nb\nc\n", 0, Grid::new(4, 10), CommentMode::Hidden);

        assert_eq!(page.used(), 2);
        assert_eq!(page.cell(2), None);
    }

    #[test]
    fn test_gap_row_above_border() {
        let grid = Grid::new(6, 10);
        let page = layout("t.txt", "a\nb\nc\nd\ne\nf\n", 0, grid, CommentMode::Hidden);

        assert_eq!(grid.text_rows(), 3);
        assert_eq!(page.used(), 6);
        let last_row = page.cells().map(|(_, cell)| cell.row).max();
        assert_eq!(last_row, Some(2));
        // Row 3 stays blank above the border
        assert_eq!(grid.border_row(), 4);
    }

    #[test]
    fn test_hidden_comments_take_previous_cell() {
        let page = layout("main.c", "int x;\n// hi\ny;\n", 0, Grid::new(24, 80), CommentMode::Hidden);

        assert_eq!(page.used(), 16);
        let newline = page.cell(6).unwrap();
        assert_eq!((newline.row, newline.col), (0, 7));
        for index in 7..13 {
            let cell = page.cell(index).unwrap();
            assert!(!cell.visible);
            assert_eq!((cell.row, cell.col), (0, 7));
        }
        assert_eq!(page.cell(13), Some(Cell { row: 1, col: 1, visible: true }));
    }

    #[test]
    fn test_hidden_trailing_comment_keeps_lines_apart() {
        let page = layout("calc.py", "a = 1 # one\nb = 2\n", 0, Grid::new(10, 40), CommentMode::Hidden);

        // The comment swallows the newline of its line
        assert!(!page.cell(11).unwrap().visible);
        assert_eq!(page.cell(12), Some(Cell { row: 1, col: 1, visible: true }));
    }

    #[test]
    fn test_shown_comments_take_cells() {
        let page = layout("main.c", "int x;\n// hi\ny;\n", 0, Grid::new(24, 80), CommentMode::Shown);

        assert_eq!(page.cell(7), Some(Cell { row: 1, col: 1, visible: true }));
        // The newline ending the comment breaks the line without a marker
        assert_eq!(page.cell(12), Some(Cell { row: 1, col: 6, visible: false }));
        assert_eq!(page.cell(13), Some(Cell { row: 2, col: 1, visible: true }));
    }

    #[test]
    fn test_begin_skips_leading_comment() {
        let page = layout("main.c", "// a\nx", 0, Grid::new(10, 10), CommentMode::Hidden);

        assert_eq!(page.screen_start(), 0);
        assert_eq!(page.begin(), 5);
        assert_eq!(page.used(), 6);
        // Nothing rendered before the comment: it records the pen position
        assert_eq!(page.cell(0), Some(Cell { row: 0, col: 1, visible: false }));
    }

    #[test]
    fn test_trailing_comment_is_trivially_complete() {
        let text = "x\n// end\n";
        let page = layout("main.c", text, 2, Grid::new(10, 10), CommentMode::Hidden);

        assert_eq!(page.used(), text.len());
        assert_eq!(page.begin(), page.used());
        assert!(page.is_trivially_complete());
    }

    #[test]
    fn test_pages_cover_the_buffer() {
        let text = "fn main() {\n    // greet\n    println!(\"hello, world\");\n}\n".repeat(8);
        let buffer = Buffer::from(text.as_str());
        let flags = classify("main.rs", &buffer, ClassifyOptions::default());

        for grid in [Grid::new(4, 2), Grid::new(5, 7), Grid::new(24, 80)] {
            for mode in [CommentMode::Hidden, CommentMode::Shown] {
                let mut start = 0;
                let mut pages = 0;
                while start < buffer.len() {
                    let page = PageLayout::compute(&buffer, &flags, start, grid, mode);
                    assert!(page.used() > start);
                    start = page.used();
                    pages += 1;
                    assert!(pages <= buffer.len());
                }
                assert_eq!(start, buffer.len());
            }
        }
    }
}
