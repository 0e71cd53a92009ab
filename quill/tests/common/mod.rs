use std::collections::VecDeque;
use std::io;

use quill::{Attr, Display, Grid, Key, KeySource};

/// In-memory display that keeps the last glyph painted on every cell
pub struct RecordingDisplay {
    grid: Grid,
    cells: Vec<(char, Attr)>,
    pub flushes: usize,
}

impl RecordingDisplay {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            cells: vec![(' ', Attr::Normal); usize::from(grid.rows) * usize::from(grid.cols)],
            flushes: 0,
        }
    }

    pub fn at(&self, row: u16, col: u16) -> (char, Attr) {
        self.cells[usize::from(row) * usize::from(self.grid.cols) + usize::from(col)]
    }

    pub fn row_text(&self, row: u16) -> String {
        (0..self.grid.cols)
            .map(|col| self.at(row, col).0)
            .collect::<String>()
            .trim()
            .to_string()
    }
}

impl Display for RecordingDisplay {
    fn size(&self) -> Grid {
        self.grid
    }

    fn clear(&mut self) {
        self.cells.fill((' ', Attr::Normal));
    }

    fn put(&mut self, row: u16, col: u16, glyph: char, attr: Attr) {
        if row < self.grid.rows && col < self.grid.cols {
            let index = usize::from(row) * usize::from(self.grid.cols) + usize::from(col);
            self.cells[index] = (glyph, attr);
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

/// Keys fed from a script, failing once it runs dry
pub struct ScriptedKeys(VecDeque<Key>);

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self(keys.into_iter().collect())
    }

    pub fn typing(text: &str) -> Self {
        Self::new(Key::typing(text))
    }

    pub fn remaining(&self) -> usize {
        self.0.len()
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> io::Result<Key> {
        self.0
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}
