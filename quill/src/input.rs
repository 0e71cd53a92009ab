//! Keyboard input seam.

use std::io;

/// A single keystroke as the engine sees it. Enter arrives as `Char('\n')`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Backspace,
    /// Pause the current page
    Escape,
}

/// Blocking source of keystrokes
pub trait KeySource {
    /// Wait for the next keystroke
    fn next_key(&mut self) -> io::Result<Key>;
}

impl<K: KeySource + ?Sized> KeySource for &mut K {
    fn next_key(&mut self) -> io::Result<Key> {
        (**self).next_key()
    }
}

impl Key {
    /// Keys for typing `text` exactly, newlines included
    pub fn typing(text: &str) -> impl Iterator<Item = Self> + '_ {
        text.chars().map(Self::Char)
    }
}
