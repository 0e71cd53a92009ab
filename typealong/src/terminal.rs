//! The real terminal behind the engine's drawing and input seams.

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use quill::{Attr, Display, Grid, Key, KeySource};
use ratatui::{DefaultTerminal, Frame, buffer::Buffer, layout::Rect};
use tracing::{debug, trace};

use crate::config::theme::Theme;

/// Exclusive handle on the terminal while typing
///
/// Engine drawing goes to a persistent cell grid that is copied into each frame on
/// [`Display::flush`]. Other screens draw whole frames with [`Terminal::draw`].
pub struct Terminal {
    inner: DefaultTerminal,
    canvas: Buffer,
    theme: Theme,
    max_columns: u16,
    restored: bool,
}

impl Terminal {
    /// Switch the terminal to raw mode and the alternate screen
    pub fn init(theme: Theme, max_columns: u16) -> io::Result<Self> {
        let inner = ratatui::try_init()?;
        let mut terminal = Self {
            inner,
            canvas: Buffer::empty(Rect::ZERO),
            theme,
            max_columns: max_columns.max(2),
            restored: false,
        };
        terminal.resize()?;
        debug!(size = ?terminal.canvas.area, "terminal initialised");
        Ok(terminal)
    }

    pub const fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Draw a complete frame, bypassing the cell grid
    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> io::Result<()> {
        self.inner.draw(render)?;
        Ok(())
    }

    /// Give the terminal back to the shell
    pub fn restore(mut self) -> io::Result<()> {
        self.restored = true;
        ratatui::try_restore()
    }

    fn resize(&mut self) -> io::Result<()> {
        let size = self.inner.size()?;
        let area = Rect::new(0, 0, size.width.min(self.max_columns), size.height);
        if area != self.canvas.area {
            self.canvas.resize(area);
        }
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if !self.restored {
            ratatui::restore();
        }
    }
}

impl Display for Terminal {
    fn size(&self) -> Grid {
        Grid::new(self.canvas.area.height, self.canvas.area.width)
    }

    fn clear(&mut self) {
        if let Err(error) = self.resize() {
            debug!(%error, "failed to query terminal size");
        }
        self.canvas.reset();
    }

    fn put(&mut self, row: u16, col: u16, glyph: char, attr: Attr) {
        let style = self.theme.style(attr);
        if let Some(cell) = self.canvas.cell_mut((col, row)) {
            cell.set_char(glyph).set_style(style);
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let canvas = &self.canvas;
        self.inner.draw(|frame| {
            let target = frame.buffer_mut();
            for y in 0..canvas.area.height {
                for x in 0..canvas.area.width {
                    if let Some(source) = canvas.cell((x, y))
                        && let Some(cell) = target.cell_mut((x, y))
                    {
                        *cell = source.clone();
                    }
                }
            }
        })?;
        Ok(())
    }
}

/// Keystrokes from the controlling terminal
#[derive(Debug, Default)]
pub struct Keyboard;

impl KeySource for Keyboard {
    fn next_key(&mut self) -> io::Result<Key> {
        loop {
            if let Event::Key(event) = event::read()?
                && let Some(key) = map_key(event)
            {
                trace!(?key, "key");
                return Ok(key);
            }
        }
    }
}

/// Translate a terminal key event into an engine key
pub fn map_key(event: KeyEvent) -> Option<Key> {
    if event.kind != KeyEventKind::Press {
        return None;
    }

    match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Some(Key::Escape),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Enter => Some(Key::Char('\n')),
        KeyCode::Tab => Some(Key::Char(' ')),
        KeyCode::Char(glyph) if glyph.is_ascii() && !glyph.is_ascii_control() => {
            Some(Key::Char(glyph))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_key_mapping() {
        let none = KeyModifiers::NONE;

        assert_eq!(map_key(press(KeyCode::Char('a'), none)), Some(Key::Char('a')));
        assert_eq!(
            map_key(press(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(Key::Char('A'))
        );
        assert_eq!(map_key(press(KeyCode::Enter, none)), Some(Key::Char('\n')));
        assert_eq!(map_key(press(KeyCode::Tab, none)), Some(Key::Char(' ')));
        assert_eq!(map_key(press(KeyCode::Backspace, none)), Some(Key::Backspace));
        assert_eq!(map_key(press(KeyCode::Esc, none)), Some(Key::Escape));
        assert_eq!(
            map_key(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Key::Escape)
        );
        assert_eq!(map_key(press(KeyCode::Left, none)), None);
        assert_eq!(map_key(press(KeyCode::Char('é'), none)), None);
    }

    #[test]
    fn test_only_presses_count() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key(release), None);
    }
}
