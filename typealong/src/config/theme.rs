use quill::Attr;
use ratatui::style::{Color, Style};
use serde::{Deserialize, Serialize};

/// Foreground and background of one drawing attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColorPair {
    pub fg: Color,
    pub bg: Color,
}

impl ColorPair {
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self { fg, bg }
    }

    pub const fn style(self) -> Style {
        Style::new().fg(self.fg).bg(self.bg)
    }
}

/// General theme
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Theme {
    /// Text still to be typed
    pub text: ColorPair,
    pub cursor: ColorPair,
    pub mistake: ColorPair,
    pub fast: Color,
    pub medium: Color,
    pub slow: Color,
    pub newline_marker: ColorPair,
    pub comment: Color,
    pub border: ColorPair,
    /// The box around page results
    pub results: ColorPair,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: ColorPair::new(Color::White, Color::Reset),
            cursor: ColorPair::new(Color::Black, Color::Magenta),
            mistake: ColorPair::new(Color::Black, Color::Red),
            fast: Color::Cyan,
            medium: Color::Green,
            slow: Color::Yellow,
            newline_marker: ColorPair::new(Color::Black, Color::White),
            comment: Color::Blue,
            border: ColorPair::new(Color::Black, Color::Magenta),
            results: ColorPair::new(Color::Black, Color::Cyan),
        }
    }
}

impl Theme {
    /// The style a drawing attribute is painted with
    pub fn style(&self, attr: Attr) -> Style {
        let on_text = |fg: Color| Style::new().fg(fg).bg(self.text.bg);

        match attr {
            Attr::Normal => self.text.style(),
            Attr::Cursor => self.cursor.style(),
            Attr::Mistake => self.mistake.style(),
            Attr::Fast => on_text(self.fast),
            Attr::Medium => on_text(self.medium),
            Attr::Slow => on_text(self.slow),
            Attr::NewlineMarker => self.newline_marker.style(),
            Attr::Comment => on_text(self.comment),
            Attr::Border => self.border.style(),
        }
    }
}
