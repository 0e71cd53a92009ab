//! The screen shown between pages.

use std::io;

use quill::{Key, KeySource, Score};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint},
    style::Style,
    text::Line,
    widgets::{Clear, Padding, Paragraph},
};

use crate::terminal::Terminal;
use crate::utils::{ROUNDED_BLOCK, center};

const CONTINUE_LABEL: &str = "[ENTER] Continue";
const EXIT_LABEL: &str = "[ESC] Exit";
const LAST_PAGE_LABEL: &str = "Press [ENTER] to Exit";

/// What the user picked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveState {
    Unsaved,
    Saved,
    Failed,
}

impl SaveState {
    const fn label(self) -> &'static str {
        match self {
            Self::Unsaved => "[s] Save",
            Self::Saved => "Saved!!!",
            Self::Failed => "Failed!!",
        }
    }
}

/// Requests the screen cannot fulfil on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Choose(Choice),
    Save,
}

/// Results of one page, plus the running totals of its file
#[derive(Debug, Clone)]
pub struct Results {
    page: Score,
    file: Score,
    more: bool,
    save: SaveState,
}

impl Results {
    /// `more` is false on the last page of the last file
    pub const fn new(page: Score, file: Score, more: bool) -> Self {
        Self {
            page,
            file,
            more,
            save: SaveState::Unsaved,
        }
    }

    /// Show the screen until the user picks a choice. `save` stores the offset and reports
    /// whether it worked.
    pub fn run<K: KeySource + ?Sized>(
        &mut self,
        terminal: &mut Terminal,
        keys: &mut K,
        mut save: impl FnMut() -> bool,
    ) -> io::Result<Choice> {
        let style = terminal.theme().results.style();

        loop {
            terminal.draw(|frame| self.render(frame, style))?;

            match self.handle_key(keys.next_key()?) {
                Some(Action::Choose(choice)) => return Ok(choice),
                Some(Action::Save) => self.saved(save()),
                None => {}
            }
        }
    }

    fn handle_key(&self, key: Key) -> Option<Action> {
        match key {
            Key::Char('\n') => Some(Action::Choose(if self.more {
                Choice::Continue
            } else {
                Choice::Exit
            })),
            Key::Escape => Some(Action::Choose(Choice::Exit)),
            Key::Char('s') if self.save != SaveState::Saved => Some(Action::Save),
            _ => None,
        }
    }

    fn saved(&mut self, ok: bool) {
        self.save = if ok {
            SaveState::Saved
        } else {
            SaveState::Failed
        };
    }

    /// The bottom line of the box
    pub fn options(&self) -> String {
        if self.more {
            format!(
                "{CONTINUE_LABEL}   {}   {EXIT_LABEL}",
                self.save.label()
            )
        } else {
            LAST_PAGE_LABEL.to_string()
        }
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        vec![
            Line::raw(format!("Words Per Minute:  {:6.2}", self.page.wpm())),
            Line::raw(format!("Accuracy        : {:6.2}%", self.page.accuracy())),
            Line::raw(format!(
                "Total Keystrokes:  {:6}",
                self.page.total_keystrokes()
            )),
            Line::raw(""),
            Line::raw(format!(
                "File so far: {:.2} WPM, {:.2}% in {}",
                self.file.wpm(),
                self.file.accuracy(),
                self.file.clock()
            )),
            Line::raw(""),
            Line::raw(self.options()).alignment(Alignment::Center),
        ]
    }

    fn render(&self, frame: &mut Frame, style: Style) {
        let area = center(frame.area(), Constraint::Length(60), Constraint::Length(11));
        let text = Paragraph::new(self.lines()).style(style).block(
            ROUNDED_BLOCK
                .title_top(Line::raw(" RESULTS ").centered())
                .padding(Padding::new(6, 6, 1, 0))
                .style(style),
        );

        frame.render_widget(Clear, area);
        frame.render_widget(text, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn results(more: bool) -> Results {
        Results::new(
            Score::new(50, 0, Duration::from_secs(60)),
            Score::new(80, 20, Duration::from_secs(120)),
            more,
        )
    }

    #[test]
    fn test_options_line() {
        let mut screen = results(true);
        assert_eq!(screen.options(), "[ENTER] Continue   [s] Save   [ESC] Exit");

        screen.saved(true);
        assert_eq!(screen.options(), "[ENTER] Continue   Saved!!!   [ESC] Exit");

        let mut screen = results(true);
        screen.saved(false);
        assert_eq!(screen.options(), "[ENTER] Continue   Failed!!   [ESC] Exit");

        assert_eq!(results(false).options(), "Press [ENTER] to Exit");
    }

    #[test]
    fn test_key_handling() {
        let screen = results(true);
        assert_eq!(screen.handle_key(Key::Char('\n')), Some(Action::Choose(Choice::Continue)));
        assert_eq!(screen.handle_key(Key::Escape), Some(Action::Choose(Choice::Exit)));
        assert_eq!(screen.handle_key(Key::Char('s')), Some(Action::Save));
        assert_eq!(screen.handle_key(Key::Char('x')), None);

        // Enter on the last page ends the program
        assert_eq!(results(false).handle_key(Key::Char('\n')), Some(Action::Choose(Choice::Exit)));
    }

    #[test]
    fn test_save_until_it_works() {
        let mut screen = results(true);
        screen.saved(false);
        assert_eq!(screen.handle_key(Key::Char('s')), Some(Action::Save));

        screen.saved(true);
        assert_eq!(screen.handle_key(Key::Char('s')), None);
        assert_eq!(screen.save, SaveState::Saved);
    }

    #[test]
    fn test_lines() {
        let lines: Vec<String> = results(true).lines().iter().map(ToString::to_string).collect();

        assert_eq!(lines[0], "Words Per Minute:   10.00");
        assert_eq!(lines[1], "Accuracy        : 100.00%");
        assert_eq!(lines[2], "Total Keystrokes:      50");
        assert_eq!(lines[4], "File so far: 8.00 WPM, 80.00% in 2:00");
    }
}
