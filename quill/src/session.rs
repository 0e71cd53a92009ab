//! # Session Module - The Per-Page Typing State Machine
//!
//! A [`Session`] plays one [`PageLayout`] against the keyboard. It keeps the cursor, the
//! pending-mistake streak and the keystroke counters, and it ends the page either
//! [`Completed`](PageEnd::Completed) or [`Paused`](PageEnd::Paused).
//!
//! ## Session Lifecycle
//!
//! ```text
//! NotStarted ──first key──▶ Active ──cursor reaches used, no mistakes──▶ Completed
//!      │                      │
//!      └────────Escape────────┴──────────────────────────────────────▶ Paused
//! ```
//!
//! ## Rules
//!
//! - Background text is never a prompt. Before each prompt the cursor skips forward over it,
//!   and a backspace that lands on it keeps moving back.
//! - A keystroke only counts as right when it matches and no earlier mistake is pending.
//!   Wrong keystrokes still advance the cursor and add to the streak of mistakes to fix.
//! - Backspace consumes one pending mistake, or erases a correct glyph when there are none. It
//!   never moves before the first typeable index of the page.
//! - With mistakes pending on the last glyph of the page, forward keys are locked out until
//!   the mistakes are fixed.
//!
//! [`Session::input`] is the pure transition and needs no terminal. [`Session::run`] wraps it
//! in the render, read, mutate loop over a [`Display`], a [`KeySource`] and a [`Clock`].
//!
//! ## Usage
//!
//! ```rust
//! use quill::{Buffer, ClassifyOptions, Configuration, Key, PageLayout, Phase, Session, classify};
//! use quill::{CommentMode, Grid};
//! use web_time::Duration;
//!
//! let buffer = Buffer::from("ok\n");
//! let flags = classify("notes.txt", &buffer, ClassifyOptions::default());
//! let layout = PageLayout::compute(&buffer, &flags, 0, Grid::new(24, 80), CommentMode::Hidden);
//! let mut session = Session::new(&buffer, &flags, &layout, &Configuration::default());
//!
//! for key in Key::typing("ok\n") {
//!     session.input(key, Duration::ZERO);
//! }
//! assert_eq!(session.phase(), Phase::Completed);
//! assert_eq!(session.score().right, 3);
//! ```

use std::io;

use tracing::{debug, trace};
use web_time::Duration;

use crate::{
    Attr, Buffer, Clock, Configuration, Display, Flags, Key, KeySource, PageLayout, Score,
    SpeedTier,
};

const BORDER_GLYPH: char = '─';
const NEWLINE_MARKER: char = '¶';
const LOCKOUT_TITLE: &str = "FIX ERRORS TO CONTINUE";

/// Where a page is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No key pressed yet, the clock has not started
    NotStarted,
    Active,
    Paused,
    Completed,
}

/// The effect of a single keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The glyph at `index` was typed correctly
    Matched { index: usize, tier: SpeedTier },
    /// The glyph at `index` was typed wrong, or while a mistake was pending
    Missed { index: usize },
    /// The cursor moved back from `from` to `to`
    Erased { from: usize, to: usize },
    /// Mistakes are pending on the last glyph of the page
    Locked,
    /// The key had no effect
    Ignored,
    /// The page was paused
    Paused,
}

/// How a page ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageEnd {
    Completed,
    Paused,
}

/// What the driver needs after a page: where to continue and how it went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOutcome {
    pub next_offset: usize,
    pub score: Score,
    pub end: PageEnd,
}

/// Typing state of a single page
#[derive(Debug, Clone)]
pub struct Session<'a> {
    buffer: &'a Buffer,
    flags: &'a Flags,
    layout: &'a PageLayout,
    config: Configuration,
    title: String,

    cursor: usize,
    streak: usize,
    right: usize,
    wrong: usize,
    phase: Phase,

    started_at: Option<Duration>,
    last_at: Duration,
    elapsed: Duration,
    locked_out: bool,
}

impl<'a> Session<'a> {
    /// Start a page at the first typeable index of `layout`
    ///
    /// A layout with nothing to type yields a session that is already
    /// [`Completed`](Phase::Completed).
    pub fn new(
        buffer: &'a Buffer,
        flags: &'a Flags,
        layout: &'a PageLayout,
        config: &Configuration,
    ) -> Self {
        let mut session = Self {
            buffer,
            flags,
            layout,
            config: *config,
            title: String::new(),
            cursor: layout.begin(),
            streak: 0,
            right: 0,
            wrong: 0,
            phase: Phase::NotStarted,
            started_at: None,
            last_at: Duration::ZERO,
            elapsed: Duration::ZERO,
            locked_out: false,
        };

        session.settle();
        session
    }

    /// Set the title shown in the border (builder pattern)
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the next glyph to type
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of mistakes waiting to be fixed
    pub const fn streak(&self) -> usize {
        self.streak
    }

    /// True while forward keys are rejected
    pub const fn is_locked_out(&self) -> bool {
        self.locked_out
    }

    pub const fn score(&self) -> Score {
        Score::new(self.right, self.wrong, self.elapsed)
    }

    /// The outcome of the page, once it has ended
    pub fn outcome(&self) -> Option<PageOutcome> {
        let (next_offset, end) = match self.phase {
            Phase::Completed => (self.layout.used(), PageEnd::Completed),
            Phase::Paused => (self.cursor, PageEnd::Paused),
            Phase::NotStarted | Phase::Active => return None,
        };

        Some(PageOutcome {
            next_offset,
            score: self.score(),
            end,
        })
    }

    /// Apply one keystroke received at `now`
    pub fn input(&mut self, key: Key, now: Duration) -> Step {
        if matches!(self.phase, Phase::Paused | Phase::Completed) {
            return Step::Ignored;
        }

        let step = match key {
            Key::Escape => {
                if let Some(started_at) = self.started_at {
                    self.elapsed = now.saturating_sub(started_at);
                }
                self.phase = Phase::Paused;
                debug!(next_offset = self.cursor, streak = self.streak, "page paused");
                return Step::Paused;
            }
            Key::Backspace => {
                self.tick(now);
                self.erase()
            }
            Key::Char(typed) => {
                self.tick(now);
                self.advance(typed, now)
            }
        };

        if self.streak == 0 {
            self.locked_out = false;
        }
        self.settle();
        step
    }

    /// Play the page to its end, painting on `display` and reading from `keys`
    pub fn run<D, K, C>(mut self, display: &mut D, keys: &mut K, clock: &C) -> io::Result<PageOutcome>
    where
        D: Display + ?Sized,
        K: KeySource + ?Sized,
        C: Clock + ?Sized,
    {
        self.paint_page(display);
        let mut lockout_painted = false;

        loop {
            if let Some(outcome) = self.outcome() {
                self.paint_status(display);
                display.flush()?;
                return Ok(outcome);
            }

            self.paint_cursor(display);
            self.paint_status(display);
            display.flush()?;

            let key = keys.next_key()?;
            let step = self.input(key, clock.now());
            trace!(?key, ?step, cursor = self.cursor, streak = self.streak, "keystroke");

            self.paint_step(display, step);
            if self.locked_out != lockout_painted {
                lockout_painted = self.locked_out;
                self.paint_border(display);
            }
        }
    }

    fn tick(&mut self, now: Duration) {
        let started_at = match self.started_at {
            Some(started_at) => started_at,
            None => {
                self.phase = Phase::Active;
                self.started_at = Some(now);
                self.last_at = now;
                now
            }
        };

        self.elapsed = now.saturating_sub(started_at);
    }

    fn is_locked(&self) -> bool {
        self.streak > 0 && self.cursor + 1 >= self.layout.used()
    }

    fn advance(&mut self, typed: char, now: Duration) -> Step {
        if self.is_locked() {
            self.locked_out = true;
            return Step::Locked;
        }

        let index = self.cursor;
        self.cursor += 1;

        if self.streak == 0 && self.buffer.get(index) == Some(typed) {
            self.right += 1;
            let tier = self.config.tiers.tier(now.saturating_sub(self.last_at));
            self.last_at = now;
            Step::Matched { index, tier }
        } else {
            self.wrong += 1;
            self.streak += 1;
            Step::Missed { index }
        }
    }

    fn erase(&mut self) -> Step {
        let begin = self.layout.begin();
        if self.cursor <= begin {
            return Step::Ignored;
        }

        let from = self.cursor;
        self.streak = self.streak.saturating_sub(1);
        self.cursor -= 1;
        while self.cursor > begin && self.flags.is_comment(self.cursor) {
            self.cursor -= 1;
        }

        Step::Erased {
            from,
            to: self.cursor,
        }
    }

    /// Skip background text ahead of the cursor and detect completion
    fn settle(&mut self) {
        let used = self.layout.used();
        while self.cursor < used && self.flags.is_comment(self.cursor) {
            self.cursor += 1;
        }

        if self.cursor >= used && self.streak == 0 {
            self.cursor = used;
            self.phase = Phase::Completed;
            debug!(
                next_offset = used,
                right = self.right,
                wrong = self.wrong,
                "page completed"
            );
        }
    }

    fn is_newline(&self, index: usize) -> bool {
        self.flags.is_newline(index)
    }

    /// The glyph drawn for an index at rest
    fn glyph(&self, index: usize) -> char {
        match self.buffer.get(index) {
            Some('\n') | None => ' ',
            Some(glyph) => glyph,
        }
    }

    fn paint<D: Display + ?Sized>(&self, display: &mut D, index: usize, glyph: char, attr: Attr) {
        if let Some(cell) = self.layout.cell(index)
            && cell.visible
        {
            display.put(cell.row, cell.col, glyph, attr);
        }
    }

    fn paint_page<D: Display + ?Sized>(&self, display: &mut D) {
        display.clear();
        for (index, cell) in self.layout.cells() {
            if !cell.visible {
                continue;
            }
            let attr = if self.flags.is_comment(index) {
                Attr::Comment
            } else {
                Attr::Normal
            };
            display.put(cell.row, cell.col, self.glyph(index), attr);
        }
        self.paint_border(display);
    }

    fn paint_border<D: Display + ?Sized>(&self, display: &mut D) {
        let grid = self.layout.grid();
        let row = grid.border_row();
        display.fill_row(row, BORDER_GLYPH, Attr::Border);

        let (title, attr) = if self.locked_out {
            (LOCKOUT_TITLE, Attr::Mistake)
        } else if self.title.is_empty() {
            return;
        } else {
            (self.title.as_str(), Attr::Border)
        };

        let title = format!(" {title} ");
        let width = u16::try_from(title.chars().count()).unwrap_or(u16::MAX);
        display.text(row, grid.cols.saturating_sub(width) / 2, &title, attr);
    }

    fn paint_cursor<D: Display + ?Sized>(&self, display: &mut D) {
        if self.streak > 0 || self.cursor >= self.layout.used() {
            return;
        }

        if self.is_newline(self.cursor) {
            self.paint(display, self.cursor, NEWLINE_MARKER, Attr::NewlineMarker);
        } else {
            self.paint(display, self.cursor, self.glyph(self.cursor), Attr::Cursor);
        }
    }

    fn paint_status<D: Display + ?Sized>(&self, display: &mut D) {
        let row = self.layout.grid().status_row();
        display.fill_row(row, ' ', Attr::Normal);
        display.text(row, 1, &self.score().status_line().to_string(), Attr::Normal);
    }

    fn paint_step<D: Display + ?Sized>(&self, display: &mut D, step: Step) {
        match step {
            Step::Matched { index, tier } => {
                self.paint(display, index, self.glyph(index), tier.attr());
            }
            Step::Missed { index } => {
                let glyph = if self.is_newline(index) {
                    NEWLINE_MARKER
                } else {
                    self.glyph(index)
                };
                self.paint(display, index, glyph, Attr::Mistake);
            }
            Step::Erased { from, to } => {
                self.paint(display, from, self.glyph(from), Attr::Normal);
                self.paint(display, to, self.glyph(to), Attr::Normal);
            }
            Step::Locked | Step::Ignored | Step::Paused => {}
        }
    }
}
