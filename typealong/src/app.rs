use quill::{
    ClassifyOptions, Clock, Configuration, Display, Flags, MonotonicClock, PageEnd, PageLayout,
    Score, Session, classify,
};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::resume::ResumeStore;
use crate::results::{Choice, Results};
use crate::source::{Input, Source};
use crate::terminal::{Keyboard, Terminal};

/// Behaviour picked on the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Fold comments and filler whitespace
    pub fold_comments: bool,
    /// Ignore saved offsets
    pub reset: bool,
}

/// The app itself
pub struct App {
    config: Config,
    engine: Configuration,
    options: Options,
    resume: Option<ResumeStore>,
}

impl App {
    /// Creates a new `App`
    pub fn new(config: Config, engine: Configuration, options: Options) -> Self {
        let resume = config.resume_file().map(ResumeStore::new);
        if let Some(store) = &resume {
            debug!(path = %store.path().display(), "resume store");
        }
        Self {
            config,
            engine,
            options,
            resume,
        }
    }

    /// Runs the app over every input, returning the reasons inputs were skipped
    pub fn run(&self, inputs: &[Input]) -> Result<Vec<String>, AppError> {
        let mut skipped = Vec::new();
        let sources: Vec<Source> = inputs
            .iter()
            .filter_map(|input| match input.load() {
                Ok(source) => Some(source),
                Err(error) => {
                    warn!(?input, %error, "skipping input");
                    skipped.push(error.to_string());
                    None
                }
            })
            .collect();

        if sources.is_empty() {
            return Ok(skipped);
        }

        let typing = &self.config.settings.typing;
        let mut terminal = Terminal::init(self.config.settings.theme.clone(), typing.max_columns)?;
        let result = self.type_all(&mut terminal, &sources);
        terminal.restore()?;

        finish(result, skipped)
    }

    fn type_all(&self, terminal: &mut Terminal, sources: &[Source]) -> Result<(), AppError> {
        let clock = MonotonicClock::new();
        let mut keyboard = Keyboard;

        for (index, source) in sources.iter().enumerate() {
            let last_file = index + 1 == sources.len();
            if self.type_source(terminal, &mut keyboard, &clock, source, last_file)?
                == Choice::Exit
            {
                break;
            }
        }

        Ok(())
    }

    /// Type one source page by page, with a results screen after each page
    fn type_source(
        &self,
        terminal: &mut Terminal,
        keyboard: &mut Keyboard,
        clock: &impl Clock,
        source: &Source,
        last_file: bool,
    ) -> Result<Choice, AppError> {
        let buffer = &source.buffer;
        let flags = classify(
            &source.name,
            buffer,
            ClassifyOptions {
                fold_comments: self.options.fold_comments,
            },
        );

        let mut offset = self.resume_offset(source);
        let mut total = Score::default();
        info!(name = %source.name, offset, len = buffer.len(), "typing source");

        while has_typeable(&flags, offset) {
            terminal.clear();
            let grid = terminal.size();
            if !grid.is_usable() {
                return Err(AppError::TooSmall {
                    rows: grid.rows,
                    cols: grid.cols,
                });
            }

            let layout = PageLayout::compute(buffer, &flags, offset, grid, self.engine.comments);
            if layout.is_trivially_complete() {
                offset = layout.used();
                continue;
            }

            let outcome = Session::new(buffer, &flags, &layout, &self.engine)
                .with_title(source.name.as_str())
                .run(terminal, keyboard, clock)?;

            total += outcome.score;
            offset = outcome.next_offset;
            info!(
                name = %source.name,
                offset,
                paused = outcome.end == PageEnd::Paused,
                right = outcome.score.right,
                wrong = outcome.score.wrong,
                "page finished"
            );

            let more = has_typeable(&flags, offset) || !last_file;
            let choice = Results::new(outcome.score, total, more).run(terminal, keyboard, || {
                self.save(source, offset)
            })?;

            if choice == Choice::Exit {
                return Ok(Choice::Exit);
            }
        }

        Ok(Choice::Continue)
    }

    /// Where to start typing a source
    fn resume_offset(&self, source: &Source) -> usize {
        if self.options.reset {
            return 0;
        }

        let (Some(store), Some(path)) = (&self.resume, &source.path) else {
            return 0;
        };

        match store.lookup(path) {
            Ok(Some(offset)) if offset < source.buffer.len() => offset,
            Ok(_) => 0,
            Err(error) => {
                warn!(%error, "failed to look up resume offset");
                0
            }
        }
    }

    /// Save the offset of a source, reporting whether it worked
    fn save(&self, source: &Source, offset: usize) -> bool {
        let (Some(store), Some(path)) = (&self.resume, &source.path) else {
            return false;
        };

        match store.save(path, offset) {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "failed to save resume offset");
                false
            }
        }
    }
}

/// A terminal too small to type on ends the run like a normal exit, reported with the skipped
/// inputs
fn finish(result: Result<(), AppError>, mut skipped: Vec<String>) -> Result<Vec<String>, AppError> {
    match result {
        Ok(()) => Ok(skipped),
        Err(error @ AppError::TooSmall { .. }) => {
            warn!(%error, "stopped typing");
            skipped.push(error.to_string());
            Ok(skipped)
        }
        Err(error) => Err(error),
    }
}

/// True if anything typeable is left at or after `offset`
fn has_typeable(flags: &Flags, offset: usize) -> bool {
    (offset..flags.len()).any(|index| !flags.is_comment(index))
}
