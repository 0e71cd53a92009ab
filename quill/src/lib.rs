//! # quill - typing along with source files
//!
//! `quill` is the engine behind a terminal typing trainer that replays a source file and checks
//! every keystroke against it. It owns the parts with real state:
//!
//! - [`buffer`]: normalising raw bytes into typeable text
//! - [`syntax`] and [`classifier`]: marking comments and filler whitespace as background text
//! - [`layout`]: fitting a slice of the buffer onto one terminal page
//! - [`session`]: the per-page typing state machine
//! - [`metrics`]: words-per-minute, accuracy and elapsed time
//!
//! Terminal drawing, keyboard input and time are reached through the [`display::Display`],
//! [`input::KeySource`] and [`clock::Clock`] traits, so the engine can be driven headlessly.
//!
//! ```rust
//! use quill::{Buffer, ClassifyOptions, Grid, PageLayout, CommentMode, classify};
//!
//! let buffer = Buffer::from_bytes(b"int x;\n// hi\ny;\n");
//! let flags = classify("main.c", &buffer, ClassifyOptions::default());
//! assert!(flags.is_comment(7));
//!
//! let layout = PageLayout::compute(&buffer, &flags, 0, Grid::new(24, 80), CommentMode::Hidden);
//! assert_eq!(layout.used(), buffer.len());
//! ```

pub mod buffer;
pub mod classifier;
pub mod clock;
pub mod config;
pub mod display;
pub mod input;
pub mod layout;
pub mod metrics;
pub mod session;
pub mod syntax;

pub use buffer::Buffer;
pub use classifier::{CharFlags, ClassifyOptions, Flags, classify};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{Configuration, SpeedTier, SpeedTiers};
pub use display::{Attr, Display};
pub use input::{Key, KeySource};
pub use layout::{Cell, CommentMode, Grid, PageLayout};
pub use metrics::{Score, StatusLine};
pub use session::{PageEnd, PageOutcome, Phase, Session, Step};
pub use syntax::LanguageSyntax;

/// Characters per "word" when calculating typing speed
const AVERAGE_WORD_LENGTH: f64 = 5.0;
