//! # Metrics Module - Speed and Accuracy
//!
//! Pure derivations over a [`Score`]:
//!
//! - **WPM**: `(right / 5) / minutes`, zero before any time has passed
//! - **Accuracy**: `100 * right / (right + wrong)`, a perfect 100 before any keystroke
//! - **Clock**: elapsed time as `m:ss`
//!
//! ```rust
//! use quill::Score;
//! use web_time::Duration;
//!
//! let score = Score::new(50, 0, Duration::from_secs(60));
//! assert_eq!(score.status_line().to_string(), "WPM: 10.00   Accuracy: 100.00%   Time: 1:00");
//! ```

use std::fmt;
use std::ops::{Add, AddAssign};

use web_time::Duration;

use crate::AVERAGE_WORD_LENGTH;

/// Keystroke counters and typing time of a page, or of several pages added together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub right: usize,
    pub wrong: usize,
    pub elapsed: Duration,
}

impl Score {
    pub const fn new(right: usize, wrong: usize, elapsed: Duration) -> Self {
        Self {
            right,
            wrong,
            elapsed,
        }
    }

    pub const fn total_keystrokes(&self) -> usize {
        self.right + self.wrong
    }

    /// Words per minute over correct keystrokes
    pub fn wpm(&self) -> f64 {
        let minutes = self.elapsed.as_secs_f64() / 60.0;
        if minutes <= 0.0 {
            return 0.0;
        }

        (self.right as f64 / AVERAGE_WORD_LENGTH) / minutes
    }

    /// Share of correct keystrokes, in percent
    pub fn accuracy(&self) -> f64 {
        match self.total_keystrokes() {
            0 => 100.0,
            total => 100.0 * self.right as f64 / total as f64,
        }
    }

    pub fn clock(&self) -> String {
        clock(self.elapsed)
    }

    pub const fn status_line(&self) -> StatusLine {
        StatusLine(*self)
    }
}

impl Add for Score {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            right: self.right + rhs.right,
            wrong: self.wrong + rhs.wrong,
            elapsed: self.elapsed + rhs.elapsed,
        }
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Format a duration as minutes and zero-padded seconds
pub fn clock(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// The live statistics line shown under the border
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine(pub Score);

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WPM: {:.2}   Accuracy: {:.2}%   Time: {}",
            self.0.wpm(),
            self.0.accuracy(),
            self.0.clock()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wpm() {
        let score = Score::new(50, 0, Duration::from_secs(60));
        assert!((score.wpm() - 10.0).abs() < f64::EPSILON);

        let score = Score::new(25, 5, Duration::from_secs(30));
        assert!((score.wpm() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wpm_before_any_time() {
        assert_eq!(Score::new(12, 3, Duration::ZERO).wpm(), 0.0);
    }

    #[test]
    fn test_accuracy() {
        let score = Score::new(27, 3, Duration::from_secs(30));
        assert!((score.accuracy() - 90.0).abs() < 1e-9);
        assert_eq!(format!("{:.2}", score.accuracy()), "90.00");

        assert_eq!(Score::default().accuracy(), 100.0);
        assert_eq!(Score::new(0, 4, Duration::ZERO).accuracy(), 0.0);
    }

    #[test]
    fn test_clock() {
        assert_eq!(clock(Duration::ZERO), "0:00");
        assert_eq!(clock(Duration::from_millis(59_999)), "0:59");
        assert_eq!(clock(Duration::from_secs(61)), "1:01");
        assert_eq!(clock(Duration::from_secs(600)), "10:00");
    }

    #[test]
    fn test_status_line() {
        let line = Score::new(27, 3, Duration::from_secs(30)).status_line();
        assert_eq!(
            line.to_string(),
            "WPM: 10.80   Accuracy: 90.00%   Time: 0:30"
        );
    }

    #[test]
    fn test_scores_add_up() {
        let mut total = Score::new(3, 1, Duration::from_secs(2));
        total += Score::new(7, 0, Duration::from_secs(3));
        assert_eq!(total, Score::new(10, 1, Duration::from_secs(5)));
        assert_eq!(total.total_keystrokes(), 11);
    }
}
