//! # Configuration Module - Engine Behaviour Settings
//!
//! Knobs the driver can turn without touching the engine: how keystroke speed maps onto
//! colour tiers, and whether background text is laid out at all.
//!
//! ## Usage
//!
//! ```rust
//! use quill::{CommentMode, Configuration, SpeedTiers};
//! use web_time::Duration;
//!
//! // Use default configuration
//! let config = Configuration::default();
//!
//! // Slower tiers, comments shown
//! let config = Configuration {
//!     tiers: SpeedTiers::new(Duration::from_millis(1500), Duration::from_secs(3)),
//!     comments: CommentMode::Shown,
//! };
//! ```

use web_time::Duration;

use crate::{Attr, CommentMode};

/// Runtime configuration for a typing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Configuration {
    /// Thresholds for colouring correct keystrokes by speed
    pub tiers: SpeedTiers,
    /// How comments and filler whitespace are laid out
    ///
    /// **Default**: [`CommentMode::Hidden`]
    pub comments: CommentMode,
}

/// How quickly a correct keystroke followed the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeedTier {
    Fast,
    Medium,
    Slow,
}

impl SpeedTier {
    /// The attribute a keystroke of this tier is painted with
    pub const fn attr(self) -> Attr {
        match self {
            Self::Fast => Attr::Fast,
            Self::Medium => Attr::Medium,
            Self::Slow => Attr::Slow,
        }
    }
}

/// Upper bounds of the fast and medium tiers
///
/// A gap of at most `medium_after` is fast, at most `slow_after` is medium, anything longer is
/// slow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedTiers {
    pub medium_after: Duration,
    pub slow_after: Duration,
}

impl SpeedTiers {
    /// Build tiers, swapping the bounds if they are given out of order
    pub fn new(medium_after: Duration, slow_after: Duration) -> Self {
        Self {
            medium_after: medium_after.min(slow_after),
            slow_after: slow_after.max(medium_after),
        }
    }

    /// Classify the gap since the previous correct keystroke
    pub fn tier(&self, gap: Duration) -> SpeedTier {
        if gap <= self.medium_after {
            SpeedTier::Fast
        } else if gap <= self.slow_after {
            SpeedTier::Medium
        } else {
            SpeedTier::Slow
        }
    }
}

impl Default for SpeedTiers {
    fn default() -> Self {
        Self {
            medium_after: Duration::from_secs(1),
            slow_after: Duration::from_secs(2),
        }
    }
}
