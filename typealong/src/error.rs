use derive_more::From;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, From, Error)]
pub enum AppError {
    #[error("{0}")]
    Config(ConfigError),

    #[error("Terminal error: {0}")]
    Terminal(std::io::Error),

    #[error("Failed to print settings: {0}")]
    Print(toml::ser::Error),

    #[error("The terminal is too small ({cols}x{rows}), at least 2 columns and 4 rows are needed")]
    #[from(skip)]
    TooSmall { rows: u16, cols: u16 },
}
