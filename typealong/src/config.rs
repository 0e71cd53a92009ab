use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_more::From;
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use quill::{CommentMode, Configuration, SpeedTiers};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod theme;

/// Prefix of environment variables overriding settings, e.g. `TYPEALONG_LOG__ENABLED=true`
const ENV_PREFIX: &str = "TYPEALONG_";

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub theme: theme::Theme,
    pub typing: TypingConfig,
    pub resume: ResumeConfig,
    pub log: LogConfig,
}

/// Typing behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TypingConfig {
    /// Draw comments and filler whitespace instead of hiding them
    pub show_comments: bool,
    /// Gaps up to this many milliseconds are fast
    pub medium_after_ms: u64,
    /// Gaps up to this many milliseconds are medium, longer ones slow
    pub slow_after_ms: u64,
    /// Widest terminal the text is laid out on
    pub max_columns: u16,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            show_comments: false,
            medium_after_ms: 1000,
            slow_after_ms: 2000,
            max_columns: 256,
        }
    }
}

impl TypingConfig {
    /// Engine configuration for these settings
    pub fn engine(&self) -> Configuration {
        Configuration {
            tiers: SpeedTiers::new(
                Duration::from_millis(self.medium_after_ms),
                Duration::from_millis(self.slow_after_ms),
            ),
            comments: if self.show_comments {
                CommentMode::Shown
            } else {
                CommentMode::Hidden
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResumeConfig {
    pub enabled: bool,
    /// Location of the resume file. Defaults to `resume` in the data directory.
    pub file: Option<PathBuf>,
}

impl Default for ResumeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: None,
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    pub enabled: bool,
    /// Directory of `typealong.log`. Defaults to the data directory.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, From, Error)]
pub enum ConfigError {
    #[error(
        "Failed to get configuration directory. Please specify the location using the `--config <path>` flag"
    )]
    NoDirectory,

    #[error("Failed to create config directory: {0}")]
    CreateDirectory(std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(Box<figment::Error>),
}

#[derive(Debug, Default)]
pub struct Config {
    pub settings: Settings,
    pub config_dir: PathBuf,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load settings from defaults, `settings.toml` and the environment, in that order.
    pub fn get(override_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from("com", "TypeAlong", "TypeAlong");

        // Check for toml file location
        let config_dir = override_path
            .or_else(|| dirs.as_ref().map(|dirs| dirs.config_dir().to_path_buf()))
            .ok_or(ConfigError::NoDirectory)?;

        // Ensure path exists
        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir)?;
        }

        let settings = Self::load_settings(&config_dir)?;
        let data_dir = dirs.map(|dirs| dirs.data_dir().to_path_buf());

        Ok(Self {
            settings,
            config_dir,
            data_dir,
        })
    }

    fn load_settings(config_dir: &Path) -> Result<Settings, ConfigError> {
        // Grab default configuration
        let mut settings = Figment::from(Serialized::defaults(Settings::default()));

        let settings_toml = config_dir.join("settings.toml");
        if settings_toml.exists() {
            settings = settings.merge(Toml::file(settings_toml));
        }

        settings = settings.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Ok(settings.extract().map_err(Box::new)?)
    }

    /// Where offsets are saved, if anywhere
    pub fn resume_file(&self) -> Option<PathBuf> {
        if !self.settings.resume.enabled {
            return None;
        }

        self.settings
            .resume
            .file
            .clone()
            .or_else(|| self.data_dir.as_ref().map(|dir| dir.join("resume")))
    }

    /// Where the log file goes
    pub fn log_dir(&self) -> PathBuf {
        self.settings
            .log
            .directory
            .clone()
            .or_else(|| self.data_dir.clone())
            .unwrap_or_else(|| self.config_dir.clone())
    }
}
