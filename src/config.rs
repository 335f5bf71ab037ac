use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{app_dirs::AppDirs, language::SupportedLanguage, session::TestMode};

pub const TIME_OPTIONS: [u64; 4] = [15, 30, 60, 120];
pub const WORD_OPTIONS: [usize; 4] = [10, 25, 50, 100];

const DEFAULT_SECS: u64 = 30;
const DEFAULT_WORDS: usize = 25;

/// Words generated for a timed test; more than anyone types in two minutes.
pub const TIMED_PASSAGE_WORDS: usize = 500;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModeKind {
    Time,
    #[default]
    Words,
}

/// User preferences: which test to run next.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mode: ModeKind,
    pub number_of_secs: u64,
    pub number_of_words: usize,
    pub language: SupportedLanguage,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ModeKind::Words,
            number_of_secs: DEFAULT_SECS,
            number_of_words: DEFAULT_WORDS,
            language: SupportedLanguage::Amharic,
        }
    }
}

impl Config {
    /// Snaps values outside the offered options back to the defaults.
    pub fn normalized(mut self) -> Self {
        if !TIME_OPTIONS.contains(&self.number_of_secs) {
            self.number_of_secs = DEFAULT_SECS;
        }
        if !WORD_OPTIONS.contains(&self.number_of_words) {
            self.number_of_words = DEFAULT_WORDS;
        }
        self
    }

    pub fn test_mode(&self) -> TestMode {
        match self.mode {
            ModeKind::Time => TestMode::Timed {
                secs: self.number_of_secs,
            },
            ModeKind::Words => TestMode::FixedLength {
                words: self.number_of_words,
            },
        }
    }

    /// Words to generate for the configured test.
    pub fn passage_words(&self) -> usize {
        match self.mode {
            ModeKind::Time => TIMED_PASSAGE_WORDS,
            ModeKind::Words => self.number_of_words,
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            ModeKind::Time => ModeKind::Words,
            ModeKind::Words => ModeKind::Time,
        };
    }

    /// Moves the bound of the current mode to the next option, wrapping.
    pub fn cycle_bound(&mut self) {
        match self.mode {
            ModeKind::Time => {
                self.number_of_secs = next_option(&TIME_OPTIONS, self.number_of_secs)
            }
            ModeKind::Words => {
                self.number_of_words = next_option(&WORD_OPTIONS, self.number_of_words)
            }
        }
    }

    pub fn toggle_language(&mut self) {
        self.language = self.language.toggled();
    }
}

fn next_option<T: Copy + PartialEq>(options: &[T], current: T) -> T {
    let idx = options.iter().position(|&o| o == current).map_or(0, |i| i + 1);
    options[idx % options.len()]
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> crate::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("totatype_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!(target: "config", path = %self.path.display(), %err, "config_not_read");
                return Config::default();
            }
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg.normalized(),
            Err(err) => {
                tracing::warn!(target: "config", path = %self.path.display(), %err, "config_invalid");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        tracing::debug!(target: "config", path = %self.path.display(), "config_saved");
        Ok(())
    }
}
