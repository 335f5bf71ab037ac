pub mod word_list;
pub mod source;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use self::word_list::Language;
pub use self::source::{FixedPassageSource, PassageSource, RandomPassageSource};

/// Word lists shipped with the binary.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SupportedLanguage {
    #[default]
    Amharic,
    English,
}

impl SupportedLanguage {
    /// Name of the embedded word list file, without extension.
    pub fn file_stem(&self) -> String {
        self.to_string()
    }

    pub fn toggled(self) -> Self {
        match self {
            SupportedLanguage::Amharic => SupportedLanguage::English,
            SupportedLanguage::English => SupportedLanguage::Amharic,
        }
    }
}
