use std::collections::HashMap;

use clap::ValueEnum;
use rand::seq::SliceRandom;

use super::{Language, SupportedLanguage};
use crate::error::Result;

/// Supplies the target text of a new session.
pub trait PassageSource {
    /// `word_count` words in `language`, joined by single spaces.
    fn generate(&self, word_count: usize, language: SupportedLanguage) -> String;
}

/// Uniform sampling, with replacement, from the embedded word pools.
#[derive(Debug, Clone)]
pub struct RandomPassageSource {
    pools: HashMap<SupportedLanguage, Language>,
}

impl RandomPassageSource {
    /// Loads every embedded word list.
    pub fn embedded() -> Result<Self> {
        let pools = SupportedLanguage::value_variants()
            .iter()
            .map(|&lang| Language::load(lang).map(|pool| (lang, pool)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self { pools })
    }
}

impl PassageSource for RandomPassageSource {
    fn generate(&self, word_count: usize, language: SupportedLanguage) -> String {
        let Some(pool) = self.pools.get(&language) else {
            return String::new();
        };
        let mut rng = rand::thread_rng();

        (0..word_count)
            .filter_map(|_| pool.words.choose(&mut rng).map(String::as_str))
            .collect::<Vec<&str>>()
            .join(" ")
    }
}

/// The same user supplied text every time, whatever was asked for.
#[derive(Debug, Clone)]
pub struct FixedPassageSource {
    text: String,
}

impl FixedPassageSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl PassageSource for FixedPassageSource {
    fn generate(&self, _word_count: usize, _language: SupportedLanguage) -> String {
        self.text.clone()
    }
}
