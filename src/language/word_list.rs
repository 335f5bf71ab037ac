use include_dir::{include_dir, Dir};
use serde::Deserialize;

use super::SupportedLanguage;
use crate::error::{Error, Result};

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// A static word pool, as stored in `src/lang/<name>.json`.
#[derive(Deserialize, Clone, Debug)]
pub struct Language {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl Language {
    pub fn load(language: SupportedLanguage) -> Result<Self> {
        read_language_from_file(&format!("{}.json", language.file_stem()))
    }
}

fn read_language_from_file(file_name: &str) -> Result<Language> {
    let file = LANG_DIR
        .get_file(file_name)
        .ok_or_else(|| Error::MissingWordList(file_name.to_string()))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or_else(|| Error::WordListEncoding(file_name.to_string()))?;

    let lang: Language =
        serde_json::from_str(file_as_str).map_err(|source| Error::WordListFormat {
            name: file_name.to_string(),
            source,
        })?;

    if lang.words.is_empty() {
        return Err(Error::EmptyWordList(file_name.to_string()));
    }

    Ok(lang)
}
