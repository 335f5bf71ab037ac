use thiserror::Error;

/// Errors surfaced outside the typing core (word lists, config files).
///
/// The session, metrics and layout code never fail; see their modules.
#[derive(Debug, Error)]
pub enum Error {
    #[error("word list `{0}` is not embedded")]
    MissingWordList(String),

    #[error("word list `{0}` is not valid utf-8")]
    WordListEncoding(String),

    #[error("failed to parse word list `{name}`")]
    WordListFormat {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("word list `{0}` has no words")]
    EmptyWordList(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
