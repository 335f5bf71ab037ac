use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PASSAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a generated passage; two passages with equal text still differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassageId(u64);

/// The target text of a session: words joined by single spaces.
#[derive(Debug, Clone)]
pub struct Passage {
    id: PassageId,
    words: Vec<String>,
    text: String,
    char_len: usize,
}

impl Passage {
    pub fn new(words: Vec<String>) -> Self {
        let text = words.join(" ");
        let char_len = text.chars().count();
        Self {
            id: PassageId(NEXT_PASSAGE_ID.fetch_add(1, Ordering::Relaxed)),
            words,
            text,
            char_len,
        }
    }

    pub fn id(&self) -> PassageId {
        self.id
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in chars, the unit every comparison and completion check uses.
    pub fn char_len(&self) -> usize {
        self.char_len
    }
}

impl From<&str> for Passage {
    fn from(text: &str) -> Self {
        Passage::new(
            text.split(' ')
                .filter(|word| !word.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }
}

impl From<String> for Passage {
    fn from(text: String) -> Self {
        Passage::from(text.as_str())
    }
}
