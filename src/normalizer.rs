//! Splits the raw accumulated input into completed words and the word being
//! typed, and compares them against the passage character by character.
//!
//! Everything here is a pure function of `(passage words, input)`; the UI
//! calls it on every frame.

pub const WORD_SEPARATOR: char = ' ';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharState {
    Correct,
    Incorrect,
    /// Typed past the end of the target word.
    Extra,
    /// Target character not (yet) typed.
    Missed,
}

/// One character of a compared word. For `Extra` the char is the typed one,
/// otherwise it is the target's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub state: CharState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordState {
    Typed { correct: bool },
    Current,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordView {
    pub index: usize,
    pub state: WordState,
    pub glyphs: Vec<Glyph>,
}

/// Completed words plus the in-progress word of a raw input string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordProgress<'a> {
    pub completed: Vec<&'a str>,
    /// Empty when the input ends with the separator.
    pub current: &'a str,
}

impl<'a> WordProgress<'a> {
    pub fn parse(input: &'a str) -> Self {
        let mut tokens: Vec<&str> = input.split(WORD_SEPARATOR).collect();
        let current = if input.ends_with(WORD_SEPARATOR) {
            ""
        } else {
            tokens.pop().unwrap_or("")
        };
        tokens.retain(|t| !t.is_empty());

        Self {
            completed: tokens,
            current,
        }
    }

    /// Index of the passage word currently being typed.
    pub fn current_index(&self) -> usize {
        self.completed.len()
    }

    /// Whether completed word `index` matches `target` exactly, length included.
    pub fn is_correct(&self, index: usize, target: &str) -> bool {
        self.completed.get(index).is_some_and(|typed| *typed == target)
    }
}

/// Positional comparison of a typed word against its target.
///
/// Target characters come first (correct, incorrect or missed), followed by
/// any extra typed characters.
pub fn compare_word(target: &str, typed: &str) -> Vec<Glyph> {
    let mut typed_chars = typed.chars();
    let mut glyphs = Vec::with_capacity(target.len().max(typed.len()));

    for ch in target.chars() {
        let state = match typed_chars.next() {
            Some(t) if t == ch => CharState::Correct,
            Some(_) => CharState::Incorrect,
            None => CharState::Missed,
        };
        glyphs.push(Glyph { ch, state });
    }

    glyphs.extend(typed_chars.map(|ch| Glyph {
        ch,
        state: CharState::Extra,
    }));

    glyphs
}

/// Per-word view of the whole passage for rendering.
pub fn word_views(words: &[String], input: &str) -> Vec<WordView> {
    let progress = WordProgress::parse(input);
    let current_index = progress.current_index();

    words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            if let Some(typed) = progress.completed.get(index) {
                WordView {
                    index,
                    state: WordState::Typed {
                        correct: progress.is_correct(index, word),
                    },
                    glyphs: compare_word(word, typed),
                }
            } else if index == current_index {
                WordView {
                    index,
                    state: WordState::Current,
                    glyphs: compare_word(word, progress.current),
                }
            } else {
                WordView {
                    index,
                    state: WordState::Pending,
                    glyphs: compare_word(word, ""),
                }
            }
        })
        .collect()
}

/// Words counted by the FixedLength progress counter: non-empty tokens of the
/// trimmed input.
pub fn typed_word_count(input: &str) -> usize {
    input
        .trim()
        .split(WORD_SEPARATOR)
        .filter(|w| !w.is_empty())
        .count()
}
