use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::normalizer::WORD_SEPARATOR;

/// The raw input after `key`, or `None` when the key does not edit it.
pub fn apply_key(input: &str, key: KeyEvent) -> Option<String> {
    let word_delete = key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

    match key.code {
        KeyCode::Backspace if word_delete => delete_word(input),
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => delete_word(input),
        KeyCode::Char(_) if word_delete => None,
        KeyCode::Backspace => delete_char(input),
        KeyCode::Char(c) => {
            let mut next = String::with_capacity(input.len() + c.len_utf8());
            next.push_str(input);
            next.push(c);
            Some(next)
        }
        _ => None,
    }
}

fn delete_char(input: &str) -> Option<String> {
    let mut next = input.to_owned();
    next.pop().map(|_| next)
}

/// Drops trailing separators, then the word before them.
fn delete_word(input: &str) -> Option<String> {
    if input.is_empty() {
        return None;
    }
    let trimmed = input.trim_end_matches(WORD_SEPARATOR);
    let keep = trimmed
        .rfind(WORD_SEPARATOR)
        .map_or(0, |idx| idx + WORD_SEPARATOR.len_utf8());
    Some(trimmed[..keep].to_owned())
}
