//! Speed, accuracy and consistency figures.
//!
//! Rates use the five-characters-per-word convention. Elapsed time is always
//! clamped to a positive floor before dividing, so every figure is finite.

use std::time::Duration;

use crate::time_series::{History, HistoryPoint};

pub const CHARS_PER_WORD: f64 = 5.0;

/// Floor for elapsed minutes while sampling (sub-second sessions).
pub const SAMPLE_EPSILON_MINUTES: f64 = 0.0001;

/// Floor for elapsed minutes in the final snapshot: one second.
pub const SNAPSHOT_MIN_MINUTES: f64 = 1.0 / 60.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterStats {
    pub correct: usize,
    pub incorrect: usize,
    pub extra: usize,
    pub missed: usize,
}

impl CharacterStats {
    /// Positional comparison of the whole input against the whole passage.
    pub fn compare(passage: &str, input: &str) -> Self {
        let mut stats = Self::default();
        let mut target = passage.chars();
        let mut typed_len = 0;

        for typed in input.chars() {
            typed_len += 1;
            match target.next() {
                Some(expected) if expected == typed => stats.correct += 1,
                Some(_) => stats.incorrect += 1,
                None => stats.extra += 1,
            }
        }

        stats.missed = passage.chars().count().saturating_sub(typed_len);
        stats
    }
}

/// Derived view of a session. Never stored; recompute it when needed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub wpm: u32,
    pub raw_wpm: u32,
    pub accuracy_percent: u32,
    pub consistency_percent: u32,
    pub history: History,
    pub character_stats: CharacterStats,
    pub elapsed_seconds: u64,
}

impl MetricsSnapshot {
    /// Snapshot for `input` typed against `passage` over `elapsed`.
    pub fn compute(passage: &str, input: &str, elapsed: Duration, history: &History) -> Self {
        let minutes = (elapsed.as_secs_f64() / 60.0).max(SNAPSHOT_MIN_MINUTES);
        let typed = input.chars().count();
        let speed = wpm(typed, minutes);
        let character_stats = CharacterStats::compare(passage, input);

        Self {
            wpm: speed,
            raw_wpm: raw_wpm(typed, minutes),
            accuracy_percent: accuracy(character_stats.correct, typed),
            consistency_percent: consistency(history),
            history: history.clone(),
            character_stats,
            elapsed_seconds: (minutes * 60.0).round() as u64,
        }
    }
}

/// Words per minute for `chars` typed over `minutes`.
pub fn wpm(chars: usize, minutes: f64) -> u32 {
    ((chars as f64 / CHARS_PER_WORD) / minutes).round() as u32
}

/// Gross speed. Corrections are not tracked, so this matches `wpm`.
pub fn raw_wpm(chars: usize, minutes: f64) -> u32 {
    wpm(chars, minutes)
}

/// Positions in the overlap of `input` and `passage` that differ.
pub fn error_count(passage: &str, input: &str) -> usize {
    input
        .chars()
        .zip(passage.chars())
        .filter(|(typed, expected)| typed != expected)
        .count()
}

/// Rounded percentage of typed characters that were correct; 0 when nothing
/// was typed.
pub fn accuracy(correct: usize, typed: usize) -> u32 {
    if typed == 0 {
        return 0;
    }
    ((correct as f64 / typed as f64) * 100.0).round() as u32
}

/// 100 minus the coefficient of variation of the history's wpm values,
/// clamped to `0..=100`.
pub fn consistency(history: &History) -> u32 {
    let values = history.wpm_values();
    match (mean(&values), std_dev(&values)) {
        (Some(m), Some(sd)) if m > 0.0 => {
            (100.0 - (sd / m) * 100.0).round().clamp(0.0, 100.0) as u32
        }
        _ => 100,
    }
}

/// History point for `input` at `elapsed` since the session started.
pub fn sample(passage: &str, input: &str, elapsed: Duration) -> HistoryPoint {
    let minutes = (elapsed.as_secs_f64() / 60.0).max(SAMPLE_EPSILON_MINUTES);
    let typed = input.chars().count();

    HistoryPoint::new(
        elapsed.as_secs_f64().round() as u64,
        wpm(typed, minutes),
        raw_wpm(typed, minutes),
        error_count(passage, input),
    )
}

fn mean(data: &[f64]) -> Option<f64> {
    match data.len() {
        0 => None,
        count => Some(data.iter().sum::<f64>() / count as f64),
    }
}

/// Population standard deviation.
fn std_dev(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = data_mean - *value;

            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    Some(variance.sqrt())
}
