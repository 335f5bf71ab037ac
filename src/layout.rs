//! Row assignment and scrolling for the passage view.
//!
//! The engine only sees the measured top offset of every word, through
//! [`Measure`]. The terminal implementation is [`WrapMeasure`]; tests feed
//! synthetic offsets.

use unicode_width::UnicodeWidthStr;

use crate::passage::PassageId;

/// Tops closer than this belong to the same row.
pub const ROW_TOLERANCE: f64 = 0.5;

/// Rows kept visible in the passage window.
pub const VIEWPORT_ROWS: usize = 3;

/// Source of measured word positions.
pub trait Measure {
    /// Top offset of each word, in index order.
    fn word_tops(&self, words: &[String]) -> Vec<f64>;
}

impl<F> Measure for F
where
    F: Fn(&[String]) -> Vec<f64>,
{
    fn word_tops(&self, words: &[String]) -> Vec<f64> {
        self(words)
    }
}

/// Greedy left-to-right word wrap into `width` columns, one space between
/// words, rows `line_height` units apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapMeasure {
    pub width: u16,
    pub line_height: u16,
}

impl WrapMeasure {
    pub fn new(width: u16, line_height: u16) -> Self {
        Self { width, line_height }
    }
}

impl Measure for WrapMeasure {
    fn word_tops(&self, words: &[String]) -> Vec<f64> {
        let width = self.width.max(1) as usize;
        let mut line = 0usize;
        let mut column = 0usize;

        words
            .iter()
            .map(|word| {
                let w = word.width();
                if column > 0 && column + 1 + w > width {
                    line += 1;
                    column = 0;
                }
                column += if column == 0 { w } else { 1 + w };
                (line * self.line_height as usize) as f64
            })
            .collect()
    }
}

/// Word index -> row, plus the distance between rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowAssignment {
    rows: Vec<usize>,
    row_height: f64,
}

impl RowAssignment {
    pub fn from_tops(tops: &[f64]) -> Self {
        let Some(&first_top) = tops.first() else {
            return Self::default();
        };

        let mut rows = Vec::with_capacity(tops.len());
        let mut row = 0;
        let mut anchor = first_top;
        for &top in tops {
            if (top - anchor).abs() > ROW_TOLERANCE {
                row += 1;
                anchor = top;
            }
            rows.push(row);
        }

        let row_height = tops
            .iter()
            .find(|&&top| (top - first_top).abs() > ROW_TOLERANCE)
            .map_or(0.0, |&top| (top - first_top).abs());

        Self { rows, row_height }
    }

    pub fn row_of(&self, word_index: usize) -> Option<usize> {
        self.rows.get(word_index).copied()
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    pub fn row_count(&self) -> usize {
        self.rows.last().map_or(0, |last| last + 1)
    }
}

/// What a row assignment was measured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutKey {
    pub passage: PassageId,
    pub width: u16,
}

/// Keeps the row of the last completed word on the second visible row.
#[derive(Debug, Default)]
pub struct ScrollEngine {
    key: Option<LayoutKey>,
    assignment: RowAssignment,
    completed: usize,
    offset: f64,
}

impl ScrollEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measures and assigns rows again if `key` differs from the last layout.
    /// Returns whether a relayout happened; a relayout resets the offset.
    pub fn relayout<M: Measure + ?Sized>(
        &mut self,
        key: LayoutKey,
        words: &[String],
        measure: &M,
    ) -> bool {
        if self.key == Some(key) {
            return false;
        }

        self.assignment = RowAssignment::from_tops(&measure.word_tops(words));
        self.key = Some(key);
        self.completed = 0;
        self.offset = 0.0;
        tracing::debug!(
            target: "layout",
            width = key.width,
            rows = self.assignment.row_count(),
            row_height = self.assignment.row_height(),
            "relayout"
        );
        true
    }

    /// Updates the offset for `completed` finished words and returns it.
    pub fn follow(&mut self, completed: usize) -> f64 {
        if completed != self.completed {
            self.completed = completed;
            self.offset = scroll_offset(&self.assignment, completed, self.offset);
        }
        self.offset
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn assignment(&self) -> &RowAssignment {
        &self.assignment
    }
}

/// Vertical offset (zero or negative) for `completed` finished words.
///
/// A completed word past the end of the passage has no row; `current` is
/// kept for it.
pub fn scroll_offset(assignment: &RowAssignment, completed: usize, current: f64) -> f64 {
    if completed == 0 || assignment.row_height() <= 0.0 {
        return 0.0;
    }

    match assignment.row_of(completed - 1) {
        Some(row) if row >= 2 => -((row - 1) as f64) * assignment.row_height(),
        Some(_) => 0.0,
        None => current,
    }
}
