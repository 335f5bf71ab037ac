/// One per-second sample of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPoint {
    pub at_second: u64,
    pub wpm: u32,
    pub raw_wpm: u32,
    pub error_count: usize,
}

impl HistoryPoint {
    pub fn new(at_second: u64, wpm: u32, raw_wpm: u32, error_count: usize) -> Self {
        Self {
            at_second,
            wpm,
            raw_wpm,
            error_count,
        }
    }
}

impl From<HistoryPoint> for (f64, f64) {
    fn from(p: HistoryPoint) -> Self {
        (p.at_second as f64, p.wpm as f64)
    }
}

/// WPM samples keyed by `at_second`: at most one point per second, in
/// non-decreasing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    points: Vec<HistoryPoint>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `point` unless its second is already the last recorded one.
    /// Returns whether the point was kept.
    pub fn record(&mut self, point: HistoryPoint) -> bool {
        match self.points.last() {
            Some(last) if last.at_second >= point.at_second => false,
            _ => {
                self.points.push(point);
                true
            }
        }
    }

    pub fn points(&self) -> &[HistoryPoint] {
        &self.points
    }

    pub fn last(&self) -> Option<&HistoryPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn wpm_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.wpm as f64).collect()
    }

    /// `(second, wpm)` pairs for charting.
    pub fn wpm_series(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|&p| p.into()).collect()
    }

    /// `(second, raw wpm)` pairs for charting.
    pub fn raw_series(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.at_second as f64, p.raw_wpm as f64))
            .collect()
    }
}
