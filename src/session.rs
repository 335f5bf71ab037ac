//! Session lifecycle: `Idle` until the first keystroke, `Running` while the
//! timer samples history, `Finished` once the countdown or the passage runs
//! out.

use std::time::{Duration, Instant};

use crate::{
    metrics::{self, MetricsSnapshot},
    passage::Passage,
    time_series::History,
    timer::SessionTimer,
};

/// How a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestMode {
    /// Countdown of `secs` seconds.
    Timed { secs: u64 },
    /// Ends when the input is as long as the passage of `words` words.
    FixedLength { words: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

/// Lifecycle change caused by an input or a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Started,
    Finished,
}

#[derive(Debug)]
pub struct Session {
    passage: Passage,
    mode: TestMode,
    input: String,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
    seconds_remaining: u64,
    finished: bool,
    history: History,
    timer: Option<SessionTimer>,
}

impl Session {
    pub fn new(passage: Passage, mode: TestMode) -> Self {
        let seconds_remaining = match mode {
            TestMode::Timed { secs } => secs,
            TestMode::FixedLength { .. } => 0,
        };

        Self {
            passage,
            mode,
            input: String::new(),
            started_at: None,
            ended_at: None,
            seconds_remaining,
            finished: false,
            history: History::new(),
            timer: None,
        }
    }

    /// Throws away all progress and starts over, idle, on `passage`.
    pub fn restart(&mut self, passage: Passage, mode: TestMode) {
        // release the timer before any state of the new session exists
        self.timer = None;
        tracing::debug!(target: "session", ?mode, words = passage.word_count(), "session_restart");
        *self = Session::new(passage, mode);
    }

    pub fn passage(&self) -> &Passage {
        &self.passage
    }

    pub fn mode(&self) -> TestMode {
        self.mode
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Instant> {
        self.ended_at
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.seconds_remaining
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn phase(&self) -> Phase {
        match (self.started_at, self.finished) {
            (_, true) => Phase::Finished,
            (Some(_), false) => Phase::Running,
            (None, false) => Phase::Idle,
        }
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// When the runtime should wake up to tick this session, if it is running.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.as_ref().map(SessionTimer::deadline)
    }

    /// Replaces the raw input with `input`, the full string typed so far.
    ///
    /// Ignored once finished.
    pub fn handle_input(&mut self, input: &str, now: Instant) -> Transition {
        if self.finished {
            return Transition::None;
        }

        let mut transition = Transition::None;
        if self.started_at.is_none() {
            self.started_at = Some(now);
            self.timer = Some(SessionTimer::start(now));
            tracing::info!(target: "session", mode = ?self.mode, "session_started");
            transition = Transition::Started;
        }

        self.input.clear();
        self.input.push_str(input);

        if matches!(self.mode, TestMode::FixedLength { .. })
            && self.input.chars().count() == self.passage.char_len()
        {
            self.finish(now);
            transition = Transition::Finished;
        }

        transition
    }

    /// Runs every timer period that elapsed up to `now`.
    pub fn poll_timer(&mut self, now: Instant) -> Transition {
        let fired = self.timer.as_mut().map_or(0, |timer| timer.poll(now));
        for _ in 0..fired {
            if self.tick(now) == Transition::Finished {
                return Transition::Finished;
            }
        }
        Transition::None
    }

    /// One timer period: samples history and advances the countdown.
    ///
    /// No-op unless running.
    pub fn tick(&mut self, now: Instant) -> Transition {
        let Some(started_at) = self.started_at else {
            return Transition::None;
        };
        if self.timer.is_none() {
            return Transition::None;
        }

        let point = metrics::sample(
            self.passage.text(),
            &self.input,
            now.saturating_duration_since(started_at),
        );
        if self.history.record(point) {
            tracing::trace!(target: "session", at = point.at_second, wpm = point.wpm, "history_sample");
        }

        if let TestMode::Timed { .. } = self.mode {
            self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
            if self.seconds_remaining == 0 {
                self.finish(now);
                return Transition::Finished;
            }
        }

        Transition::None
    }

    fn finish(&mut self, now: Instant) {
        self.timer = None;
        self.finished = true;
        if self.ended_at.is_none() {
            self.ended_at = Some(now);
        }

        if self.history.is_empty() {
            let started_at = self.started_at.unwrap_or(now);
            let mut point = metrics::sample(
                self.passage.text(),
                &self.input,
                now.saturating_duration_since(started_at),
            );
            point.at_second = 1;
            self.history.record(point);
        }

        tracing::info!(
            target: "session",
            mode = ?self.mode,
            typed = self.input.chars().count(),
            samples = self.history.len(),
            "session_finished"
        );
    }

    /// Time the rate figures are computed over.
    pub fn elapsed(&self, now: Instant) -> Duration {
        match (self.mode, self.started_at) {
            (_, None) => Duration::ZERO,
            (TestMode::Timed { secs }, Some(_)) => {
                Duration::from_secs(secs.saturating_sub(self.seconds_remaining))
            }
            (TestMode::FixedLength { .. }, Some(started_at)) => self
                .ended_at
                .unwrap_or(now)
                .saturating_duration_since(started_at),
        }
    }

    /// Metrics as of `now`; the final figures once finished.
    pub fn snapshot(&self, now: Instant) -> MetricsSnapshot {
        if !self.has_started() {
            return MetricsSnapshot::default();
        }

        MetricsSnapshot::compute(
            self.passage.text(),
            &self.input,
            self.elapsed(now),
            &self.history,
        )
    }
}
