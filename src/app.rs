use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{
    config::{Config, ConfigStore},
    language::PassageSource,
    layout::{LayoutKey, ScrollEngine, WrapMeasure},
    metrics::MetricsSnapshot,
    normalizer::{typed_word_count, WordProgress},
    passage::Passage,
    session::{Session, TestMode, Transition},
    typing_policy::apply_key,
};

/// Terminal lines per passage row; rows are double spaced.
pub const LINE_HEIGHT: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App {
    pub config: Config,
    pub session: Session,
    pub scroll: ScrollEngine,
    pub state: AppState,
    source: Box<dyn PassageSource>,
    store: Option<Box<dyn ConfigStore>>,
}

impl App {
    pub fn new(config: Config, source: Box<dyn PassageSource>) -> Self {
        let config = config.normalized();
        let passage = next_passage(source.as_ref(), &config);

        Self {
            session: Session::new(passage, config.test_mode()),
            config,
            scroll: ScrollEngine::new(),
            state: AppState::Typing,
            source,
            store: None,
        }
    }

    /// Saves configuration changes made from the results screen to `store`.
    pub fn with_store(mut self, store: Box<dyn ConfigStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Fresh passage, idle session.
    pub fn restart(&mut self) {
        let passage = next_passage(self.source.as_ref(), &self.config);
        self.session.restart(passage, self.config.test_mode());
        self.state = AppState::Typing;
        tracing::debug!(target: "app", mode = %self.config.mode, language = %self.config.language, "restart");
    }

    /// Applies `change` to the configuration, persists it and restarts.
    pub fn reconfigure(&mut self, change: impl FnOnce(&mut Config)) {
        change(&mut self.config);
        self.config = self.config.clone().normalized();

        if let Some(store) = &self.store {
            if let Err(err) = store.save(&self.config) {
                tracing::warn!(target: "app", %err, "config_save_failed");
            }
        }

        self.restart();
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Control::Quit
            }
            KeyCode::Tab => {
                self.restart();
                return Control::Continue;
            }
            KeyCode::F(2) => {
                self.reconfigure(Config::toggle_mode);
                return Control::Continue;
            }
            KeyCode::F(3) => {
                self.reconfigure(Config::cycle_bound);
                return Control::Continue;
            }
            KeyCode::F(4) => {
                self.reconfigure(Config::toggle_language);
                return Control::Continue;
            }
            _ => {}
        }

        match self.state {
            AppState::Typing => {
                if let Some(next) = apply_key(self.session.input(), key) {
                    let transition = self.session.handle_input(&next, now);
                    self.after(transition, now);
                }
            }
            AppState::Results => match key.code {
                KeyCode::Char('r') => self.restart(),
                KeyCode::Char('m') => self.reconfigure(Config::toggle_mode),
                KeyCode::Char('b') => self.reconfigure(Config::cycle_bound),
                KeyCode::Char('l') => self.reconfigure(Config::toggle_language),
                _ => {}
            },
        }

        Control::Continue
    }

    /// Runs the session timer up to `now`.
    pub fn on_tick(&mut self, now: Instant) {
        let transition = self.session.poll_timer(now);
        self.after(transition, now);
    }

    fn after(&mut self, transition: Transition, now: Instant) {
        if transition == Transition::Finished {
            let results = self.session.snapshot(now);
            tracing::info!(
                target: "app",
                wpm = results.wpm,
                accuracy = results.accuracy_percent,
                consistency = results.consistency_percent,
                "results"
            );
            self.state = AppState::Results;
        }
    }

    /// Metrics of the session, frozen at its end once finished.
    pub fn results(&self) -> MetricsSnapshot {
        let at = self.session.ended_at().unwrap_or_else(Instant::now);
        self.session.snapshot(at)
    }

    /// Re-measures rows when the passage or `width` changed, then scrolls to
    /// follow the completed words.
    pub fn sync_layout(&mut self, width: u16) {
        let passage = self.session.passage();
        let key = LayoutKey {
            passage: passage.id(),
            width,
        };
        self.scroll
            .relayout(key, passage.words(), &WrapMeasure::new(width, LINE_HEIGHT));

        let completed = WordProgress::parse(self.session.input()).completed.len();
        self.scroll.follow(completed);
    }

    /// Counter shown above the passage: seconds left, or words typed/total.
    pub fn progress_label(&self) -> String {
        match self.session.mode() {
            TestMode::Timed { .. } => format!("{}s", self.session.seconds_remaining()),
            TestMode::FixedLength { .. } => format!(
                "{}/{}",
                typed_word_count(self.session.input()),
                self.session.passage().word_count()
            ),
        }
    }
}

fn next_passage(source: &dyn PassageSource, config: &Config) -> Passage {
    Passage::from(source.generate(config.passage_words(), config.language))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModeKind;
    use crate::language::FixedPassageSource;
    use crate::session::Phase;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn app_with(text: &str, config: Config) -> App {
        App::new(config, Box::new(FixedPassageSource::new(text)))
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn type_str(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            app.on_key(key(c), now);
        }
    }

    #[derive(Clone, Default)]
    struct MemoryStore(Rc<RefCell<Vec<Config>>>);

    impl ConfigStore for MemoryStore {
        fn load(&self) -> Config {
            self.0.borrow().last().cloned().unwrap_or_default()
        }

        fn save(&self, cfg: &Config) -> crate::Result<()> {
            self.0.borrow_mut().push(cfg.clone());
            Ok(())
        }
    }

    #[test]
    fn test_typing_to_the_end_shows_results() {
        let mut app = app_with("hi yo", Config::default());
        let t0 = Instant::now();

        type_str(&mut app, "hi y", t0);
        assert_eq!(app.state, AppState::Typing);
        assert_eq!(app.progress_label(), "2/2");

        type_str(&mut app, "o", t0 + Duration::from_secs(1));
        assert_eq!(app.state, AppState::Results);
        assert_eq!(app.session.phase(), Phase::Finished);
        let results = app.results();
        assert_eq!(results.accuracy_percent, 100);
        assert_eq!(results.elapsed_seconds, 1);
    }

    #[test]
    fn test_backspace_edits_input() {
        let mut app = app_with("the of", Config::default());
        let now = Instant::now();

        type_str(&mut app, "thx", now);
        app.on_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE), now);

        assert_eq!(app.session.input(), "th");
    }

    #[test]
    fn test_escape_and_ctrl_c_quit() {
        let mut app = app_with("the", Config::default());
        let now = Instant::now();

        assert_eq!(
            app.on_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), now),
            Control::Quit
        );
        assert_eq!(
            app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), now),
            Control::Quit
        );
        assert_eq!(app.session.input(), "");
    }

    #[test]
    fn test_tab_restarts() {
        let mut app = app_with("the of", Config::default());
        let now = Instant::now();
        type_str(&mut app, "the", now);
        let old = app.session.passage().id();

        app.on_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE), now);

        assert_eq!(app.session.phase(), Phase::Idle);
        assert_eq!(app.session.input(), "");
        assert_ne!(app.session.passage().id(), old);
    }

    #[test]
    fn test_timed_session_ends_on_ticks() {
        let config = Config {
            mode: ModeKind::Time,
            number_of_secs: 15,
            ..Config::default()
        };
        let mut app = app_with("the of and", config);
        let t0 = Instant::now();
        type_str(&mut app, "t", t0);
        assert_eq!(app.progress_label(), "15s");

        app.on_tick(t0 + Duration::from_millis(14_500));
        assert_eq!(app.state, AppState::Typing);
        assert_eq!(app.progress_label(), "1s");

        app.on_tick(t0 + Duration::from_secs(15));
        assert_eq!(app.state, AppState::Results);
    }

    #[test]
    fn test_results_keys_reconfigure_and_save() {
        let store = MemoryStore::default();
        let mut app = app_with("ab", Config::default()).with_store(Box::new(store.clone()));
        let now = Instant::now();
        type_str(&mut app, "ab", now);
        assert_eq!(app.state, AppState::Results);

        app.on_key(key('m'), now);

        assert_eq!(app.state, AppState::Typing);
        assert_eq!(app.results(), MetricsSnapshot::default());
        assert_eq!(app.config.mode, ModeKind::Time);
        assert_eq!(app.session.mode(), TestMode::Timed { secs: 30 });
        assert_eq!(store.load().mode, ModeKind::Time);
    }

    #[test]
    fn test_function_keys_reconfigure_while_typing() {
        let store = MemoryStore::default();
        let mut app = app_with("ab cd", Config::default()).with_store(Box::new(store.clone()));
        let now = Instant::now();
        type_str(&mut app, "a", now);

        app.on_key(KeyEvent::new(KeyCode::F(2), KeyModifiers::NONE), now);

        assert_eq!(app.state, AppState::Typing);
        assert_eq!(app.session.phase(), Phase::Idle);
        assert_eq!(app.session.input(), "");
        assert_eq!(app.config.mode, ModeKind::Time);
        assert_eq!(app.session.mode(), TestMode::Timed { secs: 30 });
        assert_eq!(store.load().mode, ModeKind::Time);

        let language = app.config.language;
        app.on_key(KeyEvent::new(KeyCode::F(4), KeyModifiers::NONE), now);
        assert_ne!(app.config.language, language);
        assert_eq!(store.load().language, app.config.language);
    }

    #[test]
    fn test_results_letters_are_not_input() {
        let mut app = app_with("ab", Config::default());
        let now = Instant::now();
        type_str(&mut app, "ab", now);

        app.on_key(key('x'), now);

        assert_eq!(app.state, AppState::Results);
        assert_eq!(app.session.input(), "ab");
    }

    #[test]
    fn test_sync_layout_scrolls_after_second_row() {
        // width 5 puts every word on its own row
        let mut app = app_with("aaa bbb ccc ddd eee", Config::default());
        let now = Instant::now();

        app.sync_layout(5);
        assert_eq!(app.scroll.assignment().row_count(), 5);
        assert_eq!(app.scroll.assignment().row_height(), LINE_HEIGHT as f64);

        type_str(&mut app, "aaa bbb ", now);
        app.sync_layout(5);
        assert_eq!(app.scroll.offset(), 0.0);

        type_str(&mut app, "ccc ", now);
        app.sync_layout(5);
        assert_eq!(app.scroll.offset(), -(LINE_HEIGHT as f64));
    }

    #[test]
    fn test_short_tokens_past_passage_keep_scroll() {
        let mut app = app_with("aaaaa bbbbb ccccc ddddd", Config::default());
        let now = Instant::now();
        app.sync_layout(5);

        let mut offsets = Vec::new();
        for token in ["a ", "b ", "c ", "d ", "e ", "f "] {
            type_str(&mut app, token, now);
            app.sync_layout(5);
            offsets.push(app.scroll.offset());
        }

        assert_eq!(app.state, AppState::Typing);
        assert_eq!(offsets, [0.0, 0.0, -2.0, -4.0, -4.0, -4.0]);
    }

    #[test]
    fn test_restart_resets_scroll() {
        let mut app = app_with("aaa bbb ccc ddd eee", Config::default());
        let now = Instant::now();
        app.sync_layout(5);
        type_str(&mut app, "aaa bbb ccc ", now);
        app.sync_layout(5);
        assert!(app.scroll.offset() < 0.0);

        app.restart();
        app.sync_layout(5);

        assert_eq!(app.scroll.offset(), 0.0);
    }
}
