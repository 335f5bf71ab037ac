use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use totatype::{
    app::{App, AppState, Control},
    config::{Config, ModeKind},
    language::{FixedPassageSource, RandomPassageSource, SupportedLanguage},
    runtime::{AppEvent, FixedTicker, Runner, TestEventSource},
    session::Phase,
};

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

// Headless integration using the internal runtime + App without a TTY
// Verifies that a minimal typing flow completes via Runner/TestEventSource.
#[test]
fn headless_typing_flow_completes() {
    let mut app = App::new(Config::default(), Box::new(FixedPassageSource::new("hi")));

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key('h')).unwrap();
    tx.send(key('i')).unwrap();

    for _ in 0..100u32 {
        match runner.step(app.session.next_deadline()) {
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Key(key) => {
                app.on_key(key, Instant::now());
                if app.state == AppState::Results {
                    break;
                }
            }
            AppEvent::Resize | AppEvent::Closed => {}
        }
    }

    assert_eq!(app.state, AppState::Results);
    let results = app.results();
    assert_eq!(results.accuracy_percent, 100);
    assert_eq!(results.history.len(), 1);
}

#[test]
fn headless_timed_session_finishes_by_ticks() {
    let config = Config {
        mode: ModeKind::Time,
        number_of_secs: 15,
        ..Config::default()
    };
    let mut app = App::new(config, Box::new(FixedPassageSource::new("the of and")));

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );
    tx.send(key('t')).unwrap();

    // simulated clock: every idle tick is one more second
    let t0 = Instant::now();
    let mut clock = t0;
    for _ in 0..100u32 {
        match runner.step(None) {
            AppEvent::Key(key) => {
                app.on_key(key, clock);
            }
            AppEvent::Tick => {
                clock += Duration::from_secs(1);
                app.on_tick(clock);
            }
            AppEvent::Resize | AppEvent::Closed => {}
        }
        if app.state == AppState::Results {
            break;
        }
    }

    assert_eq!(app.state, AppState::Results);
    assert_eq!(clock, t0 + Duration::from_secs(15));
    assert_eq!(app.session.seconds_remaining(), 0);
    assert_eq!(app.results().history.len(), 15);
}

#[test]
fn headless_results_hotkeys_cycle_settings() {
    let source = RandomPassageSource::embedded().unwrap();
    let mut app = App::new(
        Config {
            number_of_words: 10,
            ..Config::default()
        },
        Box::new(source),
    );
    let now = Instant::now();
    assert_eq!(app.session.passage().word_count(), 10);

    // type the whole passage to reach the results screen
    let text = app.session.passage().text().to_owned();
    for c in text.chars() {
        app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), now);
    }
    assert_eq!(app.state, AppState::Results);

    app.on_key(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::NONE), now);
    assert_eq!(app.config.number_of_words, 25);
    assert_eq!(app.session.passage().word_count(), 25);
    assert_eq!(app.session.phase(), Phase::Idle);
    assert_eq!(app.state, AppState::Typing);

    app.on_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE), now);
    for c in app.session.passage().text().to_owned().chars() {
        app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), now);
    }
    app.on_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE), now);
    assert_eq!(app.config.language, SupportedLanguage::English);
}

#[test]
fn headless_escape_quits_mid_session() {
    let mut app = App::new(Config::default(), Box::new(FixedPassageSource::new("the of")));
    let now = Instant::now();

    app.on_key(KeyEvent::new(KeyCode::Char('t'), KeyModifiers::NONE), now);
    let control = app.on_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), now);

    assert_eq!(control, Control::Quit);
    assert_eq!(app.session.phase(), Phase::Running);
}
