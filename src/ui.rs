pub mod charting;
pub mod screen;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};

use crate::{
    app::{App, AppState, LINE_HEIGHT},
    config::ModeKind,
    layout::VIEWPORT_ROWS,
    normalizer::{word_views, CharState, Glyph, WordState, WordView},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Height of the passage window: the visible rows plus the gaps between them.
const PASSAGE_LINES: u16 = VIEWPORT_ROWS as u16 * LINE_HEIGHT - (LINE_HEIGHT - 1);

/// Columns available to the passage in a frame `area_width` wide.
pub fn passage_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1)
}

struct Styles {
    bold: Style,
    typed: Style,
    wrong: Style,
    wrong_word: Style,
    pending: Style,
    cursor: Style,
    counter: Style,
    italic: Style,
}

impl Styles {
    fn new() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let dim_bold = bold.add_modifier(Modifier::DIM);

        Self {
            bold,
            typed: bold.fg(Color::White),
            wrong: bold.fg(Color::Red).add_modifier(Modifier::UNDERLINED),
            wrong_word: bold.fg(Color::White).add_modifier(Modifier::UNDERLINED),
            pending: dim_bold,
            cursor: dim_bold.add_modifier(Modifier::UNDERLINED),
            counter: bold.fg(Color::Yellow),
            italic: Style::default().add_modifier(Modifier::ITALIC),
        }
    }

    fn glyph(&self, view: &WordView, glyph: &Glyph, is_cursor: bool) -> Style {
        match (view.state, glyph.state) {
            (_, CharState::Incorrect) => self.wrong,
            (WordState::Typed { correct: false }, CharState::Missed) => self.wrong,
            (WordState::Typed { correct: false }, _) => self.wrong_word,
            (_, CharState::Correct) => self.typed,
            _ if is_cursor => self.cursor,
            _ => self.pending,
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let styles = Styles::new();

        match self.state {
            AppState::Typing => self.render_typing(area, buf, &styles),
            AppState::Results => self.render_results(area, buf, &styles),
        }
    }
}

impl App {
    fn render_typing(&self, area: Rect, buf: &mut Buffer, styles: &Styles) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(1), // counter
                Constraint::Length(1),
                Constraint::Length(PASSAGE_LINES),
                Constraint::Length(1),
                Constraint::Length(1), // settings
                Constraint::Fill(1),
                Constraint::Length(1), // legend
            ])
            .split(area);

        Paragraph::new(Span::styled(self.progress_label(), styles.counter))
            .render(chunks[1], buf);

        // offset is never positive; it counts terminal lines
        let scroll = (-self.scroll.offset()).round().max(0.0) as u16;
        let lines = self.passage_lines(styles);
        let passage = if lines.len() == 1 {
            Paragraph::new(lines).wrap(Wrap { trim: true })
        } else {
            Paragraph::new(lines)
        };
        passage.scroll((scroll, 0)).render(chunks[3], buf);

        let settings = Paragraph::new(Span::styled(
            self.settings_label(),
            styles.italic.add_modifier(Modifier::DIM),
        ));
        settings.render(chunks[5], buf);

        let legend = Paragraph::new(Span::styled(
            "(tab) restart / (f2) mode / (f3) bound / (f4) language / (esc)ape",
            styles.italic,
        ));
        legend.render(chunks[7], buf);
    }

    /// One line per measured row, rows `LINE_HEIGHT` lines apart.
    fn passage_lines(&self, styles: &Styles) -> Vec<Line<'static>> {
        let views = word_views(self.session.passage().words(), self.session.input());
        let rows = self.scroll.assignment().rows();

        if rows.len() != views.len() {
            // not measured yet
            return vec![row_line(views.iter(), styles)];
        }

        let mut lines: Vec<Line<'static>> = Vec::new();
        for (_, chunk) in &views.iter().zip(rows).chunk_by(|(_, row)| **row) {
            if !lines.is_empty() {
                lines.extend((1..LINE_HEIGHT).map(|_| Line::default()));
            }
            lines.push(row_line(chunk.map(|(view, _)| view), styles));
        }
        lines
    }

    fn settings_label(&self) -> String {
        let bound = match self.config.mode {
            ModeKind::Time => format!("{}s", self.config.number_of_secs),
            ModeKind::Words => self.config.number_of_words.to_string(),
        };
        format!("{} {}   {}", self.config.mode, bound, self.config.language)
    }

    fn render_results(&self, area: Rect, buf: &mut Buffer, styles: &Styles) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Min(1),    // chart
                Constraint::Length(1), // stats
                Constraint::Length(1), // details
                Constraint::Length(1), // padding
                Constraint::Length(1), // legend
            ])
            .split(area);

        let results = self.results();

        let (overall_duration, highest_wpm) = charting::compute_chart_params(&results.history);
        let wpm_points = results.history.wpm_series();
        let raw_points = results.history.raw_series();
        let datasets = vec![
            Dataset::default()
                .name("raw")
                .marker(ratatui::symbols::Marker::Braille)
                .style(Style::default().fg(Color::DarkGray))
                .graph_type(GraphType::Line)
                .data(&raw_points),
            Dataset::default()
                .name("wpm")
                .marker(ratatui::symbols::Marker::Braille)
                .style(Style::default().fg(Color::Magenta))
                .graph_type(GraphType::Line)
                .data(&wpm_points),
        ];

        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("seconds")
                    .bounds([1.0, overall_duration])
                    .labels(vec![
                        Span::styled("1", styles.bold),
                        Span::styled(charting::format_label(overall_duration), styles.bold),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("wpm")
                    .bounds([0.0, highest_wpm])
                    .labels(vec![
                        Span::styled("0", styles.bold),
                        Span::styled(charting::format_label(highest_wpm), styles.bold),
                    ]),
            );

        chart.render(chunks[0], buf);

        let stats = Paragraph::new(Span::styled(
            format!(
                "{} wpm   {}% acc   {}% consistency",
                results.wpm, results.accuracy_percent, results.consistency_percent
            ),
            styles.bold,
        ))
        .alignment(Alignment::Center);

        stats.render(chunks[1], buf);

        let chars = &results.character_stats;
        let details = Paragraph::new(Span::styled(
            format!(
                "raw {}   characters {}/{}/{}/{}   time {}s   {}",
                results.raw_wpm,
                chars.correct,
                chars.incorrect,
                chars.extra,
                chars.missed,
                results.elapsed_seconds,
                self.settings_label()
            ),
            Style::default().fg(Color::Gray),
        ))
        .alignment(Alignment::Center);

        details.render(chunks[2], buf);

        let legend = Paragraph::new(Span::styled(
            "(r)etry / (m)ode / (b)ound / (l)anguage / (esc)ape",
            styles.italic,
        ));

        legend.render(chunks[4], buf);
    }
}

fn row_line<'a>(views: impl Iterator<Item = &'a WordView>, styles: &Styles) -> Line<'static> {
    let mut spans = Vec::new();
    // a fully typed current word puts the cursor on the separator after it
    let mut cursor_after = false;
    for (i, view) in views.enumerate() {
        if i > 0 {
            spans.push(separator(cursor_after, styles));
        }
        spans.extend(word_spans(view, styles));
        cursor_after = view.state == WordState::Current
            && view.glyphs.iter().all(|g| g.state != CharState::Missed);
    }
    if cursor_after {
        spans.push(separator(true, styles));
    }
    Line::from(spans)
}

fn separator(is_cursor: bool, styles: &Styles) -> Span<'static> {
    if is_cursor {
        Span::styled(" ", styles.cursor)
    } else {
        Span::raw(" ")
    }
}

/// Styled characters of one word; extra typed characters are not shown so the
/// passage never reflows while typing.
fn word_spans(view: &WordView, styles: &Styles) -> Vec<Span<'static>> {
    let cursor = match view.state {
        WordState::Current => view.glyphs.iter().position(|g| g.state == CharState::Missed),
        _ => None,
    };

    view.glyphs
        .iter()
        .enumerate()
        .filter(|(_, glyph)| glyph.state != CharState::Extra)
        .map(|(idx, glyph)| {
            Span::styled(
                glyph.ch.to_string(),
                styles.glyph(view, glyph, cursor == Some(idx)),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Config, ModeKind},
        language::FixedPassageSource,
    };
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::time::{Duration, Instant};

    fn create_test_app(prompt: &str, config: Config) -> App {
        App::new(config, Box::new(FixedPassageSource::new(prompt)))
    }

    fn type_str(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), now);
        }
    }

    fn render(app: &mut App, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        if app.state == AppState::Typing {
            app.sync_layout(passage_width(width));
        }
        (&*app).render(area, &mut buffer);
        buffer
    }

    fn rendered_lines(buffer: &Buffer) -> Vec<String> {
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect()
    }

    fn find(buffer: &Buffer, needle: &str) -> Option<(u16, u16)> {
        rendered_lines(buffer)
            .iter()
            .enumerate()
            .find_map(|(y, line)| line.find(needle).map(|x| (x as u16, y as u16)))
    }

    #[test]
    fn test_ui_typing_shows_passage_and_counter() {
        let mut app = create_test_app("hello world", Config::default());

        let buffer = render(&mut app, 80, 24);

        assert!(find(&buffer, "hello world").is_some());
        assert!(find(&buffer, "0/2").is_some());
        assert!(find(&buffer, "words 25   amharic").is_some());
    }

    #[test]
    fn test_ui_timed_counter() {
        let config = Config {
            mode: ModeKind::Time,
            number_of_secs: 60,
            ..Config::default()
        };
        let mut app = create_test_app("hello world", config);

        let buffer = render(&mut app, 80, 24);

        assert!(find(&buffer, "60s").is_some());
    }

    #[test]
    fn test_ui_glyph_styles() {
        let mut app = create_test_app("hello world", Config::default());
        type_str(&mut app, "hx", Instant::now());

        let buffer = render(&mut app, 80, 24);
        let (x, y) = find(&buffer, "hello").unwrap();

        assert_eq!(buffer[(x, y)].fg, Color::White);
        assert_eq!(buffer[(x + 1, y)].fg, Color::Red);
        assert!(buffer[(x + 2, y)].modifier.contains(Modifier::UNDERLINED));
        assert!(buffer[(x + 3, y)].modifier.contains(Modifier::DIM));
    }

    #[test]
    fn test_ui_cursor_follows_fully_typed_word() {
        let mut app = create_test_app("ab cd", Config::default());
        type_str(&mut app, "ab", Instant::now());

        let buffer = render(&mut app, 80, 24);
        let (x, y) = find(&buffer, "ab cd").unwrap();

        assert!(!buffer[(x + 1, y)].modifier.contains(Modifier::UNDERLINED));
        assert!(buffer[(x + 2, y)].modifier.contains(Modifier::UNDERLINED));
        assert!(!buffer[(x + 3, y)].modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_ui_cursor_after_last_word_of_row() {
        let mut app = create_test_app("ab cd", Config::default());
        type_str(&mut app, "ab", Instant::now());
        let views = word_views(app.session.passage().words(), app.session.input());

        // "ab" alone on its row
        let line = row_line(views[..1].iter(), &Styles::new());

        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans.last().map(|s| s.style), Some(Styles::new().cursor));
    }

    #[test]
    fn test_ui_extra_chars_are_hidden() {
        let mut app = create_test_app("ab cd", Config::default());
        type_str(&mut app, "abzz", Instant::now());

        let buffer = render(&mut app, 80, 24);

        assert!(find(&buffer, "ab cd").is_some());
        assert!(find(&buffer, "zz").is_none());
    }

    #[test]
    fn test_ui_rows_are_double_spaced_and_scroll() {
        // 10 columns of passage: one word per row
        let mut app = create_test_app("aaaaaa bbbbbb cccccc dddddd eeeeee", Config::default());
        let now = Instant::now();

        let buffer = render(&mut app, 20, 24);
        let (_, a) = find(&buffer, "aaaaaa").unwrap();
        let (_, b) = find(&buffer, "bbbbbb").unwrap();
        assert_eq!(b - a, LINE_HEIGHT);
        assert!(find(&buffer, "dddddd").is_none());

        type_str(&mut app, "aaaaaa bbbbbb cccccc ", now);
        let buffer = render(&mut app, 20, 24);
        assert!(find(&buffer, "aaaaaa").is_none());
        assert_eq!(find(&buffer, "bbbbbb").map(|(_, y)| y), Some(a));
        assert!(find(&buffer, "dddddd").is_some());
    }

    #[test]
    fn test_ui_results() {
        let mut app = create_test_app("ab cd", Config::default());
        let t0 = Instant::now();
        type_str(&mut app, "a", t0);
        type_str(&mut app, "x cd", t0 + Duration::from_secs(6));
        assert_eq!(app.state, AppState::Results);

        let buffer = render(&mut app, 100, 24);

        assert!(find(&buffer, "10 wpm").is_some());
        assert!(find(&buffer, "80% acc").is_some());
        assert!(find(&buffer, "characters 4/1/0/0").is_some());
        assert!(find(&buffer, "time 6s").is_some());
        assert!(find(&buffer, "(r)etry").is_some());
    }

    #[test]
    fn test_ui_widget_small_area() {
        let mut app = create_test_app("hello world", Config::default());

        render(&mut app, 5, 3);
    }

    #[test]
    fn test_ui_widget_extreme_sizes() {
        for (w, h) in [(1, 1), (200, 60), (12, 4)] {
            let mut app = create_test_app("the of and people", Config::default());
            render(&mut app, w, h);
            type_str(&mut app, "the of and people", Instant::now());
            render(&mut app, w, h);
        }
    }

    #[test]
    fn test_ui_amharic_passage() {
        let mut app = create_test_app("ሰላም ነው", Config::default());

        let buffer = render(&mut app, 80, 24);
        let text = rendered_lines(&buffer).concat();

        assert!(text.contains('ሰ'));
        assert!(text.contains('ነ'));
    }

    #[test]
    fn test_passage_width_respects_margins() {
        assert_eq!(passage_width(80), 70);
        assert_eq!(passage_width(4), 1);
    }
}
