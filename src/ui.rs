pub mod ranking;
pub mod screen;

use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, Tone},
    celebration::Celebration,
    difficulty::Difficulty,
    ranking::RANKING_DISPLAY,
    round::{Resolution, RoundState},
    session::MAX_PLAYER_NAME,
    util::format_elapsed,
};

const HORIZONTAL_MARGIN: u16 = 3;
const VERTICAL_MARGIN: u16 = 1;

const PRIMARY: Color = Color::Rgb(41, 128, 185);
const SUCCESS: Color = Color::Rgb(39, 174, 96);
const WARNING: Color = Color::Rgb(243, 156, 18);
const DANGER: Color = Color::Rgb(231, 76, 60);

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Neutral => Color::Gray,
        Tone::Info => PRIMARY,
        Tone::Success => SUCCESS,
        Tone::Warning => WARNING,
        Tone::Danger => DANGER,
    }
}

/// What the big box in the middle shows for a round state
pub fn target_face(state: RoundState, difficulty: Difficulty) -> (String, Color) {
    match state {
        RoundState::Idle => ("🎯".to_string(), PRIMARY),
        RoundState::ArmedWaiting { .. } => ("⏳".to_string(), WARNING),
        RoundState::KeyShown { target, .. } => (target.to_string(), PRIMARY),
        RoundState::Resolved(Resolution::Hit { elapsed, .. })
            if elapsed.as_millis() as u64 <= difficulty.timeout_ms() =>
        {
            ("🎯".to_string(), SUCCESS)
        }
        RoundState::Resolved(Resolution::Hit { .. }) => ("😴".to_string(), WARNING),
        RoundState::Resolved(Resolution::Timeout { .. }) => ("💥".to_string(), DANGER),
    }
}

/// Readout text and color; turns amber past the difficulty's warning mark
pub fn readout(elapsed: Option<Duration>, difficulty: Difficulty) -> (String, Color) {
    match elapsed {
        None => (format_elapsed(Duration::ZERO), Color::Gray),
        Some(e) if e.as_millis() as u64 > difficulty.warning_ms() => (format_elapsed(e), WARNING),
        Some(e) => (format_elapsed(e), Color::White),
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let round = session.round();
        let round_difficulty = if round.is_running() || round.target().is_some() {
            round.difficulty()
        } else {
            session.difficulty()
        };

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),                          // instruction
                Constraint::Min(3),                             // target
                Constraint::Length(3),                          // readout
                Constraint::Length(1),                          // status
                Constraint::Length(1),                          // player / difficulty / best
                Constraint::Length(1),                          // session stats
                Constraint::Length(RANKING_DISPLAY as u16 + 3), // ranking
                Constraint::Length(1),                          // legend
            ])
            .split(area);

        Paragraph::new(Span::styled(self.instruction.as_str(), bold_style))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let (face, face_color) = target_face(round.state(), round_difficulty);
        let target_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(face_color));
        let inner = target_block.inner(chunks[1]);
        target_block.render(chunks[1], buf);
        let [face_row] = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::Center)
            .areas(inner);
        Paragraph::new(Span::styled(
            face,
            Style::default().fg(face_color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(face_row, buf);

        let (readout_text, readout_color) =
            readout(round.live_elapsed(self.now), round_difficulty);
        let [readout_area] = Layout::horizontal([Constraint::Length(14)])
            .flex(Flex::Center)
            .areas(chunks[2]);
        Paragraph::new(Span::styled(
            readout_text,
            Style::default().fg(readout_color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(readout_color)),
        )
        .render(readout_area, buf);

        Paragraph::new(Span::styled(
            self.status.text.as_str(),
            Style::default()
                .fg(tone_color(self.status.tone))
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        player_line(self).render(chunks[4], buf);

        let stats = session.stats();
        if stats.rounds > 0 {
            let mut text = format!(
                "rounds {}   hits {}   timeouts {}",
                stats.rounds,
                stats.hits(),
                stats.timeouts
            );
            if let (Some(mean), Some(sd)) = (stats.mean(), stats.std_dev()) {
                text.push_str(&format!("   avg {mean:.0} ms   sd {sd:.1}"));
            }
            Paragraph::new(Span::styled(
                text,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);
        }

        ranking::render_ranking(
            session.ranking().top(RANKING_DISPLAY),
            session.player(),
            chunks[6],
            buf,
        );

        let legend = if round.is_running() {
            "press the key shown / (esc) cancel round"
        } else {
            "(enter) start / (←/→) difficulty / (p)layer / (c)lear ranking / (esc)ape"
        };
        Paragraph::new(Span::styled(legend, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[7], buf);

        if self.celebration.is_active() {
            render_sparks(&self.celebration, area, buf);
        }
    }
}

fn player_line(app: &App) -> Paragraph<'static> {
    let difficulty = app.session.difficulty();
    let mut spans = vec![];

    match app.session.player() {
        Some(name) => spans.push(Span::styled(
            format!("👤 {name}"),
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
        )),
        None => spans.push(Span::raw("👤 --")),
    }
    spans.push(Span::raw("   "));
    spans.push(Span::styled(
        format!("◂ {difficulty} ▸"),
        Style::default()
            .fg(difficulty.color())
            .add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::raw("   "));

    match (app.session.player(), app.session.best_time()) {
        (Some(_), Some(best)) => spans.push(Span::styled(
            format!("🏆 Best: {best} ms"),
            Style::default().fg(SUCCESS),
        )),
        (Some(_), None) => spans.push(Span::styled(
            "Try to set a good time!",
            Style::default().fg(difficulty.color()),
        )),
        (None, _) => spans.push(Span::raw("Best: --")),
    }

    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

/// A `width` x `height` rect centered in `area`, clamped to fit
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

pub fn render_name_prompt(app: &App, area: Rect, buf: &mut Buffer) {
    let width = (app.name_input.width() as u16 + 8).max(36);
    let popup = centered_rect(width, 6, area);
    Clear.render(popup, buf);

    let text = vec![
        Line::from(vec![
            Span::styled(
                app.name_input.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled("█", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "(enter) confirm / (esc) cancel",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];

    Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(PRIMARY))
                .title(format!(" 👤 Player name (max {MAX_PLAYER_NAME}) ")),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .render(popup, buf);
}

pub fn render_confirm_clear(area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(44, 5, area);
    Clear.render(popup, buf);

    Paragraph::new(vec![
        Line::from("Clear the whole ranking?"),
        Line::from(""),
        Line::from(Span::styled(
            "(y)es / (n)o",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(WARNING))
            .title(" Confirm "),
    )
    .alignment(Alignment::Center)
    .render(popup, buf);
}

fn render_sparks(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::LightRed,
        Color::LightYellow,
    ];

    for spark in &celebration.sparks {
        if spark.x < 0.0 || spark.y < 0.0 {
            continue;
        }
        let (x, y) = (spark.x as u16, spark.y as u16);
        if x >= area.width || y >= area.height {
            continue;
        }

        let color = colors[spark.color_index % colors.len()];
        let style = match spark.brightness() {
            b if b > 0.6 => Style::default().fg(color).add_modifier(Modifier::BOLD),
            b if b > 0.25 => Style::default().fg(color),
            _ => Style::default().fg(color).add_modifier(Modifier::DIM),
        };

        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&spark.glyph.to_string());
            cell.set_style(style);
        }
    }
}
