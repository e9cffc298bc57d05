use std::time::Duration;

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

use crate::config::{Difficulty, Theme};

/// Rows taken by the HUD below the board.
pub const HUD_HEIGHT: u16 = 2;

/// Values displayed by the HUD rows.
#[derive(Debug, Clone)]
pub struct HudInfo<'a> {
    /// Status readout from the controller ("Score: … | High Score: …").
    pub status_line: String,
    pub score: u32,
    pub high_score: u32,
    pub difficulty: Difficulty,
    pub tick_interval: Duration,
    pub snake_length: usize,
    pub theme: &'a Theme,
}

/// Renders the status row and the settings row.
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, info: &HudInfo<'_>) {
    let [status_area, settings_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    let status = truncate_to_width(&info.status_line, usize::from(status_area.width));
    frame.render_widget(
        Paragraph::new(Line::from(status))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(info.theme.hud_text)
                    .add_modifier(Modifier::BOLD),
            ),
        status_area,
    );

    frame.render_widget(
        Paragraph::new(settings_line(info)).alignment(Alignment::Center),
        settings_area,
    );
}

fn settings_line(info: &HudInfo<'_>) -> Line<'static> {
    let accent = Style::default().fg(info.theme.hud_accent);
    let muted = Style::default().fg(info.theme.menu_footer);

    let mut spans = Vec::new();
    for (index, difficulty) in Difficulty::ALL.into_iter().enumerate() {
        let label = format!("{}:{}", index + 1, difficulty.label());
        let style = if difficulty == info.difficulty {
            accent.add_modifier(Modifier::BOLD)
        } else {
            muted
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }

    spans.push(Span::styled("│ ", muted));
    spans.push(Span::styled(
        format!("{} ms", info.tick_interval.as_millis()),
        accent,
    ));
    spans.push(Span::styled(" │ len ", muted));
    spans.push(Span::styled(info.snake_length.to_string(), accent));
    spans.push(Span::styled(" │ P pause  Q quit", muted));

    Line::from(spans)
}

/// Cuts `text` so its display width fits `max_width` columns.
fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::with_capacity(text.len());

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            break;
        }
        width += ch_width;
        out.push(ch);
    }

    out
}
