use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;

use crate::config::Theme;
use crate::game::DeathReason;
use crate::ui::hud::HudInfo;

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let popup = centered_popup(area, 24, 6);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("PAUSED").style(
            Style::default()
                .fg(theme.menu_title)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from("[P] Resume"),
        Line::from("[Q] Quit").style(Style::default().fg(theme.menu_footer)),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" pause ")),
        popup,
    );
}

/// Draws the game-over screen as a centered popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    info: &HudInfo<'_>,
    death_reason: Option<DeathReason>,
) {
    let popup = centered_popup(area, 30, 9);
    frame.render_widget(Clear, popup);

    let is_new_high = info.score > 0 && info.score == info.high_score;
    let lines = vec![
        Line::from("GAME OVER").style(
            Style::default()
                .fg(info.theme.menu_title)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(format!("Score: {}", info.score)),
        Line::from(format!("High score: {}", info.high_score)),
        Line::from(match death_reason {
            Some(DeathReason::WallCollision) => "Cause: hit wall",
            Some(DeathReason::SelfCollision) => "Cause: hit yourself",
            None => "",
        }),
        Line::from(if is_new_high { "New high score!" } else { "" }),
        Line::from("[Space] Play again  [Q] Quit")
            .style(Style::default().fg(info.theme.menu_footer)),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [center] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);

    center
}
