use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::config::{
    GridSize, Theme, GLYPH_CELL, GLYPH_FOOD, GLYPH_SPECIAL_FOOD, SPECIAL_FOOD_BLINK_TICKS,
};
use crate::controller::Snapshot;
use crate::food::SpecialFood;
use crate::snake::Position;
use crate::ui::hud::{render_hud, HudInfo, HUD_HEIGHT};
use crate::ui::menu::{render_game_over_menu, render_pause_menu};

/// Terminal columns used by one board cell.
const CELL_WIDTH: u16 = 2;

/// Renders the full game frame from an immutable snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot<'_>, hud_info: &HudInfo<'_>) {
    let theme = hud_info.theme;
    let (board_area, hud_area) = split_screen(frame.area(), snapshot.bounds);

    let block = Block::bordered().border_style(Style::new().fg(theme.border_fg));
    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    render_board(frame, inner, snapshot.bounds, theme);
    render_food(frame, inner, snapshot, theme);
    render_snake(frame, inner, snapshot, theme);
    render_hud(frame, hud_area, hud_info);

    if snapshot.terminated {
        render_game_over_menu(frame, board_area, hud_info, snapshot.death_reason);
    } else if snapshot.paused {
        render_pause_menu(frame, board_area, theme);
    }
}

/// Centers the board plus HUD rows in `area`.
fn split_screen(area: Rect, bounds: GridSize) -> (Rect, Rect) {
    let board_width = bounds.width.saturating_mul(CELL_WIDTH).saturating_add(2);
    let board_height = bounds.height.saturating_add(2);

    let [column] = Layout::horizontal([Constraint::Length(board_width)])
        .flex(Flex::Center)
        .areas(area);
    let [board, hud] = Layout::vertical([
        Constraint::Length(board_height),
        Constraint::Length(HUD_HEIGHT),
    ])
    .flex(Flex::Center)
    .areas(column);

    (board, hud)
}

fn render_board(frame: &mut Frame<'_>, inner: Rect, bounds: GridSize, theme: &Theme) {
    let buffer = frame.buffer_mut();
    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let Some((col, row)) = logical_to_terminal(inner, bounds, Position { x, y }) else {
                continue;
            };
            let bg = if (x + y) % 2 == 0 {
                theme.board_even
            } else {
                theme.board_odd
            };
            buffer.set_string(col, row, "  ", Style::new().bg(bg));
        }
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot<'_>, theme: &Theme) {
    let bounds = snapshot.bounds;
    let buffer = frame.buffer_mut();

    if let Some((x, y)) = logical_to_terminal(inner, bounds, snapshot.food) {
        buffer.set_string(
            x,
            y,
            GLYPH_FOOD,
            Style::new().fg(theme.food).add_modifier(Modifier::BOLD),
        );
    }

    let Some(special) = snapshot.special_food else {
        return;
    };
    if !special_food_visible(special) {
        return;
    }
    if let Some((x, y)) = logical_to_terminal(inner, bounds, special.position) {
        let color = special_food_color(special, theme);
        buffer.set_string(
            x,
            y,
            GLYPH_SPECIAL_FOOD,
            Style::new().fg(color).add_modifier(Modifier::BOLD),
        );
    }
}

/// Special food blinks shortly before expiring: two ticks shown, two hidden.
fn special_food_visible(special: SpecialFood) -> bool {
    special.ttl_ticks > SPECIAL_FOOD_BLINK_TICKS || (special.ttl_ticks / 2) % 2 == 0
}

/// Alternates between the two special colors every tick.
fn special_food_color(special: SpecialFood, theme: &Theme) -> Color {
    if special.ttl_ticks % 2 == 0 {
        theme.special_food
    } else {
        theme.special_food_alt
    }
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot<'_>, theme: &Theme) {
    let head = snapshot.snake.head();
    let buffer = frame.buffer_mut();

    for segment in snapshot.snake.segments() {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.bounds, *segment) else {
            continue;
        };

        let style = if *segment == head {
            Style::new().fg(theme.snake_head)
        } else {
            Style::new().fg(theme.snake_body)
        };
        buffer.set_string(x, y, GLYPH_CELL, style);
    }
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
