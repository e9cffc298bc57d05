use std::time::Duration;

use log::{debug, info};

use crate::config::{
    Difficulty, GridSize, MIN_TICK_INTERVAL_MS, POINTS_PER_SPEED_UP, TICK_INTERVAL_STEP_MS,
};
use crate::food::{FoodKind, SpecialFood};
use crate::game::{DeathReason, GameState, StepOutcome};
use crate::input::{direction_change_is_valid, Direction, GameInput};
use crate::snake::{Position, Snake};

/// What a scheduler tick did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickReport {
    /// Paused or game over; nothing advanced.
    Idle,
    Moved { eaten: Option<FoodKind> },
    GameOver(DeathReason),
}

/// Read-only view handed to the renderer once per frame.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub snake: &'a Snake,
    pub food: Position,
    pub special_food: Option<SpecialFood>,
    pub direction: Direction,
    pub terminated: bool,
    pub death_reason: Option<DeathReason>,
    pub paused: bool,
    pub bounds: GridSize,
}

/// Session policy around one [`GameState`]: scoring, speed, pause and restart.
#[derive(Debug, Clone)]
pub struct GameController {
    state: GameState,
    pending_direction: Option<Direction>,
    score: u32,
    high_score: u32,
    tick_interval: Duration,
    difficulty: Difficulty,
    paused: bool,
}

impl GameController {
    #[must_use]
    pub fn new(state: GameState, difficulty: Difficulty) -> Self {
        info!("new session: difficulty {}", difficulty.label());

        Self {
            state,
            pending_direction: None,
            score: 0,
            high_score: 0,
            tick_interval: difficulty.tick_interval(),
            difficulty,
            paused: false,
        }
    }

    /// Advances the game by one scheduler tick.
    pub fn tick(&mut self) -> TickReport {
        if self.paused || self.state.is_terminated() {
            return TickReport::Idle;
        }

        let requested = self
            .pending_direction
            .take()
            .unwrap_or_else(|| self.state.snake.direction());

        match self.state.step(requested) {
            StepOutcome::Continuing { eaten } => {
                if let Some(kind) = eaten {
                    self.award(kind);
                }
                TickReport::Moved { eaten }
            }
            StepOutcome::Terminated(reason) => {
                info!(
                    "game over ({reason:?}): score {}, high score {}",
                    self.score, self.high_score
                );
                TickReport::GameOver(reason)
            }
        }
    }

    /// Applies one external input event. `Quit` is left to the caller.
    pub fn handle_input(&mut self, input: GameInput) {
        match input {
            GameInput::Direction(direction) => self.request_direction(direction),
            GameInput::Pause => self.toggle_pause(),
            GameInput::Restart => self.restart(),
            GameInput::Difficulty(difficulty) => self.set_difficulty(difficulty),
            GameInput::Quit => {}
        }
    }

    /// Buffers a turn for the next tick; the last accepted request wins.
    pub fn request_direction(&mut self, direction: Direction) {
        if self.paused || self.state.is_terminated() {
            return;
        }

        if direction_change_is_valid(self.state.snake.direction(), direction) {
            self.pending_direction = Some(direction);
        }
    }

    /// Suspends or resumes ticking. Has no effect once the game is over.
    pub fn toggle_pause(&mut self) {
        if self.state.is_terminated() {
            return;
        }

        self.paused = !self.paused;
        debug!("{}", if self.paused { "paused" } else { "resumed" });
    }

    /// Starts a new session. The high score and difficulty carry over.
    pub fn restart(&mut self) {
        self.state.initialize();
        self.pending_direction = None;
        self.score = 0;
        self.paused = false;
        self.tick_interval = self.difficulty.tick_interval();
        info!(
            "restart: difficulty {}, high score {}",
            self.difficulty.label(),
            self.high_score
        );
    }

    /// Switches preset and rewrites the current interval immediately.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.tick_interval = difficulty.tick_interval();
        info!(
            "difficulty {}: tick interval {} ms",
            difficulty.label(),
            self.tick_interval.as_millis()
        );
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            snake: &self.state.snake,
            food: self.state.food.position,
            special_food: self.state.special_food,
            direction: self.state.snake.direction(),
            terminated: self.state.is_terminated(),
            death_reason: self.state.death_reason,
            paused: self.paused,
            bounds: self.state.bounds(),
        }
    }

    /// Text for the status readout.
    #[must_use]
    pub fn status_line(&self) -> String {
        if self.state.is_terminated() {
            format!(
                "Game Over! Score: {} | High Score: {} | Press SPACE to restart",
                self.score, self.high_score
            )
        } else {
            format!("Score: {} | High Score: {}", self.score, self.high_score)
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    fn award(&mut self, kind: FoodKind) {
        self.score += kind.points();
        self.high_score = self.high_score.max(self.score);

        if self.score % POINTS_PER_SPEED_UP == 0 {
            self.speed_up();
        }
    }

    fn speed_up(&mut self) {
        let min = Duration::from_millis(MIN_TICK_INTERVAL_MS);
        if self.tick_interval <= min {
            return;
        }

        self.tick_interval = self
            .tick_interval
            .saturating_sub(Duration::from_millis(TICK_INTERVAL_STEP_MS))
            .max(min);
        debug!(
            "score {}: tick interval now {} ms",
            self.score,
            self.tick_interval.as_millis()
        );
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::{Difficulty, DEFAULT_GRID};
    use crate::food::{Food, SpecialFood};
    use crate::game::{DeathReason, GameState};
    use crate::input::{Direction, GameInput};
    use crate::snake::{Position, Snake};

    use super::{GameController, TickReport};

    fn controller(seed: u64) -> GameController {
        GameController::new(GameState::new_with_seed(DEFAULT_GRID, seed), Difficulty::Easy)
    }

    fn place(controller: &mut GameController, segments: Vec<Position>, direction: Direction) {
        let state = controller.state_mut();
        state.snake = Snake::from_segments(segments, direction);
        state.food = Food::new(Position::new(0, 0));
        state.special_food = None;
    }

    /// Puts food right in front of the head and ticks once.
    fn eat_food_ahead(controller: &mut GameController) -> TickReport {
        let state = controller.state_mut();
        let ahead = state.snake.head().stepped(state.snake.direction());
        state.food = Food::new(ahead);
        state.special_food = None;
        controller.tick()
    }

    #[test]
    fn normal_food_scores_ten_and_tracks_high_score() {
        let mut controller = controller(1);
        place(
            &mut controller,
            vec![Position::new(2, 2), Position::new(1, 2), Position::new(0, 2)],
            Direction::Right,
        );

        eat_food_ahead(&mut controller);

        assert_eq!(controller.score(), 10);
        assert_eq!(controller.high_score(), 10);
        assert_eq!(controller.status_line(), "Score: 10 | High Score: 10");
    }

    #[test]
    fn special_food_scores_thirty() {
        let mut controller = controller(2);
        place(
            &mut controller,
            vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)],
            Direction::Right,
        );
        controller.state_mut().special_food = Some(SpecialFood::new(Position::new(6, 5)));

        controller.tick();

        assert_eq!(controller.score(), 30);
    }

    #[test]
    fn speed_increases_once_when_score_hits_fifty() {
        let mut controller = controller(3);
        place(
            &mut controller,
            vec![Position::new(2, 2), Position::new(1, 2), Position::new(0, 2)],
            Direction::Right,
        );

        for _ in 0..4 {
            eat_food_ahead(&mut controller);
        }
        assert_eq!(controller.score(), 40);
        assert_eq!(controller.tick_interval(), Duration::from_millis(120));

        eat_food_ahead(&mut controller);
        assert_eq!(controller.score(), 50);
        assert_eq!(controller.tick_interval(), Duration::from_millis(110));

        controller.tick();
        assert_eq!(controller.tick_interval(), Duration::from_millis(110));
    }

    #[test]
    fn speed_never_drops_below_minimum() {
        let mut controller = controller(4);
        place(
            &mut controller,
            vec![Position::new(2, 1), Position::new(1, 1), Position::new(0, 1)],
            Direction::Right,
        );
        controller.set_difficulty(Difficulty::Hard);

        for _ in 0..15 {
            eat_food_ahead(&mut controller);
        }
        controller.state_mut().snake = Snake::from_segments(
            vec![Position::new(2, 3), Position::new(1, 3), Position::new(0, 3)],
            Direction::Right,
        );
        for _ in 0..15 {
            eat_food_ahead(&mut controller);
        }

        assert_eq!(controller.score(), 300);
        assert_eq!(controller.tick_interval(), Duration::from_millis(50));
    }

    #[test]
    fn reversal_input_is_not_buffered() {
        let mut controller = controller(5);
        place(
            &mut controller,
            vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)],
            Direction::Right,
        );

        controller.handle_input(GameInput::Direction(Direction::Left));
        controller.tick();

        assert_eq!(controller.state().snake.head(), Position::new(6, 5));
    }

    #[test]
    fn last_direction_before_tick_wins() {
        let mut controller = controller(6);
        place(
            &mut controller,
            vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)],
            Direction::Right,
        );

        controller.handle_input(GameInput::Direction(Direction::Up));
        controller.handle_input(GameInput::Direction(Direction::Down));
        controller.tick();

        assert_eq!(controller.state().snake.head(), Position::new(5, 6));
    }

    #[test]
    fn pause_suspends_ticks_and_resume_continues() {
        let mut controller = controller(7);
        place(
            &mut controller,
            vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)],
            Direction::Right,
        );

        controller.handle_input(GameInput::Pause);
        assert!(controller.is_paused());
        assert_eq!(controller.tick(), TickReport::Idle);
        assert_eq!(controller.state().snake.head(), Position::new(5, 5));

        controller.handle_input(GameInput::Pause);
        assert_eq!(controller.tick(), TickReport::Moved { eaten: None });
        assert_eq!(controller.state().snake.head(), Position::new(6, 5));
    }

    #[test]
    fn game_over_then_restart_keeps_high_score() {
        let mut controller = controller(8);
        place(
            &mut controller,
            vec![Position::new(17, 5), Position::new(16, 5), Position::new(15, 5)],
            Direction::Right,
        );

        eat_food_ahead(&mut controller);
        controller.state_mut().food = Food::new(Position::new(0, 0));
        controller.state_mut().special_food = None;
        controller.tick();
        assert_eq!(
            controller.tick(),
            TickReport::GameOver(DeathReason::WallCollision)
        );
        assert_eq!(controller.tick(), TickReport::Idle);
        assert_eq!(
            controller.status_line(),
            "Game Over! Score: 10 | High Score: 10 | Press SPACE to restart"
        );

        controller.handle_input(GameInput::Restart);

        assert_eq!(controller.score(), 0);
        assert_eq!(controller.high_score(), 10);
        assert!(!controller.state().is_terminated());
        assert_eq!(controller.state().snake.head(), Position::new(10, 10));
    }

    #[test]
    fn difficulty_change_applies_immediately_and_survives_restart() {
        let mut controller = controller(9);

        controller.handle_input(GameInput::Difficulty(Difficulty::Medium));
        assert_eq!(controller.tick_interval(), Duration::from_millis(110));

        controller.restart();
        assert_eq!(controller.difficulty(), Difficulty::Medium);
        assert_eq!(controller.tick_interval(), Duration::from_millis(110));
    }
}
