use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{GridSize, INITIAL_SNAKE_LENGTH, SPECIAL_FOOD_SPAWN_ODDS};
use crate::food::{Food, FoodKind, SpecialFood};
use crate::input::Direction;
use crate::snake::{Position, Snake};

/// Whether the session can still advance.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Running,
    Terminated,
}

/// What ended a session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

/// Result of advancing the simulation by one tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StepOutcome {
    Continuing { eaten: Option<FoodKind> },
    Terminated(DeathReason),
}

impl StepOutcome {
    /// True when this step consumed either kind of food.
    #[must_use]
    pub fn ate_food(self) -> bool {
        matches!(self, Self::Continuing { eaten: Some(_) })
    }
}

/// Authoritative simulation of one game session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub food: Food,
    pub special_food: Option<SpecialFood>,
    pub status: GameStatus,
    pub death_reason: Option<DeathReason>,
    ate_food: bool,
    bounds: GridSize,
    rng: StdRng,
}

impl GameState {
    /// Creates a freshly initialized session seeded from OS entropy.
    #[must_use]
    pub fn new(bounds: GridSize) -> Self {
        Self::with_rng(bounds, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    #[must_use]
    pub fn new_with_seed(bounds: GridSize, seed: u64) -> Self {
        Self::with_rng(bounds, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bounds: GridSize, mut rng: StdRng) -> Self {
        let snake = starting_snake(bounds);
        let food = Food::spawn(&mut rng, bounds, &snake, &[]);

        Self {
            snake,
            food,
            special_food: None,
            status: GameStatus::Running,
            death_reason: None,
            ate_food: false,
            bounds,
            rng,
        }
    }

    /// Resets the session: centered three-cell snake heading right, fresh
    /// food, no special food. The RNG stream carries on.
    pub fn initialize(&mut self) {
        self.snake = starting_snake(self.bounds);
        self.food = Food::spawn(&mut self.rng, self.bounds, &self.snake, &[]);
        self.special_food = None;
        self.status = GameStatus::Running;
        self.death_reason = None;
        self.ate_food = false;
    }

    /// Advances the simulation by exactly one tick.
    ///
    /// `requested` is ignored when it would reverse the current heading.
    /// A collision leaves the board untouched and makes the state terminal;
    /// further calls keep reporting the same outcome until [`initialize`].
    ///
    /// [`initialize`]: GameState::initialize
    pub fn step(&mut self, requested: Direction) -> StepOutcome {
        if let Some(reason) = self.death_reason {
            return StepOutcome::Terminated(reason);
        }

        self.ate_food = false;

        let direction = self.snake.direction().steer(requested);
        let next_head = self.snake.head().stepped(direction);

        if !next_head.is_within_bounds(self.bounds) {
            return self.terminate(DeathReason::WallCollision);
        }

        // The tail has not moved yet, so entering its cell counts as a hit.
        if self.snake.occupies(next_head) {
            return self.terminate(DeathReason::SelfCollision);
        }

        let eaten = if next_head == self.food.position {
            self.respawn_food(next_head);
            Some(FoodKind::Normal)
        } else if self
            .special_food
            .is_some_and(|special| special.position == next_head)
        {
            debug!("special food eaten at {next_head:?}");
            self.special_food = None;
            Some(FoodKind::Special)
        } else {
            None
        };

        self.ate_food = eaten.is_some();
        self.snake.advance(next_head, direction, self.ate_food);
        self.tick_special_food();

        StepOutcome::Continuing { eaten }
    }

    /// True when the last step consumed food.
    #[must_use]
    pub fn ate_food(&self) -> bool {
        self.ate_food
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.status == GameStatus::Terminated
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    fn terminate(&mut self, reason: DeathReason) -> StepOutcome {
        self.status = GameStatus::Terminated;
        self.death_reason = Some(reason);
        StepOutcome::Terminated(reason)
    }

    /// Replaces eaten food and rolls for a special food.
    ///
    /// `entered` is about to become the head, so it is excluded alongside the
    /// current body.
    fn respawn_food(&mut self, entered: Position) {
        let mut blocked = vec![entered];
        blocked.extend(self.special_food.map(|special| special.position));
        self.food = Food::spawn(&mut self.rng, self.bounds, &self.snake, &blocked);

        let roll = self.rng.gen_range(0..SPECIAL_FOOD_SPAWN_ODDS);
        if roll == 0 && self.special_food.is_none() {
            let special = SpecialFood::spawn(
                &mut self.rng,
                self.bounds,
                &self.snake,
                &[entered, self.food.position],
            );
            debug!("special food spawned at {:?}", special.position);
            self.special_food = Some(special);
        }
    }

    fn tick_special_food(&mut self) {
        let Some(special) = self.special_food.as_mut() else {
            return;
        };

        if special.tick_ttl() {
            debug!("special food at {:?} expired", special.position);
            self.special_food = None;
        }
    }
}

fn starting_snake(bounds: GridSize) -> Snake {
    let head = Position {
        x: i32::from(bounds.width / 2),
        y: i32::from(bounds.height / 2),
    };
    Snake::new(head, INITIAL_SNAKE_LENGTH, Direction::Right)
}
