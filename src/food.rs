use rand::Rng;

use crate::config::{
    GridSize, FOOD_POINTS, SPECIAL_FOOD_BONUS_POINTS, SPECIAL_FOOD_LIFETIME_TICKS,
};
use crate::snake::{Position, Snake};

/// Which kind of food was eaten on a tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FoodKind {
    Normal,
    Special,
}

impl FoodKind {
    /// Returns the score value granted when eaten.
    #[must_use]
    pub fn points(self) -> u32 {
        match self {
            Self::Normal => FOOD_POINTS,
            Self::Special => FOOD_POINTS + SPECIAL_FOOD_BONUS_POINTS,
        }
    }
}

/// Ordinary food. There is always exactly one on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Food {
    pub position: Position,
}

impl Food {
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self { position }
    }

    /// Spawns food on a cell free of the snake and of `blocked`.
    #[must_use]
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        bounds: GridSize,
        snake: &Snake,
        blocked: &[Position],
    ) -> Self {
        Self::new(spawn_position(rng, bounds, snake, blocked))
    }
}

/// Bonus food that disappears after a fixed number of ticks.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SpecialFood {
    pub position: Position,
    pub ttl_ticks: u16,
}

impl SpecialFood {
    /// Creates special food with a full lifetime.
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self {
            position,
            ttl_ticks: SPECIAL_FOOD_LIFETIME_TICKS,
        }
    }

    /// Spawns special food on a cell free of the snake and of `blocked`.
    #[must_use]
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        bounds: GridSize,
        snake: &Snake,
        blocked: &[Position],
    ) -> Self {
        Self::new(spawn_position(rng, bounds, snake, blocked))
    }

    /// Advances the lifetime by one tick. Returns `true` once it has expired.
    pub fn tick_ttl(&mut self) -> bool {
        self.ttl_ticks = self.ttl_ticks.saturating_sub(1);
        self.ttl_ticks == 0
    }
}

/// Picks a uniformly random cell that is neither on the snake nor in `blocked`.
///
/// Rejection sampling: draws cells until one is free. There is no iteration
/// cap, so this never returns on a board with no free cell and slows down as
/// the board fills up.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
    blocked: &[Position],
) -> Position {
    debug_assert!(bounds.width > 0 && bounds.height > 0);

    loop {
        let candidate = Position {
            x: rng.gen_range(0..i32::from(bounds.width)),
            y: rng.gen_range(0..i32::from(bounds.height)),
        };

        if !snake.occupies(candidate) && !blocked.contains(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::{GridSize, SPECIAL_FOOD_LIFETIME_TICKS};
    use crate::input::Direction;

    use super::{spawn_position, FoodKind, SpecialFood};
    use crate::snake::{Position, Snake};

    #[test]
    fn food_spawn_never_overlaps_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        let snake = Snake::from_segments(
            vec![
                Position { x: 0, y: 0 },
                Position { x: 1, y: 0 },
                Position { x: 2, y: 0 },
            ],
            Direction::Left,
        );

        for _ in 0..100 {
            let food_position = spawn_position(
                &mut rng,
                GridSize {
                    width: 8,
                    height: 6,
                },
                &snake,
                &[],
            );
            assert!(!snake.occupies(food_position));
        }
    }

    #[test]
    fn spawn_finds_the_last_free_cell() {
        let mut rng = StdRng::seed_from_u64(11);
        let snake = Snake::from_segments(
            vec![Position::new(0, 0), Position::new(1, 0)],
            Direction::Left,
        );

        let position = spawn_position(
            &mut rng,
            GridSize {
                width: 4,
                height: 1,
            },
            &snake,
            &[Position::new(3, 0)],
        );

        assert_eq!(position, Position::new(2, 0));
    }

    #[test]
    fn special_food_ttl_decrements_and_expires() {
        let mut food = SpecialFood::new(Position { x: 1, y: 1 });

        for _ in 0..SPECIAL_FOOD_LIFETIME_TICKS - 1 {
            assert!(!food.tick_ttl());
        }

        assert!(food.tick_ttl());
    }

    #[test]
    fn special_food_is_worth_base_plus_bonus() {
        assert_eq!(FoodKind::Normal.points(), 10);
        assert_eq!(FoodKind::Special.points(), 30);
    }
}
