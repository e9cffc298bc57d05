use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR_NAME: &str = "grid-snake";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Square grid with `side` cells per axis.
    #[must_use]
    pub const fn square(side: u16) -> Self {
        Self {
            width: side,
            height: side,
        }
    }
}

/// Cells per side of the default board.
pub const GRID_SIZE: u16 = 20;

/// Board used by the game unless a test asks for something else.
pub const DEFAULT_GRID: GridSize = GridSize::square(GRID_SIZE);

/// Segment count of a freshly initialized snake.
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Points for ordinary food.
pub const FOOD_POINTS: u32 = 10;

/// Extra points special food grants on top of [`FOOD_POINTS`].
pub const SPECIAL_FOOD_BONUS_POINTS: u32 = 20;

/// Ticks a special food stays on the board before expiring.
pub const SPECIAL_FOOD_LIFETIME_TICKS: u16 = 50;

/// One-in-N chance that eating ordinary food spawns special food.
pub const SPECIAL_FOOD_SPAWN_ODDS: u32 = 5;

/// Tick interval of the easiest preset, in milliseconds.
pub const INITIAL_TICK_INTERVAL_MS: u64 = 120;

/// Amount the interval shrinks per speed-up (and between difficulty presets).
pub const TICK_INTERVAL_STEP_MS: u64 = 10;

/// Fastest allowed tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 50;

/// The game speeds up whenever the score lands on a multiple of this.
pub const POINTS_PER_SPEED_UP: u32 = 50;

/// Ticks before expiry during which special food blinks.
pub const SPECIAL_FOOD_BLINK_TICKS: u16 = 10;

/// Difficulty presets, each mapping to a fixed starting tick interval.
#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All presets in menu order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Tick interval this preset starts with.
    #[must_use]
    pub fn tick_interval(self) -> Duration {
        let steps = match self {
            Self::Easy => 0,
            Self::Medium => 1,
            Self::Hard => 2,
        };
        Duration::from_millis(INITIAL_TICK_INTERVAL_MS - TICK_INTERVAL_STEP_MS * steps)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

/// Selectable color theme name.
#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Classic,
    Ocean,
    Neon,
}

impl ThemeName {
    #[must_use]
    pub fn theme(self) -> &'static Theme {
        match self {
            Self::Classic => &THEME_CLASSIC,
            Self::Ocean => &THEME_OCEAN,
            Self::Neon => &THEME_NEON,
        }
    }
}

/// A color theme applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    /// Special food alternates between these two colors.
    pub special_food: Color,
    pub special_food_alt: Color,
    /// Checkerboard colors for empty cells.
    pub board_even: Color,
    pub board_odd: Color,
    pub border_fg: Color,
    pub hud_text: Color,
    pub hud_accent: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

/// Green snake on a dark checkerboard.
pub const THEME_CLASSIC: Theme = Theme {
    name: "Classic",
    snake_head: Color::Rgb(50, 205, 50),
    snake_body: Color::Green,
    food: Color::Red,
    special_food: Color::Magenta,
    special_food_alt: Color::Yellow,
    board_even: Color::Rgb(0, 20, 0),
    board_odd: Color::Rgb(0, 30, 0),
    border_fg: Color::Gray,
    hud_text: Color::White,
    hud_accent: Color::Green,
    menu_title: Color::Green,
    menu_footer: Color::DarkGray,
};

/// Ocean cyan theme.
pub const THEME_OCEAN: Theme = Theme {
    name: "Ocean",
    snake_head: Color::White,
    snake_body: Color::Cyan,
    food: Color::Yellow,
    special_food: Color::LightMagenta,
    special_food_alt: Color::White,
    board_even: Color::Rgb(0, 10, 30),
    board_odd: Color::Rgb(0, 16, 40),
    border_fg: Color::Cyan,
    hud_text: Color::Cyan,
    hud_accent: Color::White,
    menu_title: Color::Cyan,
    menu_footer: Color::DarkGray,
};

/// Neon magenta/yellow theme.
pub const THEME_NEON: Theme = Theme {
    name: "Neon",
    snake_head: Color::White,
    snake_body: Color::Magenta,
    food: Color::Yellow,
    special_food: Color::LightCyan,
    special_food_alt: Color::LightRed,
    board_even: Color::Black,
    board_odd: Color::Rgb(20, 0, 20),
    border_fg: Color::Magenta,
    hud_text: Color::Magenta,
    hud_accent: Color::Yellow,
    menu_title: Color::Magenta,
    menu_footer: Color::DarkGray,
};

/// Glyph for one board cell (two columns keep cells roughly square).
pub const GLYPH_CELL: &str = "██";

/// Glyph for food cells.
pub const GLYPH_FOOD: &str = "()";

/// Glyph for special food cells.
pub const GLYPH_SPECIAL_FOOD: &str = "<>";

/// Errors raised while loading the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// User preferences read from `settings.json`. Missing keys use defaults.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub theme: ThemeName,
}

impl Settings {
    /// Loads settings from the platform config directory.
    ///
    /// Returns defaults when the file does not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(&settings_path())
    }

    /// Loads settings from an explicit path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the platform-correct settings file path.
#[must_use]
pub fn settings_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SETTINGS_FILE_NAME);
    base
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use super::{ConfigError, Difficulty, Settings, ThemeName};

    #[test]
    fn difficulty_presets_step_down_from_initial_interval() {
        assert_eq!(Difficulty::Easy.tick_interval(), Duration::from_millis(120));
        assert_eq!(Difficulty::Medium.tick_interval(), Duration::from_millis(110));
        assert_eq!(Difficulty::Hard.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn missing_settings_file_returns_defaults() {
        let path = unique_test_path("missing");

        let settings = Settings::load_from_path(&path).expect("missing file should be Ok");

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.difficulty, Difficulty::Easy);
    }

    #[test]
    fn partial_settings_file_fills_in_defaults() {
        let path = unique_test_path("partial");
        write_test_file(&path, r#"{ "difficulty": "hard" }"#);

        let settings = Settings::load_from_path(&path).expect("partial file should parse");

        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.theme, ThemeName::Classic);
        cleanup_test_path(&path);
    }

    #[test]
    fn malformed_settings_file_returns_parse_error() {
        let path = unique_test_path("malformed");
        write_test_file(&path, "not-json");

        let result = Settings::load_from_path(&path);

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
        cleanup_test_path(&path);
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("grid-snake-settings-tests")
            .join(format!("{label}-{nanos}.json"))
    }

    fn write_test_file(path: &PathBuf, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(path, contents).expect("test file write should succeed");
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
