use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use grid_snake::config::{DEFAULT_GRID, Difficulty, Settings, Theme, ThemeName};
use grid_snake::controller::GameController;
use grid_snake::game::GameState;
use grid_snake::input::{GameInput, InputHandler};
use grid_snake::renderer;
use grid_snake::terminal_runtime::{AppTerminal, TerminalSession};
use grid_snake::ui::hud::HudInfo;
use log::{info, warn};
use simplelog::{Config, LevelFilter, WriteLogger};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Starting difficulty; overrides the settings file.
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Color theme; overrides the settings file.
    #[arg(long, value_enum)]
    theme: Option<ThemeName>,

    /// Seed for a reproducible food sequence.
    #[arg(long)]
    seed: Option<u64>,

    /// Write a debug log to this file.
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Read settings from this file instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let settings = load_settings(cli.config.as_deref());
    let difficulty = cli.difficulty.unwrap_or(settings.difficulty);
    let theme = cli.theme.unwrap_or(settings.theme).theme();
    info!("starting: difficulty {}, theme {}", difficulty.label(), theme.name);

    let state = match cli.seed {
        Some(seed) => GameState::new_with_seed(DEFAULT_GRID, seed),
        None => GameState::new(DEFAULT_GRID),
    };
    let mut controller = GameController::new(state, difficulty);

    let mut session = TerminalSession::enter()?;
    run(session.terminal_mut(), &mut controller, theme)?;
    drop(session);

    info!("exit: high score {}", controller.high_score());
    Ok(())
}

fn run(
    terminal: &mut AppTerminal,
    controller: &mut GameController,
    theme: &Theme,
) -> io::Result<()> {
    let mut input = InputHandler::new();
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| {
            renderer::render(frame, &controller.snapshot(), &hud_info(controller, theme));
        })?;

        let timeout = controller
            .tick_interval()
            .saturating_sub(last_tick.elapsed());
        if let Some(game_input) = input.poll_input(timeout)? {
            if game_input == GameInput::Quit {
                break;
            }

            controller.handle_input(game_input);
        }

        if last_tick.elapsed() >= controller.tick_interval() {
            controller.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

fn hud_info<'a>(controller: &GameController, theme: &'a Theme) -> HudInfo<'a> {
    HudInfo {
        status_line: controller.status_line(),
        score: controller.score(),
        high_score: controller.high_score(),
        difficulty: controller.difficulty(),
        tick_interval: controller.tick_interval(),
        snake_length: controller.state().snake.len(),
        theme,
    }
}

/// Falls back to defaults when the settings file is unusable, warning on
/// stderr while the terminal is still in cooked mode.
fn load_settings(path: Option<&Path>) -> Settings {
    let result = match path {
        Some(path) => Settings::load_from_path(path),
        None => Settings::load(),
    };

    result.unwrap_or_else(|error| {
        eprintln!("Warning: {error}; using default settings");
        warn!("{error}");
        Settings::default()
    })
}

fn init_logging(path: &Path) -> io::Result<()> {
    WriteLogger::init(LevelFilter::Debug, Config::default(), File::create(path)?)
        .map_err(io::Error::other)
}
