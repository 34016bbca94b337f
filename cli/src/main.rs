use anyhow::Context;
use clap::{Parser, ValueEnum};
use rand::prelude::*;
use sapper_core::{CellCount, Coord, GameConfig, GameStatus, WinRule};
use std::io::{self, BufRead, Write};

mod command;
mod render;
mod session;

use command::{Command, CommandError, HELP};
use render::{BoardDump, render_board};
use session::Session;

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::beginner(),
            Self::Intermediate => GameConfig::intermediate(),
            Self::Expert => GameConfig::expert(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Preset board, individual values can be overridden below
    #[arg(short, long, value_enum, default_value_t = Difficulty::Beginner)]
    difficulty: Difficulty,

    /// Board width in cells
    #[arg(long)]
    width: Option<Coord>,

    /// Board height in cells
    #[arg(long)]
    height: Option<Coord>,

    /// Number of mines
    #[arg(short, long)]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Win by revealing every safe cell, flags are optional
    #[arg(long)]
    classic: bool,

    /// Print the board as JSON after every move
    #[arg(long)]
    json: bool,
}

impl Args {
    fn game_config(&self) -> anyhow::Result<GameConfig> {
        let preset = self.difficulty.config();
        let size = (
            self.width.unwrap_or(preset.size.0),
            self.height.unwrap_or(preset.size.1),
        );
        let mines = self.mines.unwrap_or(preset.mines);
        GameConfig::new(size, mines).context("Unplayable board settings")
    }

    fn win_rule(&self) -> WinRule {
        if self.classic {
            WinRule::RevealAllSafe
        } else {
            WinRule::FlagAllMines
        }
    }
}

/// Drives sessions from line-based commands until `quit` or end of input.
struct Game<'a, W: Write> {
    config: GameConfig,
    win_rule: WinRule,
    json: bool,
    seeds: SmallRng,
    out: &'a mut W,
}

impl<W: Write> Game<'_, W> {
    fn new_session(&mut self) -> anyhow::Result<Session> {
        let session = Session::start(self.config, self.win_rule, self.seeds.random())?;
        self.show(&session, false)?;
        Ok(session)
    }

    fn show(&mut self, session: &Session, uncover: bool) -> anyhow::Result<()> {
        if self.json {
            serde_json::to_writer(&mut *self.out, &BoardDump::from_engine(session.engine()))?;
            writeln!(self.out)?;
        } else {
            writeln!(self.out, "{}", render_board(session.engine(), uncover))?;
        }
        Ok(())
    }

    fn finish(&mut self, session: &Session, status: GameStatus) -> anyhow::Result<()> {
        log::debug!(
            "Session {:?} after {} moves (seed {})",
            status,
            session.moves(),
            session.seed()
        );
        self.show(session, true)?;
        let message = match status {
            GameStatus::Win => "You win!",
            _ => "Boom! You lose.",
        };
        if !self.json {
            writeln!(self.out, "{message} Starting a new board.")?;
        }
        Ok(())
    }

    fn run(&mut self, input: impl BufRead) -> anyhow::Result<()> {
        let mut session = self.new_session()?;

        for line in input.lines() {
            let line = line?;
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(CommandError::Empty) => continue,
                Err(err) => {
                    writeln!(self.out, "{err}")?;
                    continue;
                }
            };

            let result = match command {
                Command::Quit => break,
                Command::Help => {
                    writeln!(self.out, "{HELP}")?;
                    continue;
                }
                Command::New => {
                    log::debug!("Session abandoned after {} moves", session.moves());
                    session = self.new_session()?;
                    continue;
                }
                Command::Reveal(coords) => session.reveal(coords),
                Command::Flag(coords) => session.toggle_flag(coords),
            };

            match result {
                Ok(status) if status.is_finished() => {
                    self.finish(&session, status)?;
                    session = self.new_session()?;
                }
                Ok(_) => self.show(&session, false)?,
                Err(err) => writeln!(self.out, "{err}")?,
            }
            self.out.flush()?;
        }

        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = args.game_config()?;
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    log::debug!("seed: {seed}");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut game = Game {
        config,
        win_rule: args.win_rule(),
        json: args.json,
        seeds: SmallRng::seed_from_u64(seed),
        out: &mut out,
    };
    writeln!(game.out, "{HELP}")?;
    game.run(io::stdin().lock())
}
