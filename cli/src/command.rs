use core::str::FromStr;
use sapper_core::{Coord, Coord2};
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    New,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CommandError {
    #[error("Empty command, type `help` for the list of commands")]
    Empty,
    #[error("Unknown command `{0}`, type `help` for the list of commands")]
    Unknown(String),
    #[error("`{0}` expects two coordinates: X Y")]
    MissingCoords(String),
    #[error("`{0}` is not a valid coordinate")]
    InvalidCoord(String),
    #[error("Unexpected trailing input `{0}`")]
    TrailingInput(String),
}

pub(crate) const HELP: &str = "\
Commands:
  r X Y, reveal X Y   uncover the cell at column X, row Y
  f X Y, flag X Y     toggle a flag on the cell at column X, row Y
  n, new              abandon this board and start a new one
  h, help             show this help
  q, quit             exit";

fn parse_coord(word: &str) -> Result<Coord, CommandError> {
    word.parse()
        .map_err(|_| CommandError::InvalidCoord(word.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;

        let command = match name.to_ascii_lowercase().as_str() {
            "r" | "reveal" | "f" | "flag" => {
                let (Some(x), Some(y)) = (words.next(), words.next()) else {
                    return Err(CommandError::MissingCoords(name.to_string()));
                };
                let coords = (parse_coord(x)?, parse_coord(y)?);
                if name.starts_with(['r', 'R']) {
                    Command::Reveal(coords)
                } else {
                    Command::Flag(coords)
                }
            }
            "n" | "new" => Command::New,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(name.to_string())),
        };

        match words.next() {
            Some(extra) => Err(CommandError::TrailingInput(extra.to_string())),
            None => Ok(command),
        }
    }
}
