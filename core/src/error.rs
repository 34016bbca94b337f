use thiserror::Error;

use crate::{CellCount, Coord2};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates out of bounds")]
    OutOfBounds,
    #[error("Invalid configuration: {mines} mines on a {size:?} board")]
    InvalidConfiguration { size: Coord2, mines: CellCount },
    #[error("Board shape does not fit the coordinate range")]
    InvalidBoardShape,
    #[error("Cell cannot be both revealed and flagged")]
    InvalidCellState,
}

pub type Result<T> = core::result::Result<T, GameError>;
