#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use field::*;
pub use generator::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod field;
mod generator;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Builds a config, rejecting empty boards and boards that cannot hold `mines`.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked((9, 9), 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked((16, 16), 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked((30, 16), 99)
    }

    pub fn validate(&self) -> Result<()> {
        let (size_x, size_y) = self.size;
        if size_x == 0 || size_y == 0 || self.mines > self.total_cells() {
            return Err(GameError::InvalidConfiguration {
                size: self.size,
                mines: self.mines,
            });
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

/// Condition under which a session counts as won.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinRule {
    /// Every mine flagged, no flag on a safe cell and no other cell left unrevealed.
    FlagAllMines,
    /// Every safe cell revealed, flags are ignored.
    RevealAllSafe,
}

impl Default for WinRule {
    fn default() -> Self {
        Self::FlagAllMines
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    /// Number of cells uncovered by this move, flood fill included.
    Revealed(CellCount),
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Revealed(_) => true,
        }
    }
}
