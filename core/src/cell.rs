use serde::{Deserialize, Serialize};

/// State of a single grid position.
///
/// Mine placement and the adjacency count are written once while the field is
/// being set up. Afterwards only the reveal and flag bits change: `revealed`
/// never goes back to `false`, and `flagged` can only be toggled while the cell
/// is still covered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    mine: bool,
    revealed: bool,
    flagged: bool,
    adjacent_mines: u8,
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        self.mine
    }

    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    /// Player-visible projection, hides the mine bit until the cell is revealed.
    pub const fn view(self) -> CellView {
        match (self.revealed, self.mine, self.flagged) {
            (true, true, _) => CellView::Exploded,
            (true, false, _) => CellView::Revealed(self.adjacent_mines),
            (false, _, true) => CellView::Flagged,
            (false, _, false) => CellView::Hidden,
        }
    }

    /// Returns `false` when the cell already held a mine.
    pub(crate) fn place_mine(&mut self) -> bool {
        !core::mem::replace(&mut self.mine, true)
    }

    pub(crate) fn set_adjacent_mines(&mut self, count: u8) {
        self.adjacent_mines = count;
    }

    /// Uncovers the cell, dropping any flag on it. Returns `false` if it was
    /// already revealed.
    pub(crate) fn reveal(&mut self) -> bool {
        if self.revealed {
            return false;
        }
        self.revealed = true;
        self.flagged = false;
        true
    }

    /// Returns `false` without touching the cell when it is revealed.
    pub(crate) fn toggle_flag(&mut self) -> bool {
        if self.revealed {
            return false;
        }
        self.flagged = !self.flagged;
        true
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    Exploded,
}

impl CellView {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}
