use alloc::collections::VecDeque;
use serde::{Deserialize, Serialize};

use crate::*;

/// Overall game classification, always derived from the field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Unknown,
    Win,
    Lose,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Win | Self::Lose)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Grid-logic core of a single session: reveals, flags and win/loss evaluation.
///
/// The engine never ends a session by itself. Callers query [`status`] after
/// each move and start a fresh engine once it reports a finished game.
///
/// [`status`]: MinefieldEngine::status
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EngineSnapshot")]
pub struct MinefieldEngine {
    field: Field,
    mine_count: CellCount,
    flagged_count: CellCount,
    win_rule: WinRule,
}

/// Wire form of [`MinefieldEngine`]. Stored counters are ignored and derived
/// again from the field.
#[derive(Deserialize)]
struct EngineSnapshot {
    field: Field,
    #[serde(default)]
    win_rule: WinRule,
}

impl TryFrom<EngineSnapshot> for MinefieldEngine {
    type Error = GameError;

    fn try_from(snapshot: EngineSnapshot) -> Result<Self> {
        Ok(Self::from_field(snapshot.field).with_win_rule(snapshot.win_rule))
    }
}

impl MinefieldEngine {
    /// Seeds a random field for `config`.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let field = RandomMineGenerator::new(seed).generate(config);
        log::debug!(
            "New {:?} field with {} mines, seed {}",
            config.size,
            config.mines,
            seed
        );
        Ok(Self::from_field(field))
    }

    pub fn from_field(field: Field) -> Self {
        let mine_count = field.mine_count();
        let flagged_count = field
            .iter()
            .filter(|(_, cell)| cell.is_flagged())
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);
        Self {
            field,
            mine_count,
            flagged_count,
            win_rule: WinRule::default(),
        }
    }

    pub fn with_win_rule(mut self, win_rule: WinRule) -> Self {
        self.win_rule = win_rule;
        self
    }

    pub fn win_rule(&self) -> WinRule {
        self.win_rule
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn size(&self) -> Coord2 {
        self.field.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_count
    }

    pub fn flag_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn mines_left(&self) -> isize {
        (self.mine_count as isize) - (self.flagged_count as isize)
    }

    /// Full cell state, including the mine bit. Meant for end-of-game display.
    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        self.field.get(coords).copied()
    }

    pub fn cell_view(&self, coords: Coord2) -> Result<CellView> {
        Ok(self.field.get(coords)?.view())
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let cell = self.field.get_mut(coords)?;

        if !cell.toggle_flag() {
            return Ok(MarkOutcome::NoChange);
        }

        if cell.is_flagged() {
            self.flagged_count += 1;
        } else {
            self.flagged_count = self.flagged_count.saturating_sub(1);
        }
        Ok(MarkOutcome::Changed)
    }

    /// Uncovers `coords`, flooding through cells without adjacent mines.
    ///
    /// Mines are not special here, revealing one simply makes [`status`] report
    /// a loss afterwards.
    ///
    /// [`status`]: MinefieldEngine::status
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        if self.field.get(coords)?.is_revealed() {
            return Ok(RevealOutcome::NoChange);
        }

        let mut revealed: CellCount = 0;
        let mut to_visit = VecDeque::from([coords]);

        while let Some(visit_coords) = to_visit.pop_front() {
            let cell = self.field.get_mut(visit_coords)?;
            let was_flagged = cell.is_flagged();
            if !cell.reveal() {
                log::trace!("Skipping cell at {:?}", visit_coords);
                continue;
            }
            let adjacent_mines = cell.adjacent_mines();

            revealed += 1;
            if was_flagged {
                self.flagged_count = self.flagged_count.saturating_sub(1);
            }

            if adjacent_mines == 0 {
                log::trace!("Flooding from {:?}", visit_coords);
                to_visit.extend(
                    self.field
                        .neighbors(visit_coords)
                        .filter(|&pos| !self.field[pos].is_revealed()),
                );
            }
        }

        log::debug!("Revealed {} cells from {:?}", revealed, coords);
        Ok(RevealOutcome::Revealed(revealed))
    }

    /// Scans the whole field. A revealed mine is a loss regardless of anything
    /// else, otherwise the configured [`WinRule`] decides.
    pub fn status(&self) -> GameStatus {
        let mut flagged_mines: CellCount = 0;
        let mut flagged_safe: CellCount = 0;
        let mut unflagged_hidden: CellCount = 0;
        let mut hidden_safe: CellCount = 0;

        for (_, cell) in self.field.iter() {
            if cell.is_revealed() {
                if cell.is_mine() {
                    return GameStatus::Lose;
                }
                continue;
            }

            match (cell.is_flagged(), cell.is_mine()) {
                (true, true) => flagged_mines += 1,
                (true, false) => flagged_safe += 1,
                (false, _) => unflagged_hidden += 1,
            }
            if !cell.is_mine() {
                hidden_safe += 1;
            }
        }

        let won = match self.win_rule {
            WinRule::FlagAllMines => {
                flagged_mines == self.mine_count && flagged_safe == 0 && unflagged_hidden == 0
            }
            WinRule::RevealAllSafe => hidden_safe == 0,
        };

        if won {
            GameStatus::Win
        } else {
            GameStatus::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(size: Coord2, mines: &[Coord2]) -> MinefieldEngine {
        MinefieldEngine::from_field(Field::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn new_rejects_too_many_mines() {
        let config = GameConfig::new_unchecked((2, 2), 5);

        assert_eq!(
            MinefieldEngine::new(config, 0),
            Err(GameError::InvalidConfiguration {
                size: (2, 2),
                mines: 5
            })
        );
    }

    #[test]
    fn reveal_flood_fill_stops_at_numbers() {
        let mut engine = engine((3, 3), &[(2, 2)]);

        let outcome = engine.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed(8));
        assert_eq!(engine.cell_view((0, 0)), Ok(CellView::Revealed(0)));
        assert_eq!(engine.cell_view((1, 1)), Ok(CellView::Revealed(1)));
        assert_eq!(engine.cell_view((2, 2)), Ok(CellView::Hidden));
        assert_eq!(engine.status(), GameStatus::Unknown);
    }

    #[test]
    fn reveal_numbered_cell_does_not_flood() {
        let mut engine = engine((3, 1), &[(0, 0)]);

        assert_eq!(engine.reveal((1, 0)), Ok(RevealOutcome::Revealed(1)));
        assert_eq!(engine.cell_view((2, 0)), Ok(CellView::Hidden));
    }

    #[test]
    fn reveal_twice_is_no_change() {
        let mut engine = engine((3, 3), &[(2, 2)]);

        engine.reveal((0, 0)).unwrap();
        let snapshot = engine.clone();

        assert_eq!(engine.reveal((0, 0)), Ok(RevealOutcome::NoChange));
        assert_eq!(engine, snapshot);
    }

    #[test]
    fn reveal_mine_loses() {
        let mut engine = engine((2, 2), &[(0, 0)]);

        engine.reveal((0, 0)).unwrap();

        assert_eq!(engine.status(), GameStatus::Lose);
        assert_eq!(engine.cell_view((0, 0)), Ok(CellView::Exploded));
    }

    #[test]
    fn flood_fill_clears_stray_flags() {
        let mut engine = engine((3, 3), &[(2, 2)]);

        engine.toggle_flag((0, 1)).unwrap();
        assert_eq!(engine.flag_count(), 1);

        engine.reveal((0, 0)).unwrap();

        assert_eq!(engine.cell_view((0, 1)), Ok(CellView::Revealed(0)));
        assert_eq!(engine.flag_count(), 0);
    }

    #[test]
    fn toggle_flag_on_revealed_cell_is_no_change() {
        let mut engine = engine((2, 1), &[(0, 0)]);

        engine.reveal((1, 0)).unwrap();

        assert_eq!(engine.toggle_flag((1, 0)), Ok(MarkOutcome::NoChange));
        assert_eq!(engine.cell_view((1, 0)), Ok(CellView::Revealed(1)));
        assert_eq!(engine.flag_count(), 0);
    }

    #[test]
    fn toggle_flag_twice_restores_hidden() {
        let mut engine = engine((2, 1), &[(0, 0)]);

        assert_eq!(engine.toggle_flag((0, 0)), Ok(MarkOutcome::Changed));
        assert_eq!(engine.mines_left(), 0);
        assert_eq!(engine.toggle_flag((0, 0)), Ok(MarkOutcome::Changed));
        assert_eq!(engine.cell_view((0, 0)), Ok(CellView::Hidden));
        assert_eq!(engine.mines_left(), 1);
    }

    #[test]
    fn out_of_range_moves_are_errors() {
        let mut engine = engine((2, 2), &[]);

        assert_eq!(engine.reveal((2, 0)), Err(GameError::OutOfBounds));
        assert_eq!(engine.toggle_flag((0, 2)), Err(GameError::OutOfBounds));
    }

    #[test]
    fn flagged_mine_and_revealed_rest_wins() {
        let mut engine = engine((2, 2), &[(0, 0)]);

        engine.toggle_flag((0, 0)).unwrap();
        for coords in [(1, 0), (0, 1), (1, 1)] {
            engine.reveal(coords).unwrap();
        }

        assert_eq!(engine.status(), GameStatus::Win);
    }

    #[test]
    fn unflagged_mine_blocks_default_rule_but_not_classic() {
        let mut engine = engine((2, 2), &[(0, 0)]);
        for coords in [(1, 0), (0, 1), (1, 1)] {
            engine.reveal(coords).unwrap();
        }

        assert_eq!(engine.status(), GameStatus::Unknown);

        let engine = engine.with_win_rule(WinRule::RevealAllSafe);
        assert_eq!(engine.status(), GameStatus::Win);
    }

    #[test]
    fn stray_flag_blocks_win() {
        let mut engine = engine((3, 1), &[(0, 0)]);

        engine.toggle_flag((0, 0)).unwrap();
        engine.toggle_flag((2, 0)).unwrap();
        engine.reveal((1, 0)).unwrap();

        assert_eq!(engine.status(), GameStatus::Unknown);

        engine.reveal((2, 0)).unwrap();
        assert_eq!(engine.status(), GameStatus::Win);
    }

    #[test]
    fn empty_field_is_won_after_single_reveal() {
        let mut engine = engine((4, 4), &[]);

        assert_eq!(engine.status(), GameStatus::Unknown);
        assert_eq!(engine.reveal((3, 3)), Ok(RevealOutcome::Revealed(16)));
        assert_eq!(engine.status(), GameStatus::Win);
    }

    #[test]
    fn snapshot_counters_are_rebuilt_from_cells() {
        let mut engine = engine((3, 3), &[(0, 0)]);
        engine.toggle_flag((1, 1)).unwrap();

        let json = serde_json::to_string(&engine)
            .unwrap()
            .replace("\"flagged_count\":1", "\"flagged_count\":0")
            .replace("\"mine_count\":1", "\"mine_count\":9");
        let mut restored: MinefieldEngine = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, engine);
        assert_eq!(restored.flag_count(), 1);
        assert_eq!(restored.total_mines(), 1);
        assert_eq!(restored.toggle_flag((1, 1)), Ok(MarkOutcome::Changed));
        assert_eq!(restored.flag_count(), 0);
    }

    #[test]
    fn snapshot_with_bad_board_is_rejected() {
        let engine = engine((2, 1), &[]);
        let json = serde_json::to_string(&engine).unwrap();

        let empty = json.replace("\"dim\":[2,1]", "\"dim\":[0,1]").replace(
            r#""data":[{"mine":false,"revealed":false,"flagged":false,"adjacent_mines":0},{"mine":false,"revealed":false,"flagged":false,"adjacent_mines":0}]"#,
            r#""data":[]"#,
        );
        assert!(serde_json::from_str::<MinefieldEngine>(&empty).is_err());

        let flagged_revealed = json.replacen(
            r#""revealed":false,"flagged":false"#,
            r#""revealed":true,"flagged":true"#,
            1,
        );
        assert!(serde_json::from_str::<MinefieldEngine>(&flagged_revealed).is_err());
    }

    #[test]
    fn seeded_engine_starts_unknown() {
        let engine = MinefieldEngine::new(GameConfig::beginner(), 42).unwrap();

        assert_eq!(engine.total_mines(), 10);
        assert_eq!(engine.size(), (9, 9));
        assert_eq!(engine.status(), GameStatus::Unknown);
    }
}
