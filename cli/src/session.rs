use sapper_core::{Coord2, GameConfig, GameError, GameStatus, MinefieldEngine, WinRule};
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum MoveError {
    #[error("{coords:?} is outside the board, size is {size:?}")]
    OutsideBoard { coords: Coord2, size: Coord2 },
    #[error(transparent)]
    Game(#[from] GameError),
}

/// One game from start to win or loss. A finished session is dropped and a new
/// one started, boards are never reset in place.
#[derive(Debug)]
pub(crate) struct Session {
    engine: MinefieldEngine,
    seed: u64,
    moves: u32,
}

impl Session {
    pub(crate) fn start(
        config: GameConfig,
        win_rule: WinRule,
        seed: u64,
    ) -> sapper_core::Result<Self> {
        let engine = MinefieldEngine::new(config, seed)?.with_win_rule(win_rule);
        log::debug!(
            "Session started: {}x{} with {} mines (seed {seed})",
            config.size.0,
            config.size.1,
            config.mines
        );
        Ok(Self::from_engine(engine, seed))
    }

    pub(crate) fn from_engine(engine: MinefieldEngine, seed: u64) -> Self {
        Self {
            engine,
            seed,
            moves: 0,
        }
    }

    pub(crate) fn engine(&self) -> &MinefieldEngine {
        &self.engine
    }

    pub(crate) fn seed(&self) -> u64 {
        self.seed
    }

    pub(crate) fn moves(&self) -> u32 {
        self.moves
    }

    pub(crate) fn reveal(&mut self, coords: Coord2) -> Result<GameStatus, MoveError> {
        self.check_on_board(coords)?;
        if self.engine.reveal(coords)?.has_update() {
            self.moves += 1;
        }
        Ok(self.engine.status())
    }

    pub(crate) fn toggle_flag(&mut self, coords: Coord2) -> Result<GameStatus, MoveError> {
        self.check_on_board(coords)?;
        if self.engine.toggle_flag(coords)?.has_update() {
            self.moves += 1;
        }
        Ok(self.engine.status())
    }

    fn check_on_board(&self, coords: Coord2) -> Result<(), MoveError> {
        if self.engine.field().contains(coords) {
            Ok(())
        } else {
            Err(MoveError::OutsideBoard {
                coords,
                size: self.engine.size(),
            })
        }
    }
}
