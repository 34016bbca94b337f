use crate::*;
pub use random::*;

mod random;

pub trait MineGenerator {
    /// Produces a field for an already validated `config`, with adjacency counts computed.
    fn generate(self, config: GameConfig) -> Field;
}
