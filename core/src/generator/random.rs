use ndarray::Array2;

use super::*;

/// Uniform mine placement driven by a seeded RNG, so a seed and a config always
/// reproduce the same field.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: GameConfig) -> Field {
        use rand::prelude::*;

        let total_cells = config.total_cells();
        let mut field = Field::new(config.size);

        // optimize for full boards
        if config.mines >= total_cells {
            if config.mines > total_cells {
                log::warn!(
                    "Field already full, generated anyway, requested {} but only fits {}",
                    config.mines,
                    total_cells
                );
            }
            field.fill_mines(|_| true);
            return field;
        }

        // on dense boards pick the safe cells instead, keeps resampling cheap
        let invert = config.mines > total_cells / 2;
        let to_pick = if invert {
            total_cells - config.mines
        } else {
            config.mines
        };

        let mut picked: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut picked_count = 0;
        let mut collisions: u32 = 0;
        while picked_count < to_pick {
            let coords = (
                rng.random_range(0..config.size.0),
                rng.random_range(0..config.size.1),
            );
            let slot = &mut picked[coords.to_nd_index()];
            if *slot {
                collisions += 1;
                continue;
            }
            *slot = true;
            picked_count += 1;
        }
        log::trace!(
            "Picked {} cells with {} collisions (inverted: {})",
            picked_count,
            collisions,
            invert
        );

        field.fill_mines(|coords| picked[coords.to_nd_index()] != invert);

        // double check mine count
        if field.mine_count() != config.mines {
            log::warn!(
                "Generated field count mismatch, actual: {}, requested: {}",
                field.mine_count(),
                config.mines
            );
        }
        field
    }
}
