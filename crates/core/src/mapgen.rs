//! Procedural dungeon generation: a fixed pipeline of independently toggled stages.

mod doors;
mod enemies;
mod hidden_path;
mod walls;

use tracing::debug;

use crate::config::DungeonConfig;
use crate::content::{Catalog, EntityFactory};
use crate::dungeon::Dungeon;
use crate::entity::Entity;
use crate::error::GenerationError;
use crate::random::RandomSource;
use crate::types::{Pos, Size};

/// Per-axis bounds for a size rolled at generation time.
pub const RANDOM_SIDE_MIN: i32 = 30;
pub const RANDOM_SIDE_MAX: i32 = 50;

/// Consecutive failed free-cell draws a stage tolerates before giving up.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 10_000;

pub struct DungeonGenerator<'a> {
    factory: &'a EntityFactory,
    catalog: &'a Catalog,
}

impl<'a> DungeonGenerator<'a> {
    pub fn new(factory: &'a EntityFactory, catalog: &'a Catalog) -> Self {
        Self { factory, catalog }
    }

    pub fn generate(
        &self,
        config: &DungeonConfig,
        random: &mut dyn RandomSource,
    ) -> Result<Dungeon, GenerationError> {
        let size = if config.size.determined {
            config.size.dungeon
        } else {
            Size::new(
                random.range(RANDOM_SIDE_MIN, RANDOM_SIDE_MAX),
                random.range(RANDOM_SIDE_MIN, RANDOM_SIDE_MAX),
            )
        };
        if size.width <= 0 || size.height <= 0 {
            return Err(GenerationError::EmptyGrid(size));
        }

        let mut stage = Stage { dungeon: Dungeon::new(size), factory: self.factory, random };
        let (toggles, amounts) = (&config.generate, &config.amount);

        if toggles.doors {
            doors::generate_doors(&mut stage, amounts.doors)?;
        }
        if toggles.walls_outer {
            walls::generate_walls_outer(&mut stage)?;
        }
        if toggles.hidden_path {
            hidden_path::generate_hidden_path(&mut stage)?;
        }
        if toggles.walls_parents {
            walls::generate_walls_parents(&mut stage, amounts.walls_parents)?;
        }
        if toggles.walls_children {
            walls::generate_walls_children(&mut stage, amounts.walls_children)?;
        }
        if toggles.walls_filler {
            walls::generate_walls_filler(&mut stage, amounts.walls_filler_cycles)?;
        }
        if toggles.enemies {
            enemies::generate_enemies(&mut stage, self.catalog, amounts.enemies)?;
        }

        let dungeon = stage.dungeon;
        debug!(
            ?size,
            entities = dungeon.entity_count(),
            links = dungeon.links.len(),
            "dungeon generated"
        );
        Ok(dungeon)
    }
}

pub fn generate_dungeon(
    config: &DungeonConfig,
    factory: &EntityFactory,
    catalog: &Catalog,
    random: &mut dyn RandomSource,
) -> Result<Dungeon, GenerationError> {
    DungeonGenerator::new(factory, catalog).generate(config, random)
}

/// Working state threaded through the stages.
struct Stage<'a, 'r> {
    dungeon: Dungeon,
    factory: &'a EntityFactory,
    random: &'r mut dyn RandomSource,
}

impl Stage<'_, '_> {
    fn spawn(&self, name: &str) -> Result<Entity, GenerationError> {
        self.factory.spawn(name).ok_or_else(|| GenerationError::UnknownPrototype(name.to_owned()))
    }

    fn place(&mut self, pos: Pos, name: &str) -> Result<(), GenerationError> {
        let entity = self.spawn(name)?;
        self.dungeon.entity_insert(pos, entity);
        Ok(())
    }

    fn has_interior(&self) -> bool {
        let size = self.dungeon.size();
        size.width > 2 && size.height > 2
    }

    fn random_interior(&mut self) -> Pos {
        let size = self.dungeon.size();
        let x = self.random.range(1, size.width - 2);
        let y = self.random.range(1, size.height - 2);
        Pos::new(x, y)
    }

    /// Draws interior cells until an unoccupied one turns up.
    fn free_interior(&mut self, stage: &'static str) -> Result<Pos, GenerationError> {
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let pos = self.random_interior();
            if self.dungeon.unoccupied(pos) {
                return Ok(pos);
            }
        }
        Err(GenerationError::Saturated { stage, attempts: MAX_PLACEMENT_ATTEMPTS })
    }
}
