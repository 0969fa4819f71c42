use tracing::{debug, warn};

use super::{MAX_PLACEMENT_ATTEMPTS, Stage};
use crate::content::keys;
use crate::error::GenerationError;
use crate::geometry::{in_bounds, on_border, step};
use crate::types::{Orientation, Pos};

const DEFAULT_FILLER_CYCLES: u32 = 5;
const FILLER_THRESHOLD: usize = 5;

fn amount_or(amount: u32, default: i32) -> i32 {
    if amount == 0 { default } else { amount as i32 }
}

pub(super) fn generate_walls_outer(stage: &mut Stage<'_, '_>) -> Result<(), GenerationError> {
    let size = stage.dungeon.size();
    let mut placed = 0;
    for pos in size.positions() {
        if on_border(pos, size) && stage.dungeon.unoccupied(pos) {
            stage.place(pos, keys::WALL)?;
            placed += 1;
        }
    }
    debug!(placed, "outer walls placed");
    Ok(())
}

/// Free-standing interior walls that seed the child stage.
pub(super) fn generate_walls_parents(
    stage: &mut Stage<'_, '_>,
    amount: u32,
) -> Result<(), GenerationError> {
    if !stage.has_interior() {
        warn!(size = ?stage.dungeon.size(), "no interior for parent walls");
        return Ok(());
    }
    let remaining = amount_or(amount, stage.dungeon.size().area() / 10);
    for _ in 0..remaining {
        let pos = stage.free_interior("walls_parents")?;
        stage.place(pos, keys::WALL)?;
    }
    debug!(placed = remaining, "parent walls placed");
    Ok(())
}

/// Grows walls out of existing obstacles, one random cardinal step at a time, until
/// the quota is met.
pub(super) fn generate_walls_children(
    stage: &mut Stage<'_, '_>,
    amount: u32,
) -> Result<(), GenerationError> {
    let size = stage.dungeon.size();
    let quota = amount_or(amount, size.area() / 4);
    let mut placed = 0;
    let mut misses = 0;

    while placed < quota {
        let origins: Vec<Pos> = stage
            .dungeon
            .entities()
            .filter(|(_, entity)| entity.is_obstacle())
            .map(|(_, entity)| entity.position)
            .collect();
        if origins.is_empty() {
            return Err(GenerationError::Saturated { stage: "walls_children", attempts: 0 });
        }

        for origin in origins {
            if placed >= quota {
                break;
            }
            let direction = Orientation::from_quarter_turns(stage.random.range(0, 3));
            let pos = step(origin, direction);
            if in_bounds(pos, size) && stage.dungeon.unoccupied(pos) {
                stage.place(pos, keys::WALL)?;
                placed += 1;
                misses = 0;
            } else {
                misses += 1;
                if misses >= MAX_PLACEMENT_ATTEMPTS {
                    return Err(GenerationError::Saturated {
                        stage: "walls_children",
                        attempts: misses,
                    });
                }
            }
        }
    }

    debug!(placed, "child walls placed");
    Ok(())
}

/// Thickens wall clusters: interior cells with enough blocked neighbours become walls.
pub(super) fn generate_walls_filler(
    stage: &mut Stage<'_, '_>,
    amount: u32,
) -> Result<(), GenerationError> {
    let size = stage.dungeon.size();
    let cycles = if amount == 0 { DEFAULT_FILLER_CYCLES } else { amount };
    let mut placed = 0;
    for _ in 0..cycles {
        for y in 1..size.height - 1 {
            for x in 1..size.width - 1 {
                let pos = Pos::new(x, y);
                if stage.dungeon.unoccupied(pos) && stage.dungeon.surrounded(pos, FILLER_THRESHOLD)
                {
                    stage.place(pos, keys::WALL)?;
                    placed += 1;
                }
            }
        }
    }
    debug!(placed, cycles, "filler walls placed");
    Ok(())
}
