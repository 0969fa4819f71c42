use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::Stage;
use crate::content::keys;
use crate::dungeon::Link;
use crate::error::GenerationError;
use crate::geometry::{corner_sensitivity, in_corner, on_border, quadrant};
use crate::types::{Orientation, Pos};

const DEFAULT_DOORS: u32 = 3;

/// Places doors on consecutive sides, clockwise from a random one. Each door opens
/// an unresolved link.
pub(super) fn generate_doors(
    stage: &mut Stage<'_, '_>,
    amount: u32,
) -> Result<(), GenerationError> {
    let size = stage.dungeon.size();
    let limit = if amount == 0 { DEFAULT_DOORS } else { amount };
    let start = stage.random.range(0, 3);
    let sensitivity = corner_sensitivity(size);

    let mut sides: BTreeMap<Orientation, Vec<Pos>> = BTreeMap::new();
    for pos in size.positions() {
        let candidate = on_border(pos, size) && !in_corner(pos, size, sensitivity);
        if candidate && stage.dungeon.unoccupied(pos) {
            sides.entry(quadrant(pos, size)).or_default().push(pos);
        }
    }

    for offset in 0..limit as i32 {
        let side = Orientation::from_quarter_turns(start + offset);
        let Some(bucket) = sides.get_mut(&side).filter(|bucket| !bucket.is_empty()) else {
            warn!(?side, ?size, "no free border cell left for a door, side skipped");
            continue;
        };
        let index = stage.random.range(0, bucket.len() as i32 - 1) as usize;
        let pos = bucket.remove(index);
        stage.place(pos, keys::DOOR)?;
        stage.dungeon.links.push(Link::unresolved(pos));
    }

    debug!(doors = stage.dungeon.links.len(), sensitivity, "doors placed");
    Ok(())
}
