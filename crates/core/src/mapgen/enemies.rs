use tracing::{debug, warn};

use super::Stage;
use crate::content::Catalog;
use crate::error::GenerationError;

/// Enemy count bounds scale with the grid's side length: `sqrt(area) / 3` up to
/// `sqrt(area) / 1.5`.
pub(super) fn default_enemy_range(area: i32) -> (i32, i32) {
    let area = area.max(0);
    // sqrt(area) / 1.5 == sqrt(4 * area) / 3
    (area.isqrt() / 3, (i64::from(area) * 4).isqrt() as i32 / 3)
}

pub(super) fn generate_enemies(
    stage: &mut Stage<'_, '_>,
    catalog: &Catalog,
    amount: u32,
) -> Result<(), GenerationError> {
    let roster = catalog.roaming_enemies();
    if roster.is_empty() {
        warn!("catalog has no hostile roaming characters, enemies skipped");
        return Ok(());
    }
    if !stage.has_interior() {
        warn!(size = ?stage.dungeon.size(), "no interior for enemies");
        return Ok(());
    }

    let limit = if amount == 0 {
        let (min, max) = default_enemy_range(stage.dungeon.size().area());
        stage.random.range(min, max)
    } else {
        amount as i32
    };

    for _ in 0..limit {
        let pos = stage.free_interior("enemies")?;
        let pick = stage.random.range(0, roster.len() as i32 - 1) as usize;
        let Some(template) = roster.get(pick) else {
            continue;
        };
        stage.place(pos, &template.name)?;
    }

    debug!(placed = limit, kinds = roster.len(), "enemies placed");
    Ok(())
}
