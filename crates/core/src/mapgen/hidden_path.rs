//! Guaranteed walkable routes: every door is joined to the grid center through a
//! random interior waypoint, so later wall stages cannot seal a door off.

use tracing::{debug, warn};

use super::Stage;
use crate::content::keys;
use crate::error::GenerationError;
use crate::pathfinding::astar;
use crate::types::Pos;

pub(super) fn generate_hidden_path(stage: &mut Stage<'_, '_>) -> Result<(), GenerationError> {
    if !stage.has_interior() {
        warn!(size = ?stage.dungeon.size(), "no interior for hidden paths");
        return Ok(());
    }
    let size = stage.dungeon.size();
    let center = size.center();

    // Doors are the endpoints, so they never block.
    let obstacles: Vec<Pos> = stage
        .dungeon
        .entities()
        .filter(|(_, entity)| entity.is_obstacle() && entity.name != keys::DOOR)
        .map(|(_, entity)| entity.position)
        .collect();

    let entrances: Vec<Pos> = stage.dungeon.links.iter().map(|link| link.entrance).collect();
    let mut waypoints = Vec::with_capacity(entrances.len());
    for entrance in entrances {
        let waypoint = stage.free_interior("hidden_path")?;
        waypoints.push((entrance, waypoint));
    }

    let mut marked = 0;
    for (entrance, waypoint) in waypoints {
        for (from, to) in [(entrance, waypoint), (waypoint, center)] {
            match astar(from, to, size, &obstacles) {
                Some(route) => marked += lay_path(stage, &route)?,
                None => warn!(?from, ?to, "hidden path segment unreachable, skipped"),
            }
        }
    }

    debug!(marked, "hidden paths laid");
    Ok(())
}

fn lay_path(stage: &mut Stage<'_, '_>, route: &[Pos]) -> Result<usize, GenerationError> {
    let mut marked = 0;
    for &pos in route {
        if stage.dungeon.unoccupied(pos) {
            stage.place(pos, keys::PATH)?;
            marked += 1;
        }
    }
    Ok(marked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DungeonConfig, StageToggles};
    use crate::content::{Catalog, EntityFactory};
    use crate::dungeon::Dungeon;
    use crate::geometry::{in_bounds, step};
    use crate::mapgen::generate_dungeon;
    use crate::dungeon::Link;
    use crate::random::{ScriptedRandom, SeededRandom};
    use crate::types::{Orientation, Size};

    fn doors_walls_and_paths(size: Size, seed: u64) -> Dungeon {
        let catalog = Catalog::standard();
        let factory = EntityFactory::new(&catalog);
        let config = DungeonConfig {
            generate: StageToggles {
                doors: true,
                walls_outer: true,
                hidden_path: true,
                ..StageToggles::none()
            },
            ..DungeonConfig::empty(size)
        };
        generate_dungeon(&config, &factory, &catalog, &mut SeededRandom::new(seed))
            .expect("paths should lay")
    }

    #[test]
    fn center_is_marked_and_reached_from_every_door() {
        for seed in 0..8 {
            let dungeon = doors_walls_and_paths(Size::new(21, 15), seed);
            let size = dungeon.size();
            assert_eq!(dungeon.tile(size.center()).icon(), '.');

            for link in &dungeon.links {
                let inward = Orientation::ALL
                    .iter()
                    .map(|&orientation| step(link.entrance, orientation))
                    .filter(|&pos| in_bounds(pos, size))
                    .any(|pos| dungeon.tile(pos).icon() == '.');
                assert!(inward, "door at {:?} has no path next to it", link.entrance);
            }
        }
    }

    #[test]
    fn paths_never_overwrite_walls_or_doors() {
        let dungeon = doors_walls_and_paths(Size::new(18, 18), 42);
        for pos in dungeon.size().positions() {
            assert!(dungeon.tile(pos).occupants().len() <= 1);
        }
        let doors = dungeon.entities().filter(|(_, entity)| entity.name == keys::DOOR).count();
        assert_eq!(doors, dungeon.links.len());
    }

    #[test]
    fn path_cells_connect_doors_to_center() {
        let dungeon = doors_walls_and_paths(Size::new(25, 19), 5);
        let size = dungeon.size();
        let blocked: Vec<Pos> = size
            .positions()
            .filter(|&pos| dungeon.tile(pos).icon() != '.' && dungeon.tile(pos).icon() != '+')
            .collect();
        for link in &dungeon.links {
            let route = astar(link.entrance, size.center(), size, &blocked);
            assert!(route.is_some(), "no marked route from {:?}", link.entrance);
        }
    }

    #[test]
    fn sealed_center_is_skipped_without_failing() {
        let catalog = Catalog::standard();
        let factory = EntityFactory::new(&catalog);
        let rows = "---+---\n-------\n---#---\n--#-#--\n---#---\n-------\n-------";
        let mut dungeon = Dungeon::from_icon_rows(rows, &factory, &Catalog::default_player())
            .expect("fixture");
        let door = Pos::new(3, 0);
        dungeon.links.push(Link::unresolved(door));

        let mut random = ScriptedRandom::new([1, 1]);
        let mut stage = Stage { dungeon, factory: &factory, random: &mut random };
        generate_hidden_path(&mut stage).expect("unreachable segments are skipped");

        let dungeon = stage.dungeon;
        let center = dungeon.size().center();
        assert!(dungeon.tile(center).occupants().is_empty(), "sealed center was marked");
        assert_eq!(dungeon.tile(Pos::new(1, 1)).icon(), '.');
        for wall in [Pos::new(3, 2), Pos::new(2, 3), Pos::new(4, 3), Pos::new(3, 4)] {
            assert_eq!(dungeon.tile(wall).icon(), '#');
        }
        assert_eq!(dungeon.tile(door).icon(), '+');
    }
}
