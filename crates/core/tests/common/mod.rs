#![allow(dead_code)]

use crawl_core::{
    Catalog, Dungeon, DungeonConfig, EMPTY_ICON, EntityFactory, GenerationError, Occupant,
    PLAYER_ICON, SeededRandom, Size, generate_dungeon, geometry::in_bounds,
};

pub fn generate(config: &DungeonConfig, seed: u64) -> Result<Dungeon, GenerationError> {
    let catalog = Catalog::standard();
    let factory = EntityFactory::new(&catalog);
    generate_dungeon(config, &factory, &catalog, &mut SeededRandom::new(seed))
}

pub fn full_config(size: Size) -> DungeonConfig {
    let mut config = DungeonConfig::default();
    config.size.determined = true;
    config.size.dungeon = size;
    config
}

/// Checks the entity arena, the occupant lists and the tile icons against each other.
pub fn check_consistency(dungeon: &Dungeon) -> Result<(), String> {
    let size = dungeon.size();
    let mut listed = 0;
    let mut players = 0;

    for pos in size.positions() {
        let tile = dungeon.tile(pos);
        for occupant in tile.occupants() {
            match occupant {
                Occupant::Player => {
                    players += 1;
                    if dungeon.player_position() != Some(pos) {
                        return Err(format!("player marker at {pos:?} disagrees"));
                    }
                }
                Occupant::Entity(key) => {
                    listed += 1;
                    let Some(entity) = dungeon.entity(*key) else {
                        return Err(format!("stale occupant at {pos:?}"));
                    };
                    if entity.position != pos {
                        return Err(format!(
                            "{} listed at {pos:?} but stored at {:?}",
                            entity.name, entity.position
                        ));
                    }
                }
            }
        }
        let expected = match tile.occupants().last() {
            None => EMPTY_ICON,
            Some(Occupant::Player) => PLAYER_ICON,
            Some(Occupant::Entity(key)) => dungeon.entity(*key).map_or('?', |entity| entity.icon),
        };
        if tile.icon() != expected {
            return Err(format!("icon {:?} at {pos:?}, expected {expected:?}", tile.icon()));
        }
    }

    if listed != dungeon.entity_count() {
        return Err(format!("{listed} occupants for {} entities", dungeon.entity_count()));
    }
    if players != usize::from(dungeon.player_position().is_some()) {
        return Err(format!("{players} player markers"));
    }
    for (_, entity) in dungeon.entities() {
        if !in_bounds(entity.position, size) {
            return Err(format!("{} outside the grid at {:?}", entity.name, entity.position));
        }
    }
    Ok(())
}
