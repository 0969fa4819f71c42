//! Shared fixtures for the unit test modules.

use crate::content::keys;
use crate::dungeon::Dungeon;
use crate::entity::{Entity, Occupant, Player, Vitals};
use crate::types::{Attributes, EMPTY_ICON, PLAYER_ICON};

pub(crate) fn wall() -> Entity {
    Entity::prop(keys::WALL, '#', Attributes::OBSTACLE)
}

pub(crate) fn door() -> Entity {
    Entity::prop(keys::DOOR, '+', Attributes::OBSTACLE)
}

pub(crate) fn path() -> Entity {
    Entity::prop(keys::PATH, '.', Attributes::empty())
}

pub(crate) fn goblin(health: i32) -> Entity {
    let vitals = Vitals { health, health_max: health, regeneration: 0, damage: 2 };
    Entity::character(keys::GOBLIN, 'g', Attributes::HOSTILE | Attributes::MOVEMENT, vitals)
}

pub(crate) fn test_player(vision_reach: i32) -> Player {
    let vitals = Vitals { health: 30, health_max: 30, regeneration: 1, damage: 4 };
    Player::new(keys::PLAYER, vitals, vision_reach)
}

/// Entity positions, occupant lists, the player marker, and tile icons all agree.
pub(crate) fn assert_occupants_consistent(dungeon: &Dungeon) {
    for (key, entity) in dungeon.entities() {
        let listed = dungeon
            .size()
            .positions()
            .filter(|&pos| dungeon.tile(pos).occupants().contains(&Occupant::Entity(key)))
            .collect::<Vec<_>>();
        assert_eq!(listed, vec![entity.position], "{} listed at {listed:?}", entity.name);
    }

    let mut players = 0;
    for pos in dungeon.size().positions() {
        let tile = dungeon.tile(pos);
        for occupant in tile.occupants() {
            match occupant {
                Occupant::Player => {
                    players += 1;
                    assert_eq!(dungeon.player_position(), Some(pos));
                }
                Occupant::Entity(key) => assert!(dungeon.entity(*key).is_some(), "stale key"),
            }
        }
        let expected = match tile.occupants().last() {
            None => EMPTY_ICON,
            Some(Occupant::Player) => PLAYER_ICON,
            Some(Occupant::Entity(key)) => dungeon.entity(*key).map_or('?', |entity| entity.icon),
        };
        assert_eq!(tile.icon(), expected, "icon at {pos:?}");
    }
    assert_eq!(players, usize::from(dungeon.player_position().is_some()));
}
