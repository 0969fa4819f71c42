use serde::{Deserialize, Serialize};

use crate::types::{Attributes, EntityKey, PLAYER_ICON, PlayerStates, Pos};

/// Combat-relevant numbers carried by characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: i32,
    pub health_max: i32,
    pub regeneration: i32,
    pub damage: i32,
}

impl Vitals {
    pub fn is_defeated(&self) -> bool {
        self.health < 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub icon: char,
    pub attributes: Attributes,
    pub position: Pos,
    pub active: bool,
    /// Present for characters only; props such as walls and doors have none.
    pub vitals: Option<Vitals>,
}

impl Entity {
    pub fn prop(name: &str, icon: char, attributes: Attributes) -> Self {
        Self {
            name: name.to_owned(),
            icon,
            attributes,
            position: Pos::default(),
            active: true,
            vitals: None,
        }
    }

    pub fn character(name: &str, icon: char, attributes: Attributes, vitals: Vitals) -> Self {
        Self { vitals: Some(vitals), ..Self::prop(name, icon, attributes) }
    }

    pub fn is_obstacle(&self) -> bool {
        self.attributes.contains(Attributes::OBSTACLE)
    }

    pub fn can_fight(&self) -> bool {
        self.attributes.contains(Attributes::HOSTILE) && self.vitals.is_some()
    }
}

/// Something standing on a tile. The player lives outside the entity arena, so it
/// gets its own marker instead of a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Occupant {
    Player,
    Entity(EntityKey),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub icon: char,
    pub vitals: Vitals,
    pub vision_reach: i32,
    pub states: PlayerStates,
}

impl Player {
    pub fn new(name: &str, vitals: Vitals, vision_reach: i32) -> Self {
        Self {
            name: name.to_owned(),
            icon: PLAYER_ICON,
            vitals,
            vision_reach,
            states: PlayerStates::empty(),
        }
    }

    /// End-of-turn upkeep: regenerate towards maximum health.
    pub fn update(&mut self) {
        let vitals = &mut self.vitals;
        vitals.health = (vitals.health + vitals.regeneration).min(vitals.health_max);
    }

    pub fn is_alive(&self) -> bool {
        !self.vitals.is_defeated()
    }
}
