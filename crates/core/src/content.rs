//! Entity prototypes and the character template catalog.
//! Both are built once at startup and handed to generation by reference.

use crate::entity::{Entity, Player, Vitals};
use crate::types::Attributes;

pub mod keys {
    pub const WALL: &str = "Wall";
    pub const DOOR: &str = "Door";
    pub const PATH: &str = "Path";

    pub const GOBLIN: &str = "Goblin";
    pub const RAT: &str = "Rat";
    pub const SKELETON: &str = "Skeleton";
    pub const ORC: &str = "Orc";
    pub const HERMIT: &str = "Hermit";
    pub const TOTEM: &str = "Totem";

    pub const PLAYER: &str = "Adventurer";
}

pub const PLAYER_VISION_REACH: i32 = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterTemplate {
    pub name: String,
    pub icon: char,
    pub attributes: Attributes,
    pub vitals: Vitals,
}

impl CharacterTemplate {
    fn new(name: &str, icon: char, attributes: Attributes, health: i32, damage: i32) -> Self {
        Self {
            name: name.to_owned(),
            icon,
            attributes,
            vitals: Vitals { health, health_max: health, regeneration: 0, damage },
        }
    }

    /// Eligible for random enemy placement.
    pub fn is_roaming_enemy(&self) -> bool {
        self.attributes.contains(Attributes::HOSTILE | Attributes::MOVEMENT)
    }
}

/// Read-only list of character templates.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    characters: Vec<CharacterTemplate>,
}

impl Catalog {
    pub fn new(characters: Vec<CharacterTemplate>) -> Self {
        Self { characters }
    }

    pub fn standard() -> Self {
        let roaming = Attributes::HOSTILE | Attributes::MOVEMENT;
        Self::new(vec![
            CharacterTemplate::new(keys::GOBLIN, 'g', roaming, 10, 2),
            CharacterTemplate::new(keys::RAT, 'r', roaming, 4, 1),
            CharacterTemplate::new(keys::SKELETON, 's', roaming, 14, 3),
            CharacterTemplate::new(keys::ORC, 'o', roaming, 18, 4),
            CharacterTemplate::new(keys::HERMIT, 'h', Attributes::MOVEMENT, 8, 0),
            CharacterTemplate::new(keys::TOTEM, 'T', Attributes::HOSTILE, 30, 1),
        ])
    }

    pub fn characters(&self) -> &[CharacterTemplate] {
        &self.characters
    }

    pub fn roaming_enemies(&self) -> Vec<&CharacterTemplate> {
        self.characters.iter().filter(|template| template.is_roaming_enemy()).collect()
    }

    pub fn default_player() -> Player {
        let vitals = Vitals { health: 40, health_max: 40, regeneration: 1, damage: 5 };
        Player::new(keys::PLAYER, vitals, PLAYER_VISION_REACH)
    }
}

/// Prototype table resolving identifiers (type names or character icons) to
/// entities that generation clones into a dungeon.
#[derive(Clone, Debug, Default)]
pub struct EntityFactory {
    prototypes: Vec<Entity>,
}

impl EntityFactory {
    pub fn new(catalog: &Catalog) -> Self {
        let mut prototypes = vec![
            Entity::prop(keys::WALL, '#', Attributes::OBSTACLE),
            Entity::prop(keys::DOOR, '+', Attributes::OBSTACLE),
            Entity::prop(keys::PATH, '.', Attributes::empty()),
        ];
        prototypes.extend(catalog.characters().iter().map(|template| {
            Entity::character(&template.name, template.icon, template.attributes, template.vitals)
        }));
        Self { prototypes }
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.prototypes.iter().find(|prototype| prototype.name == name)
    }

    pub fn get_by_icon(&self, icon: char) -> Option<&Entity> {
        self.prototypes.iter().find(|prototype| prototype.icon == icon)
    }

    pub fn spawn(&self, name: &str) -> Option<Entity> {
        self.get(name).cloned()
    }
}
