//! A single level: tiles with stacked occupants, the entity arena that owns them,
//! the player's vision set, and the doorway links to other levels.
//!
//! Every entity's `position` and its presence in that tile's occupant list change
//! together; the only ways to move, add, or drop an entity go through this type.

mod icons;
mod rotation;
mod vision;

use std::collections::BTreeSet;
use std::hash::Hasher;

use slotmap::SlotMap;
use tracing::debug;
use xxhash_rust::xxh3::Xxh3;

use crate::combat::CombatResolver;
use crate::content::keys;
use crate::entity::{Entity, Occupant, Player};
use crate::geometry::{in_bounds, step};
use crate::random::RandomSource;
use crate::types::{
    Attributes, EMPTY_ICON, EntityKey, Orientation, PLAYER_ICON, PlayerStates, Pos, Size,
};

/// Weight of staying put against a weight of one per cardinal step.
const STAY_WEIGHT: i32 = 12;

const RING: [Pos; 8] = [
    Pos::new(0, -1),
    Pos::new(1, -1),
    Pos::new(1, 0),
    Pos::new(1, 1),
    Pos::new(0, 1),
    Pos::new(-1, 1),
    Pos::new(-1, 0),
    Pos::new(-1, -1),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    occupants: Vec<Occupant>,
    icon: char,
}

impl Default for Tile {
    fn default() -> Self {
        Self { occupants: Vec::new(), icon: EMPTY_ICON }
    }
}

impl Tile {
    /// Bottom to top; the last occupant decides the icon.
    pub fn occupants(&self) -> &[Occupant] {
        &self.occupants
    }

    pub fn icon(&self) -> char {
        self.icon
    }
}

/// The other side of a resolved doorway.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkPartner {
    pub dungeon: usize,
    pub link: usize,
    /// Cell in the partner dungeon the player arrives at.
    pub exit: Pos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    /// Door cell in this dungeon.
    pub entrance: Pos,
    /// `None` until a partner dungeon is generated for this doorway.
    pub partner: Option<LinkPartner>,
}

impl Link {
    pub fn unresolved(entrance: Pos) -> Self {
        Self { entrance, partner: None }
    }
}

/// What happened during [`Dungeon::events`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventReport {
    pub fights: usize,
    pub defeated: Vec<String>,
    /// Link the player stepped into; the player has left this dungeon.
    pub departed_through: Option<usize>,
    pub removed: usize,
}

#[derive(Clone, Debug)]
pub struct Dungeon {
    size: Size,
    tiles: Vec<Tile>,
    entities: SlotMap<EntityKey, Entity>,
    vision: BTreeSet<Pos>,
    player_position: Option<Pos>,
    pub links: Vec<Link>,
}

impl Dungeon {
    /// An empty grid. `size` must have a positive width and height.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            tiles: vec![Tile::default(); size.area().max(0) as usize],
            entities: SlotMap::with_key(),
            vision: BTreeSet::new(),
            player_position: None,
            links: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Precondition: `pos` is in bounds.
    pub fn tile(&self, pos: Pos) -> &Tile {
        &self.tiles[self.size.index(pos)]
    }

    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities.iter()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn vision(&self) -> &BTreeSet<Pos> {
        &self.vision
    }

    pub fn visible(&self, pos: Pos) -> bool {
        self.vision.contains(&pos)
    }

    /// Cell the player occupies, if the player is in this dungeon.
    pub fn player_position(&self) -> Option<Pos> {
        self.player_position
    }

    pub fn unoccupied(&self, pos: Pos) -> bool {
        self.tile(pos).occupants.is_empty()
    }

    /// True when no entity at `pos` carries any attribute in `mask`.
    pub fn tile_lacking(&self, pos: Pos, mask: Attributes) -> bool {
        !self.tile(pos).occupants.iter().any(|occupant| match occupant {
            Occupant::Player => false,
            Occupant::Entity(key) => {
                self.entities.get(*key).is_some_and(|entity| entity.attributes.intersects(mask))
            }
        })
    }

    pub fn blocked(&self, pos: Pos) -> bool {
        !self.tile_lacking(pos, Attributes::OBSTACLE)
    }

    /// Counts obstacle cells among the eight neighbours; cells off the grid do not count.
    pub fn surrounded(&self, pos: Pos, threshold: usize) -> bool {
        let count = RING
            .iter()
            .map(|&offset| pos + offset)
            .filter(|&neighbour| in_bounds(neighbour, self.size) && self.blocked(neighbour))
            .count();
        count >= threshold
    }

    /// Takes ownership of `entity`, places it at `pos`, and stacks it on that tile.
    pub fn entity_insert(&mut self, pos: Pos, mut entity: Entity) -> EntityKey {
        entity.position = pos;
        let key = self.entities.insert(entity);
        self.occupant_insert(pos, Occupant::Entity(key));
        key
    }

    /// Scrubs the entity from its tile, then frees its slot.
    pub fn entity_remove(&mut self, key: EntityKey) -> Option<Entity> {
        let pos = self.entities.get(key)?.position;
        self.occupant_remove(pos, Occupant::Entity(key));
        self.entities.remove(key)
    }

    pub fn occupant_insert(&mut self, pos: Pos, occupant: Occupant) {
        let index = self.size.index(pos);
        self.tiles[index].occupants.push(occupant);
        self.refresh_tile(pos);
    }

    pub fn occupant_remove(&mut self, pos: Pos, occupant: Occupant) {
        let index = self.size.index(pos);
        self.tiles[index].occupants.retain(|current| *current != occupant);
        self.refresh_tile(pos);
    }

    fn refresh_tile(&mut self, pos: Pos) {
        let index = self.size.index(pos);
        let icon = match self.tiles[index].occupants.last() {
            None => EMPTY_ICON,
            Some(Occupant::Player) => PLAYER_ICON,
            Some(Occupant::Entity(key)) => {
                self.entities.get(*key).map_or(EMPTY_ICON, |entity| entity.icon)
            }
        };
        self.tiles[index].icon = icon;
    }

    fn relocate(&mut self, key: EntityKey, to: Pos) {
        let Some(from) = self.entities.get(key).map(|entity| entity.position) else {
            return;
        };
        self.occupant_remove(from, Occupant::Entity(key));
        if let Some(entity) = self.entities.get_mut(key) {
            entity.position = to;
        }
        self.occupant_insert(to, Occupant::Entity(key));
    }

    /// Puts the player into this dungeon at `position`, or as close to it as the
    /// obstacles allow, then rebuilds vision.
    pub fn place_player(&mut self, position: Pos, player: &Player) {
        if let Some(previous) = self.player_position.take() {
            self.occupant_remove(previous, Occupant::Player);
        }

        let center = self.size.center();
        let target = if in_bounds(position, self.size) { position } else { center };
        let mut chosen = target;
        if self.blocked(target) {
            chosen = Orientation::ALL
                .iter()
                .map(|&orientation| step(target, orientation))
                .find(|&nearby| in_bounds(nearby, self.size) && !self.blocked(nearby))
                .unwrap_or(center);
        }

        self.player_position = Some(chosen);
        self.build_vision(chosen, player.vision_reach);
        self.occupant_insert(chosen, Occupant::Player);
    }

    /// Steps the player one cell. Obstacles stop the move unless the top occupant
    /// of the destination is a door. Vision is rebuilt either way.
    pub fn move_player(&mut self, orientation: Orientation, player: &Player) -> bool {
        let Some(current) = self.player_position else {
            return false;
        };
        let moving = step(current, orientation);
        let allowed =
            in_bounds(moving, self.size) && (!self.blocked(moving) || self.door_on_top(moving));

        let position = if allowed {
            self.occupant_remove(current, Occupant::Player);
            self.occupant_insert(moving, Occupant::Player);
            self.player_position = Some(moving);
            moving
        } else {
            current
        };

        self.build_vision(position, player.vision_reach);
        allowed
    }

    fn door_on_top(&self, pos: Pos) -> bool {
        match self.tile(pos).occupants.last() {
            Some(Occupant::Entity(key)) => {
                self.entities.get(*key).is_some_and(|entity| entity.name == keys::DOOR)
            }
            _ => false,
        }
    }

    /// Gives every mobile entity a weighted chance to take one cardinal step.
    pub fn move_random(&mut self, random: &mut dyn RandomSource) {
        let movers: Vec<EntityKey> = self
            .entities
            .iter()
            .filter(|(_, entity)| entity.attributes.contains(Attributes::MOVEMENT))
            .map(|(key, _)| key)
            .collect();

        for key in movers {
            let roll = random.range(1, Orientation::ALL.len() as i32 + STAY_WEIGHT);
            let Some(&orientation) = Orientation::ALL.get((roll - 1) as usize) else {
                continue;
            };
            let Some(from) = self.entities.get(key).map(|entity| entity.position) else {
                continue;
            };
            let moving = step(from, orientation);
            if in_bounds(moving, self.size) && !self.blocked(moving) {
                self.relocate(key, moving);
            }
        }
    }

    /// Per-turn bookkeeping: fights on the player's cell, doorway departure, and the
    /// sweep of inactive entities.
    pub fn events(&mut self, player: &mut Player, combat: &mut dyn CombatResolver) -> EventReport {
        let mut report = EventReport::default();

        if let Some(position) = self.player_position {
            let occupants = self.tile(position).occupants.clone();
            for occupant in occupants {
                let Occupant::Entity(key) = occupant else {
                    continue;
                };
                let Some(enemy) = self.entities.get_mut(key) else {
                    continue;
                };
                if !enemy.can_fight() {
                    continue;
                }
                let Some(vitals) = enemy.vitals.as_mut() else {
                    continue;
                };
                combat.fight(&mut player.vitals, vitals);
                report.fights += 1;
                if vitals.is_defeated() {
                    enemy.active = false;
                    report.defeated.push(enemy.name.clone());
                }
            }

            if let Some(index) = self.links.iter().position(|link| link.entrance == position) {
                player.states.insert(PlayerStates::SWAPPING);
                self.occupant_remove(position, Occupant::Player);
                self.player_position = None;
                report.departed_through = Some(index);
            }
        }

        let inactive: Vec<EntityKey> = self
            .entities
            .iter()
            .filter(|(_, entity)| !entity.active)
            .map(|(key, _)| key)
            .collect();
        for key in inactive {
            self.entity_remove(key);
            report.removed += 1;
        }

        if report.fights > 0 || report.removed > 0 {
            debug!(fights = report.fights, removed = report.removed, "turn events resolved");
        }
        report
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.size.width.to_le_bytes());
        bytes.extend(self.size.height.to_le_bytes());
        for tile in &self.tiles {
            bytes.extend(u32::from(tile.icon).to_le_bytes());
            bytes.extend((tile.occupants.len() as u32).to_le_bytes());
        }
        bytes.extend((self.vision.len() as u32).to_le_bytes());
        for pos in &self.vision {
            bytes.extend(pos.x.to_le_bytes());
            bytes.extend(pos.y.to_le_bytes());
        }
        bytes.extend((self.links.len() as u32).to_le_bytes());
        for link in &self.links {
            bytes.extend(link.entrance.x.to_le_bytes());
            bytes.extend(link.entrance.y.to_le_bytes());
        }
        if let Some(pos) = self.player_position {
            bytes.extend(pos.x.to_le_bytes());
            bytes.extend(pos.y.to_le_bytes());
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write(&self.canonical_bytes());
        hasher.finish()
    }
}
