use std::collections::BTreeSet;

use super::{Dungeon, Tile};
use crate::geometry::{rotate_position, rotated_size};
use crate::types::{EntityKey, Orientation, Pos};

impl Dungeon {
    /// Turns the whole grid clockwise by `orientation`: tiles, entity positions,
    /// vision and the player's cell. Links are left for the caller, which needs the
    /// pre-rotation size to turn them and their partners' exits.
    pub fn rotate(&mut self, orientation: Orientation) {
        if orientation == Orientation::North {
            return;
        }
        let before = self.size;
        let after = rotated_size(before, orientation);
        let turn = |pos: Pos| rotate_position(pos, before, orientation);

        let mut tiles = vec![Tile::default(); self.tiles.len()];
        for pos in before.positions() {
            tiles[after.index(turn(pos))] = self.tiles[before.index(pos)].clone();
        }
        let positions: Vec<(EntityKey, Pos)> =
            self.entities.iter().map(|(key, entity)| (key, turn(entity.position))).collect();
        let vision: BTreeSet<Pos> = self.vision.iter().map(|&pos| turn(pos)).collect();
        let player_position = self.player_position.map(turn);

        self.size = after;
        self.tiles = tiles;
        for (key, pos) in positions {
            if let Some(entity) = self.entities.get_mut(key) {
                entity.position = pos;
            }
        }
        self.vision = vision;
        self.player_position = player_position;
    }
}
