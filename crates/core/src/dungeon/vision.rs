//! Ray-cast field of view.
//!
//! Rays run from the viewpoint to every cell on a circle of the player's reach and
//! stop on the first obstacle, which is itself seen. Two repair passes follow: one
//! reveals walls flanking the straight cardinal rays, one re-casts towards cells
//! whose two side neighbours are both seen.

use std::collections::BTreeSet;

use super::Dungeon;
use crate::geometry::{circle, in_bounds, line};
use crate::types::{Orientation, Pos};

/// For each cardinal step from a seen cell, the two cells flanking the target.
const BRIDGES: [(Orientation, Pos, Pos); 4] = [
    (Orientation::North, Pos::new(-1, -1), Pos::new(1, -1)),
    (Orientation::East, Pos::new(1, -1), Pos::new(1, 1)),
    (Orientation::South, Pos::new(1, 1), Pos::new(-1, 1)),
    (Orientation::West, Pos::new(-1, 1), Pos::new(-1, -1)),
];

impl Dungeon {
    pub fn build_vision(&mut self, viewpoint: Pos, reach: i32) {
        let mut vision = BTreeSet::new();
        if in_bounds(viewpoint, self.size) {
            vision.insert(viewpoint);
        }

        for endpoint in circle(viewpoint, reach) {
            self.cast(&mut vision, &line(viewpoint, endpoint));
        }

        self.reveal_flanking_walls(&mut vision, viewpoint, reach);
        self.fill_dead_spots(&mut vision, viewpoint);

        self.vision = vision;
    }

    fn cast(&self, vision: &mut BTreeSet<Pos>, ray: &[Pos]) {
        for &pos in ray {
            if !in_bounds(pos, self.size) {
                break;
            }
            vision.insert(pos);
            if self.blocked(pos) {
                break;
            }
        }
    }

    fn reveal_flanking_walls(&self, vision: &mut BTreeSet<Pos>, viewpoint: Pos, reach: i32) {
        for orientation in Orientation::ALL {
            let direction = orientation.offset();
            let straight = line(viewpoint, viewpoint + direction * reach);
            let across = Pos::new(direction.y, direction.x);

            for side in [across, across * -1] {
                for &current in &straight {
                    let flank = current + side;
                    if in_bounds(flank, self.size) && self.blocked(flank) {
                        vision.insert(flank);
                    }
                    if !in_bounds(current, self.size) || self.blocked(current) {
                        break;
                    }
                }
            }
        }
    }

    // Candidates come from a snapshot so the result does not depend on visiting order.
    fn fill_dead_spots(&self, vision: &mut BTreeSet<Pos>, viewpoint: Pos) {
        let seen = vision.clone();
        for &cell in &seen {
            for (orientation, first, second) in BRIDGES {
                let hidden = cell + orientation.offset();
                if !in_bounds(hidden, self.size) || seen.contains(&hidden) {
                    continue;
                }
                if seen.contains(&(cell + first)) && seen.contains(&(cell + second)) {
                    self.cast(vision, &line(viewpoint, hidden));
                }
            }
        }
    }
}
