//! Deterministic A* over a 4-connected grid with a per-call obstacle set.
//! Step cost is uniform, so the Manhattan heuristic keeps returned paths optimal.

use std::collections::{BTreeMap, BTreeSet};

use crate::geometry::{in_bounds, manhattan};
use crate::types::{Orientation, Pos, Size};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    h: u32,
    y: i32,
    x: i32,
}

/// Shortest path from `start` to `goal`, both included.
///
/// Returns `None` when the goal cannot be reached; that is an ordinary outcome
/// and callers are expected to skip whatever depended on the route.
pub fn astar(start: Pos, goal: Pos, size: Size, obstacles: &[Pos]) -> Option<Vec<Pos>> {
    let blocked: BTreeSet<Pos> = obstacles.iter().copied().collect();
    if !in_bounds(start, size) || !in_bounds(goal, size) || blocked.contains(&goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let mut open_set = BTreeSet::new();
    let mut g_score = BTreeMap::new();
    let mut came_from = BTreeMap::new();
    let h = manhattan(start, goal);
    open_set.insert(OpenNode { f: h, h, y: start.y, x: start.x });
    g_score.insert(start, 0_u32);

    while let Some(current) = open_set.pop_first() {
        let pos = Pos { y: current.y, x: current.x };
        if pos == goal {
            return Some(reconstruct_path(&came_from, start, goal));
        }
        let Some(&cost) = g_score.get(&pos) else {
            continue;
        };
        if current.f > cost + current.h {
            // Stale entry superseded by a cheaper route.
            continue;
        }

        for next in neighbors(pos) {
            if !in_bounds(next, size) || blocked.contains(&next) {
                continue;
            }
            let tentative = cost + 1;
            if tentative < g_score.get(&next).copied().unwrap_or(u32::MAX) {
                came_from.insert(next, pos);
                g_score.insert(next, tentative);
                let h = manhattan(next, goal);
                open_set.insert(OpenNode { f: tentative + h, h, y: next.y, x: next.x });
            }
        }
    }
    None
}

fn reconstruct_path(came_from: &BTreeMap<Pos, Pos>, start: Pos, goal: Pos) -> Vec<Pos> {
    let mut pos = goal;
    let mut path = vec![pos];
    while pos != start {
        match came_from.get(&pos) {
            Some(&previous) => pos = previous,
            None => break,
        }
        path.push(pos);
    }
    path.reverse();
    path
}

pub fn neighbors(pos: Pos) -> [Pos; 4] {
    Orientation::ALL.map(|orientation| pos + orientation.offset())
}
