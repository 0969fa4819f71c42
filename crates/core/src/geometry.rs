//! Grid-space primitives shared by generation, movement, vision, and rotation.
//! Everything here is integer-only and free of dungeon state.

use crate::types::{Orientation, Pos, Size};

pub fn in_bounds(pos: Pos, size: Size) -> bool {
    pos.x >= 0 && pos.y >= 0 && pos.x < size.width && pos.y < size.height
}

pub fn on_border(pos: Pos, size: Size) -> bool {
    in_bounds(pos, size)
        && (pos.x == 0 || pos.y == 0 || pos.x == size.width - 1 || pos.y == size.height - 1)
}

pub fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

pub fn step(pos: Pos, orientation: Orientation) -> Pos {
    pos + orientation.offset()
}

/// Side of the grid a border cell belongs to.
///
/// Edge distances are normalized against the opposite dimension so the rectangle's
/// diagonals split the sides. Ties resolve in `North, East, South, West` order.
pub fn quadrant(pos: Pos, size: Size) -> Orientation {
    let span_x = (size.width - 1).max(0);
    let span_y = (size.height - 1).max(0);
    let distances = [
        (Orientation::North, pos.y * span_x),
        (Orientation::East, (span_x - pos.x) * span_y),
        (Orientation::South, (span_y - pos.y) * span_x),
        (Orientation::West, pos.x * span_y),
    ];

    let mut best = distances[0];
    for candidate in &distances[1..] {
        if candidate.1 < best.1 {
            best = *candidate;
        }
    }
    best.0
}

pub fn in_corner(pos: Pos, size: Size, sensitivity: i32) -> bool {
    let from_x = pos.x.min(size.width - 1 - pos.x);
    let from_y = pos.y.min(size.height - 1 - pos.y);
    from_x <= sensitivity && from_y <= sensitivity
}

/// How many cells next to each corner are kept free of doors:
/// `ceil((sqrt(area) + 6) / 10) - 1`, found as the smallest `k >= 1` with
/// `area <= (10k - 6)^2` so no floating point is involved.
pub fn corner_sensitivity(size: Size) -> i32 {
    let area = i64::from(size.width.max(0)) * i64::from(size.height.max(0));
    let mut k: i64 = 1;
    while area > (10 * k - 6).pow(2) {
        k += 1;
    }
    k as i32 - 1
}

/// Maps `pos` from a `size` frame into the frame produced by turning the grid
/// clockwise by `orientation`. Odd quarter turns swap the frame's dimensions.
pub fn rotate_position(pos: Pos, size: Size, orientation: Orientation) -> Pos {
    match orientation {
        Orientation::North => pos,
        Orientation::East => Pos::new(size.height - 1 - pos.y, pos.x),
        Orientation::South => Pos::new(size.width - 1 - pos.x, size.height - 1 - pos.y),
        Orientation::West => Pos::new(pos.y, size.width - 1 - pos.x),
    }
}

pub fn rotated_size(size: Size, orientation: Orientation) -> Size {
    if orientation.quarter_turns() % 2 == 1 { size.swapped() } else { size }
}

/// Rasterized straight line from `from` to `to`, both endpoints included.
///
/// Steps once per cell along the longer axis; the shorter axis offset at step `i` is
/// `round(i * minor / major)` with halves rounded up. Working on absolute deltas keeps
/// the raster symmetric under quarter turns and mirroring.
pub fn line(from: Pos, to: Pos) -> Vec<Pos> {
    let delta = to - from;
    let (sign_x, sign_y) = (delta.x.signum(), delta.y.signum());
    let (dx, dy) = (delta.x.abs(), delta.y.abs());
    let x_major = dx >= dy;
    let (major, minor) = if x_major { (dx, dy) } else { (dy, dx) };

    if major == 0 {
        return vec![from];
    }

    let mut points = Vec::with_capacity(major as usize + 1);
    for i in 0..=major {
        let offset = (2 * i * minor + major) / (2 * major);
        let (ox, oy) = if x_major { (i, offset) } else { (offset, i) };
        points.push(from + Pos::new(ox * sign_x, oy * sign_y));
    }
    points
}

/// Midpoint circle outline around `center`, sorted row-major without duplicates.
pub fn circle(center: Pos, radius: i32) -> Vec<Pos> {
    if radius <= 0 {
        return vec![center];
    }

    let mut points = Vec::new();
    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;

    while x >= y {
        for (ox, oy) in [(x, y), (y, x)] {
            points.push(center + Pos::new(ox, oy));
            points.push(center + Pos::new(-ox, oy));
            points.push(center + Pos::new(ox, -oy));
            points.push(center + Pos::new(-ox, -oy));
        }

        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x + 1);
        }
    }

    points.sort();
    points.dedup();
    points
}
