use std::ops::{Add, Mul, Sub};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EntityKey;
}

/// Grid cell coordinate. Ordering is row-major (`y` first) so sorted sets walk the
/// grid the same way the tile array does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }
}

impl Add for Pos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { y: self.y + rhs.y, x: self.x + rhs.x }
    }
}

impl Sub for Pos {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self { y: self.y - rhs.y, x: self.x - rhs.x }
    }
}

impl Mul<i32> for Pos {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self { y: self.y * rhs, x: self.x * rhs }
    }
}

/// Grid dimensions in cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn area(self) -> i32 {
        self.width * self.height
    }

    pub fn center(self) -> Pos {
        Pos::new(self.width / 2, self.height / 2)
    }

    pub fn swapped(self) -> Self {
        Self { width: self.height, height: self.width }
    }

    /// Row-major tile index. Callers bounds-check first.
    pub fn index(self, pos: Pos) -> usize {
        (pos.y as usize) * (self.width as usize) + (pos.x as usize)
    }

    pub fn positions(self) -> impl Iterator<Item = Pos> {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Pos::new(x, y)))
    }
}

/// Cardinal direction, doubling as a clockwise rotation in quarter turns
/// (`North` is the identity, `East` a quarter turn, and so on).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    pub fn quarter_turns(self) -> i32 {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    pub fn from_quarter_turns(turns: i32) -> Self {
        match turns.rem_euclid(4) {
            0 => Self::North,
            1 => Self::East,
            2 => Self::South,
            _ => Self::West,
        }
    }

    pub fn offset(self) -> Pos {
        match self {
            Self::North => Pos::new(0, -1),
            Self::East => Pos::new(1, 0),
            Self::South => Pos::new(0, 1),
            Self::West => Pos::new(-1, 0),
        }
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Attributes: u8 {
        const OBSTACLE = 1 << 0;
        const HOSTILE = 1 << 1;
        const MOVEMENT = 1 << 2;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PlayerStates: u8 {
        const SWAPPING = 1 << 0;
    }
}

/// Icon shown on a tile with no occupants.
pub const EMPTY_ICON: char = '-';
/// Icon of the player occupant and of the player start cell in icon grids.
pub const PLAYER_ICON: char = '@';
