use thiserror::Error;

use crate::types::{Pos, Size};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("{stage} gave up after {attempts} attempts to find a free cell")]
    Saturated { stage: &'static str, attempts: usize },
    #[error("no prototype registered for {0:?}")]
    UnknownPrototype(String),
    #[error("dungeon size {0:?} has no cells")]
    EmptyGrid(Size),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IconGridError {
    #[error("icon grid for {size:?} needs {expected} cells, got {actual}")]
    SizeMismatch { size: Size, expected: usize, actual: usize },
    #[error("icon row {row} has {actual} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, actual: usize },
    #[error("no prototype uses icon {icon:?} (at {position:?})")]
    UnknownIcon { icon: char, position: Pos },
    #[error("dungeon size {0:?} has no cells")]
    InvalidSize(Size),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("dungeon {dungeon} was generated without a door to link back through")]
    NoDoorway { dungeon: usize },
    #[error("link {link} of dungeon {dungeon} has no partner")]
    UnresolvedLink { dungeon: usize, link: usize },
    #[error("dungeon index {0} does not exist")]
    NoSuchDungeon(usize),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}
