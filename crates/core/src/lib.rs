//! Core of a grid dungeon crawler: geometry, pathfinding, the dungeon model with
//! vision and rotation, procedural generation, and the session that links
//! dungeons together through their doorways.

pub mod combat;
pub mod config;
pub mod content;
pub mod dungeon;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod mapgen;
pub mod pathfinding;
pub mod random;
pub mod session;
pub mod types;

#[cfg(test)]
mod test_support;

pub use combat::{CombatResolver, ExchangeBlows};
pub use config::DungeonConfig;
pub use content::{Catalog, EntityFactory};
pub use dungeon::{Dungeon, EventReport, Link, LinkPartner, Tile};
pub use entity::{Entity, Occupant, Player, Vitals};
pub use error::{GenerationError, IconGridError, SessionError};
pub use mapgen::{DungeonGenerator, generate_dungeon};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use session::{Command, LogEvent, Outcome, Session, TurnFlow};
pub use types::*;
