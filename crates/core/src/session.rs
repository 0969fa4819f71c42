//! A running game: the player, every dungeon generated so far, and the doorway
//! bookkeeping that ties them together.
//!
//! Partner dungeons are generated lazily. Entering a dungeon resolves its own
//! doorways, so the world only ever grows one step ahead of the player.

use std::hash::Hasher;

use tracing::{debug, info};
use xxhash_rust::xxh3::Xxh3;

use crate::combat::{CombatResolver, ExchangeBlows};
use crate::config::DungeonConfig;
use crate::content::{Catalog, EntityFactory};
use crate::dungeon::{Dungeon, LinkPartner};
use crate::entity::Player;
use crate::error::SessionError;
use crate::geometry::{quadrant, rotate_position};
use crate::mapgen::DungeonGenerator;
use crate::random::{RandomSource, SeededRandom};
use crate::types::{Orientation, PlayerStates};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Orientation),
    /// Turns the active dungeon; does not use up the turn.
    Rotate(Orientation),
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Defeated,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnFlow {
    Continue,
    /// Same turn again; ask for another command.
    Repeat,
    Ended(Outcome),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
    EnemyDefeated { turn: u64, name: String },
    DungeonEntered { turn: u64, from: usize, to: usize },
    DungeonRotated { turn: u64, dungeon: usize, orientation: Orientation },
    PlayerDefeated { turn: u64 },
}

/// Rotation that lines the destination up with the side the player left through,
/// so the exit ends up on the side opposite the entrance.
pub fn alignment(entrance_side: Orientation, exit_side: Orientation) -> Orientation {
    let turns = (entrance_side.quarter_turns() - exit_side.quarter_turns() + 3) % 4 - 1;
    Orientation::from_quarter_turns(turns)
}

pub struct Session {
    config: DungeonConfig,
    catalog: Catalog,
    factory: EntityFactory,
    random: Box<dyn RandomSource>,
    combat: Box<dyn CombatResolver>,
    player: Player,
    dungeons: Vec<Dungeon>,
    index: usize,
    turn: u64,
    log: Vec<LogEvent>,
}

impl Session {
    pub fn new(config: DungeonConfig, seed: u64) -> Result<Self, SessionError> {
        Self::with_random(config, Catalog::standard(), Box::new(SeededRandom::new(seed)))
    }

    /// Generates the first dungeon, resolves its doorways and puts the player at
    /// its center.
    pub fn with_random(
        config: DungeonConfig,
        catalog: Catalog,
        random: Box<dyn RandomSource>,
    ) -> Result<Self, SessionError> {
        let mut session = Self::from_dungeons(config, catalog, random, Vec::new(), 0);
        session.reset()?;
        Ok(session)
    }

    /// Wraps prepared dungeons as they are: no generation, no link resolution and
    /// no player placement.
    pub fn from_dungeons(
        config: DungeonConfig,
        catalog: Catalog,
        random: Box<dyn RandomSource>,
        dungeons: Vec<Dungeon>,
        index: usize,
    ) -> Self {
        let factory = EntityFactory::new(&catalog);
        Self {
            config,
            catalog,
            factory,
            random,
            combat: Box::new(ExchangeBlows),
            player: Catalog::default_player(),
            dungeons,
            index,
            turn: 0,
            log: Vec::new(),
        }
    }

    pub fn set_combat(&mut self, combat: Box<dyn CombatResolver>) {
        self.combat = combat;
    }

    pub fn set_player(&mut self, player: Player) {
        self.player = player;
    }

    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.player = Catalog::default_player();
        self.dungeons.clear();
        self.index = 0;
        self.turn = 0;
        self.log.clear();

        let first = self.generate()?;
        self.dungeons.push(first);
        self.resolve_links(0)?;

        let Some(dungeon) = self.dungeons.first_mut() else {
            return Err(SessionError::NoSuchDungeon(0));
        };
        let center = dungeon.size().center();
        dungeon.place_player(center, &self.player);
        info!(size = ?dungeon.size(), "session started");
        Ok(())
    }

    fn generate(&mut self) -> Result<Dungeon, SessionError> {
        let generator = DungeonGenerator::new(&self.factory, &self.catalog);
        Ok(generator.generate(&self.config, self.random.as_mut())?)
    }

    fn dungeon_mut(&mut self, index: usize) -> Result<&mut Dungeon, SessionError> {
        self.dungeons.get_mut(index).ok_or(SessionError::NoSuchDungeon(index))
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn dungeons(&self) -> &[Dungeon] {
        &self.dungeons
    }

    pub fn dungeon(&self, index: usize) -> Option<&Dungeon> {
        self.dungeons.get(index)
    }

    pub fn active_index(&self) -> usize {
        self.index
    }

    pub fn active(&self) -> Option<&Dungeon> {
        self.dungeons.get(self.index)
    }

    pub fn current_turn(&self) -> u64 {
        self.turn
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    /// Gives every unresolved doorway of `index` a freshly generated partner,
    /// paired through the partner's first doorway.
    pub fn resolve_links(&mut self, index: usize) -> Result<(), SessionError> {
        let pending: Vec<usize> = self
            .dungeons
            .get(index)
            .ok_or(SessionError::NoSuchDungeon(index))?
            .links
            .iter()
            .enumerate()
            .filter(|(_, link)| link.partner.is_none())
            .map(|(position, _)| position)
            .collect();

        for link in pending {
            let mut partner = self.generate()?;
            let partner_index = self.dungeons.len();
            let current = self.dungeon_mut(index)?;
            let entrance = current.links[link].entrance;

            let Some(doorway) = partner.links.first_mut() else {
                return Err(SessionError::NoDoorway { dungeon: partner_index });
            };
            doorway.partner = Some(LinkPartner { dungeon: index, link, exit: entrance });
            let exit = doorway.entrance;

            current.links[link].partner =
                Some(LinkPartner { dungeon: partner_index, link: 0, exit });
            self.dungeons.push(partner);
            info!(from = index, link, to = partner_index, "doorway resolved");
        }
        Ok(())
    }

    /// Rotates dungeon `index` together with every link position expressed in its
    /// frame: its own entrances and the exits its partners hold.
    pub fn rotate_dungeon(
        &mut self,
        index: usize,
        orientation: Orientation,
    ) -> Result<(), SessionError> {
        let dungeon = self.dungeons.get(index).ok_or(SessionError::NoSuchDungeon(index))?;
        let before = dungeon.size();
        let links = dungeon.links.clone();

        for (link, current) in links.iter().enumerate() {
            if let Some(partner) = current.partner {
                let known = self
                    .dungeons
                    .get(partner.dungeon)
                    .and_then(|other| other.links.get(partner.link))
                    .is_some_and(|reciprocal| reciprocal.partner.is_some());
                if !known {
                    return Err(SessionError::UnresolvedLink { dungeon: index, link });
                }
            }
        }

        for (link, current) in links.iter().enumerate() {
            self.dungeons[index].links[link].entrance =
                rotate_position(current.entrance, before, orientation);
            let Some(partner) = current.partner else {
                continue;
            };
            if let Some(reciprocal) = self.dungeons[partner.dungeon].links[partner.link]
                .partner
                .as_mut()
            {
                reciprocal.exit = rotate_position(reciprocal.exit, before, orientation);
            }
        }

        self.dungeons[index].rotate(orientation);
        self.log.push(LogEvent::DungeonRotated { turn: self.turn, dungeon: index, orientation });
        debug!(dungeon = index, ?orientation, "dungeon rotated");
        Ok(())
    }

    /// Moves the player through link `link` of the active dungeon into its partner.
    pub fn swap(&mut self, link: usize) -> Result<(), SessionError> {
        let previous = self.index;
        let current = self.dungeons.get(previous).ok_or(SessionError::NoSuchDungeon(previous))?;
        let Some(partner) = current.links.get(link).and_then(|traversed| traversed.partner) else {
            return Err(SessionError::UnresolvedLink { dungeon: previous, link });
        };
        let entrance_side = quadrant(current.links[link].entrance, current.size());
        let next = self
            .dungeons
            .get(partner.dungeon)
            .ok_or(SessionError::NoSuchDungeon(partner.dungeon))?;
        let exit_side = quadrant(partner.exit, next.size());
        let align = alignment(entrance_side, exit_side);

        self.resolve_links(partner.dungeon)?;
        self.index = partner.dungeon;
        if let Some(next) = self.dungeons.get_mut(partner.dungeon) {
            next.place_player(partner.exit, &self.player);
        }
        self.rotate_dungeon(partner.dungeon, align)?;

        self.log.push(LogEvent::DungeonEntered { turn: self.turn, from: previous, to: self.index });
        info!(from = previous, to = self.index, ?align, "player changed dungeon");
        Ok(())
    }

    pub fn advance(&mut self, command: Command) -> Result<TurnFlow, SessionError> {
        let orientation = match command {
            Command::Quit => return Ok(TurnFlow::Ended(Outcome::Quit)),
            Command::Rotate(orientation) => {
                self.rotate_dungeon(self.index, orientation)?;
                return Ok(TurnFlow::Repeat);
            }
            Command::Move(orientation) => orientation,
        };

        let Some(dungeon) = self.dungeons.get_mut(self.index) else {
            return Err(SessionError::NoSuchDungeon(self.index));
        };
        dungeon.move_player(orientation, &self.player);
        dungeon.move_random(self.random.as_mut());
        let report = dungeon.events(&mut self.player, self.combat.as_mut());
        self.player.update();
        self.turn += 1;

        for name in report.defeated {
            self.log.push(LogEvent::EnemyDefeated { turn: self.turn, name });
        }
        if !self.player.is_alive() {
            self.log.push(LogEvent::PlayerDefeated { turn: self.turn });
            info!(turn = self.turn, "player defeated");
            return Ok(TurnFlow::Ended(Outcome::Defeated));
        }

        if self.player.states.contains(PlayerStates::SWAPPING) {
            self.player.states.remove(PlayerStates::SWAPPING);
            if let Some(link) = report.departed_through {
                self.swap(link)?;
            }
        }
        Ok(TurnFlow::Continue)
    }

    /// Digest of every dungeon, the active index and the player's vitals.
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.index as u64);
        hasher.write_u64(self.turn);
        hasher.write_i32(self.player.vitals.health);
        for dungeon in &self.dungeons {
            hasher.write_u64(dungeon.fingerprint());
        }
        hasher.finish()
    }
}
