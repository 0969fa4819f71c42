//! Dungeon generation settings.
//!
//! Malformed input never surfaces as an error: every parser falls back to
//! [`DungeonConfig::default`] and logs a warning.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::Size;

pub const FIELD_COUNT: usize = 15;

/// Largest side a parsed configuration may request; grid arithmetic stays in `i32`.
pub const MAX_SIDE: i32 = 1024;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeConfig {
    /// When false the size is rolled at generation time.
    pub determined: bool,
    pub dungeon: Size,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageToggles {
    pub doors: bool,
    pub walls_outer: bool,
    pub hidden_path: bool,
    pub walls_parents: bool,
    pub walls_children: bool,
    pub walls_filler: bool,
    pub enemies: bool,
}

impl Default for StageToggles {
    fn default() -> Self {
        Self {
            doors: true,
            walls_outer: true,
            hidden_path: true,
            walls_parents: true,
            walls_children: true,
            walls_filler: true,
            enemies: true,
        }
    }
}

impl StageToggles {
    pub fn none() -> Self {
        Self {
            doors: false,
            walls_outer: false,
            hidden_path: false,
            walls_parents: false,
            walls_children: false,
            walls_filler: false,
            enemies: false,
        }
    }
}

/// Requested amounts per stage; zero selects the stage's built-in default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageAmounts {
    pub doors: u32,
    pub walls_parents: u32,
    pub walls_children: u32,
    pub walls_filler_cycles: u32,
    pub enemies: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub size: SizeConfig,
    pub generate: StageToggles,
    pub amount: StageAmounts,
}

impl DungeonConfig {
    /// A fixed-size grid with every stage switched off.
    pub fn empty(size: Size) -> Self {
        Self {
            size: SizeConfig { determined: true, dungeon: size },
            generate: StageToggles::none(),
            amount: StageAmounts::default(),
        }
    }

    /// Parses the flat field list: `determined, width, height`, the seven stage
    /// toggles in pipeline order, then the five amounts.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Self {
        match Self::try_from_fields(fields) {
            Some(config) => config.bounded(),
            None => {
                warn!(fields = fields.len(), "malformed configuration fields, using defaults");
                Self::default()
            }
        }
    }

    pub fn from_toml_str(text: &str) -> Self {
        toml::from_str::<Self>(text)
            .map(Self::bounded)
            .unwrap_or_else(|error| {
                warn!(%error, "unreadable TOML configuration, using defaults");
                Self::default()
            })
    }

    pub fn from_json_str(text: &str) -> Self {
        serde_json::from_str::<Self>(text)
            .map(Self::bounded)
            .unwrap_or_else(|error| {
                warn!(%error, "unreadable JSON configuration, using defaults");
                Self::default()
            })
    }

    fn bounded(self) -> Self {
        let Size { width, height } = self.size.dungeon;
        let limit = MAX_SIDE.unsigned_abs();
        if width.unsigned_abs() > limit || height.unsigned_abs() > limit {
            warn!(width, height, max = MAX_SIDE, "configured size out of range, using defaults");
            return Self::default();
        }
        self
    }

    fn try_from_fields<S: AsRef<str>>(fields: &[S]) -> Option<Self> {
        if fields.len() < FIELD_COUNT {
            return None;
        }
        let number = |index: usize| fields.get(index).and_then(|raw| parse::<i32>(raw.as_ref()));
        let flag = |index: usize| number(index).map(|value| value != 0);
        let amount = |index: usize| number(index).and_then(|value| u32::try_from(value).ok());

        Some(Self {
            size: SizeConfig {
                determined: flag(0)?,
                dungeon: Size::new(number(1)?, number(2)?),
            },
            generate: StageToggles {
                doors: flag(3)?,
                walls_outer: flag(4)?,
                hidden_path: flag(5)?,
                walls_parents: flag(6)?,
                walls_children: flag(7)?,
                walls_filler: flag(8)?,
                enemies: flag(9)?,
            },
            amount: StageAmounts {
                doors: amount(10)?,
                walls_parents: amount(11)?,
                walls_children: amount(12)?,
                walls_filler_cycles: amount(13)?,
                enemies: amount(14)?,
            },
        })
    }
}

fn parse<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}
