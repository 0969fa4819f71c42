//! Character-grid import and export, used by fixtures and the tools binary.

use tracing::debug;

use super::Dungeon;
use crate::content::EntityFactory;
use crate::entity::Player;
use crate::error::IconGridError;
use crate::types::{EMPTY_ICON, PLAYER_ICON, Pos, Size};

impl Dungeon {
    /// Builds a dungeon from one icon per cell in row-major order. `EMPTY_ICON`
    /// leaves a cell bare, `PLAYER_ICON` marks where the player starts, anything
    /// else must name a prototype icon.
    pub fn from_icons(
        size: Size,
        icons: &[char],
        factory: &EntityFactory,
        player: &Player,
    ) -> Result<Self, IconGridError> {
        if size.width <= 0 || size.height <= 0 {
            return Err(IconGridError::InvalidSize(size));
        }
        let expected = size.area() as usize;
        if icons.len() != expected {
            return Err(IconGridError::SizeMismatch { size, expected, actual: icons.len() });
        }

        let mut dungeon = Self::new(size);
        let mut start = None;
        for (position, &icon) in size.positions().zip(icons) {
            match icon {
                EMPTY_ICON => {}
                PLAYER_ICON => start = Some(position),
                _ => {
                    let prototype = factory
                        .get_by_icon(icon)
                        .ok_or(IconGridError::UnknownIcon { icon, position })?;
                    dungeon.entity_insert(position, prototype.clone());
                }
            }
        }

        if let Some(position) = start {
            dungeon.place_player(position, player);
        }
        debug!(?size, entities = dungeon.entity_count(), "dungeon loaded from icons");
        Ok(dungeon)
    }

    /// Parses newline-separated rows; every row must have the same width.
    pub fn from_icon_rows(
        rows: &str,
        factory: &EntityFactory,
        player: &Player,
    ) -> Result<Self, IconGridError> {
        let lines: Vec<&str> = rows.lines().map(str::trim).filter(|row| !row.is_empty()).collect();
        let width = lines.first().map_or(0, |row| row.chars().count());
        for (row, line) in lines.iter().enumerate() {
            let actual = line.chars().count();
            if actual != width {
                return Err(IconGridError::RaggedRow { row, expected: width, actual });
            }
        }
        let size = Size::new(width as i32, lines.len() as i32);
        let icons: Vec<char> = lines.iter().flat_map(|row| row.chars()).collect();
        Self::from_icons(size, &icons, factory, player)
    }

    pub fn icons(&self) -> Vec<char> {
        self.tiles.iter().map(|tile| tile.icon).collect()
    }

    pub fn icon_rows(&self) -> Vec<String> {
        let width = self.size.width.max(1) as usize;
        self.icons().chunks(width).map(|row| row.iter().collect()).collect()
    }

    /// Like [`Dungeon::icon_rows`], with cells outside the vision set blanked.
    pub fn visible_rows(&self) -> Vec<String> {
        let mut rows = Vec::with_capacity(self.size.height.max(0) as usize);
        for y in 0..self.size.height {
            let row = (0..self.size.width)
                .map(|x| {
                    let pos = Pos::new(x, y);
                    if self.visible(pos) { self.tile(pos).icon } else { ' ' }
                })
                .collect();
            rows.push(row);
        }
        rows
    }
}
