//! World grid: tiles, positions and the generated map.
//!
//! The map is a fixed 16×16 grid produced once by a deterministic rule and
//! never mutated afterwards. All queries are total over the coordinate
//! domain; anything outside the bounds simply has no tile.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of map rows.
pub const ROWS: usize = 16;

/// Number of map columns.
pub const COLS: usize = 16;

// ============================================================================
// Coordinates
// ============================================================================

/// A cell coordinate. `x` is the column, `y` is the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step in `direction`. Saturates at the `i32`
    /// limits, which are far outside any map.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four movement directions. Diagonals are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Column/row offset for a single step. Rows grow downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Tiles
// ============================================================================

/// Terrain of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tile {
    Grass,
    Wall,
    Water,
}

impl Tile {
    /// Whether an actor may stand on this tile.
    pub fn is_passable(self) -> bool {
        matches!(self, Tile::Grass)
    }

    pub fn name(self) -> &'static str {
        match self {
            Tile::Grass => "grass",
            Tile::Wall => "wall",
            Tile::Water => "water",
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The static tile map, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    rows: Vec<Vec<Tile>>,
}

impl TileMap {
    /// Build the map from the fixed layout rule:
    /// a wall border, two interior wall segments and one water band.
    pub fn generate() -> Self {
        let rows = (0..ROWS)
            .map(|r| (0..COLS).map(|c| Self::tile_for(r, c)).collect())
            .collect();
        Self { rows }
    }

    fn tile_for(r: usize, c: usize) -> Tile {
        if r == 0 || c == 0 || r == ROWS - 1 || c == COLS - 1 {
            Tile::Wall
        } else if (r == 5 && c > 2 && c < 10) || (c == 9 && r > 8 && r < 14) {
            Tile::Wall
        } else if r == 12 && c > 4 && c < 12 {
            Tile::Water
        } else {
            Tile::Grass
        }
    }

    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Whether `pos` lies inside the map.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width()
            && (pos.y as usize) < self.height()
    }

    /// The tile at `pos`, or `None` outside the map.
    pub fn tile_at(&self, pos: Position) -> Option<Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.rows
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
            .copied()
    }

    /// True if `pos` is outside the map or its terrain cannot be walked on.
    ///
    /// Actor occupancy is layered on top by [`crate::world::GameState::is_blocked`].
    pub fn is_terrain_blocked(&self, pos: Position) -> bool {
        self.tile_at(pos).map(|t| !t.is_passable()).unwrap_or(true)
    }

    /// Iterate over rows for rendering.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

impl Default for TileMap {
    fn default() -> Self {
        Self::generate()
    }
}
