//! The arena: a fixed square room bordered by four named walls.

use serde::Serialize;

use crate::geom::Rect;

/// Side length of the square arena.
pub const ARENA_SIZE: f64 = 500.0;

/// Thickness of the wall rectangles that border the arena.
pub const WALL_DEPTH: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WallName {
    North,
    South,
    West,
    East,
}

impl WallName {
    pub fn as_str(&self) -> &'static str {
        match self {
            WallName::North => "north",
            WallName::South => "south",
            WallName::West => "west",
            WallName::East => "east",
        }
    }
}

impl std::fmt::Display for WallName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One border wall, addressed by its center like everything else the sensor
/// sees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub name: WallName,
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

impl Wall {
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.cx, self.cy, self.w, self.h)
    }
}

/// Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Arena {
    pub size: f64,
    walls: [Wall; 4],
}

impl Arena {
    /// The standard room: a `size` x `size` square with walls centered on its
    /// edges. Wall order here is also the sensor's scan order.
    pub fn standard(size: f64) -> Self {
        let half = size / 2.0;
        Self {
            size,
            walls: [
                Wall {
                    name: WallName::North,
                    cx: half,
                    cy: 0.0,
                    w: size,
                    h: WALL_DEPTH,
                },
                Wall {
                    name: WallName::South,
                    cx: half,
                    cy: size,
                    w: size,
                    h: WALL_DEPTH,
                },
                Wall {
                    name: WallName::West,
                    cx: 0.0,
                    cy: half,
                    w: WALL_DEPTH,
                    h: size,
                },
                Wall {
                    name: WallName::East,
                    cx: size,
                    cy: half,
                    w: WALL_DEPTH,
                    h: size,
                },
            ],
        }
    }

    pub fn walls(&self) -> &[Wall; 4] {
        &self.walls
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::standard(ARENA_SIZE)
    }
}
