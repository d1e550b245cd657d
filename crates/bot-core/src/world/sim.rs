//! Owned simulation state and its single mutation path.
//!
//! `SimState` owns the bot pose, the obstacle set and the loop-enable flag.
//! Everything that moves the bot goes through `turn`/`move_steps` (shared by
//! agent commands and external input) and parsed commands are executed only
//! via [`SimState::apply`].

use rand::Rng;
use serde::Serialize;

use crate::agent::wire::Command;
use crate::geom::Rect;
use crate::world::arena::Arena;

/// Keep-out distance from the arena edge when clamping moves.
pub const MARGIN: f64 = 0.0;

/// Side length of a thing's bounding square.
pub const THING_SIZE: f64 = 11.0;

/// Number of things spawned into a fresh room.
pub const NUM_THINGS: usize = 5;

/// Heading the bot starts with: 270 degrees raw, i.e. facing the north wall.
const INITIAL_HEADING: f64 = 270.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Raw heading in degrees, kept in `[0, 360)`. 0 points along +x (east),
    /// angles grow clockwise on screen because +y points down.
    pub heading: f64,
}

/// A static point of interest the sensor can detect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thing {
    pub name: String,
    pub x: f64,
    pub y: f64,
    /// Per-tick display flag, recomputed by the sensor.
    pub hit: bool,
}

impl Thing {
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.x, self.y, THING_SIZE, THING_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimState {
    pub arena: Arena,
    pub pose: Pose,
    pub things: Vec<Thing>,
    /// Cooperative loop-enable flag; cleared by `done()`.
    pub run_enabled: bool,
}

impl SimState {
    /// Bot centered in the arena, facing north, no things yet.
    pub fn new(arena: Arena) -> Self {
        let half = arena.size / 2.0;
        Self {
            arena,
            pose: Pose {
                x: half,
                y: half,
                heading: INITIAL_HEADING,
            },
            things: Vec::new(),
            run_enabled: true,
        }
    }

    /// Spawn `count` things uniformly in the arena. The rng is injected so
    /// layouts are reproducible from a seed.
    pub fn spawn_things(&mut self, rng: &mut impl Rng, count: usize) {
        for i in 0..count {
            self.things.push(Thing {
                name: format!("thing{i}"),
                x: rng.gen_range(0.0..self.arena.size),
                y: rng.gen_range(0.0..self.arena.size),
                hit: false,
            });
        }
    }

    /// Add to the heading and reduce into `[0, 360)`.
    pub fn turn(&mut self, delta_degrees: f64) {
        self.pose.heading = (self.pose.heading + delta_degrees).rem_euclid(360.0);
    }

    /// Displace along the heading, clamping each axis to the arena
    /// independently. Things never block movement, only the edges do.
    pub fn move_steps(&mut self, steps: f64) {
        let rad = self.pose.heading.to_radians();
        let lo = MARGIN;
        let hi = self.arena.size - MARGIN;
        self.pose.x = (self.pose.x + steps * rad.cos()).clamp(lo, hi);
        self.pose.y = (self.pose.y + steps * rad.sin()).clamp(lo, hi);
    }

    /// Terminal signal: end the agent loop after the current tick.
    pub fn finish(&mut self) {
        self.run_enabled = false;
    }

    /// The only execution path for parsed commands.
    pub fn apply(&mut self, command: &Command) {
        match command {
            Command::Turn(degrees) => self.turn(*degrees),
            Command::Move(steps) => self.move_steps(*steps),
            Command::Done => self.finish(),
        }
    }
}

impl Default for SimState {
    fn default() -> Self {
        Self::new(Arena::default())
    }
}
