pub mod arena;
pub mod sim;

pub use arena::{Arena, Wall, WallName, ARENA_SIZE, WALL_DEPTH};
pub use sim::{Pose, SimState, Thing, MARGIN, NUM_THINGS, THING_SIZE};
