//! Sensor model: casts the ray fan and derives the per-tick [`Perception`].
//!
//! The perception is the only information the agent receives about the room;
//! it is rebuilt from scratch every tick and never mutated in place. The
//! sensor holds no state of its own — its one side effect is refreshing the
//! per-tick `hit` display flags on the things it scanned.

use serde::Serialize;

use crate::geom::{segment_rect_hits, Point};
use crate::world::arena::WallName;
use crate::world::sim::{Pose, SimState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorConfig {
    /// Number of rays in the fan.
    pub num_rays: usize,
    /// Total angular spread of the fan, centered on the heading, in degrees.
    pub spread_deg: f64,
    /// Ray length. Must exceed the arena diagonal so the center ray always
    /// reaches a wall.
    pub ray_len: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            num_rays: 20,
            spread_deg: 20.0,
            ray_len: 800.0,
        }
    }
}

impl SensorConfig {
    /// Angular offset of ray `i` from the heading. Offsets run from
    /// `-spread/2` upward in `spread/num_rays` steps.
    fn offset_deg(&self, i: usize) -> f64 {
        i as f64 * (self.spread_deg / self.num_rays as f64) - self.spread_deg / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SightedThing {
    pub name: String,
    pub distance: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SightedWall {
    pub name: WallName,
    pub distance: i64,
}

/// Structured sensory snapshot derived each tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Perception {
    /// Bot position, floored to whole units.
    pub x: i64,
    pub y: i64,
    /// Heading in the reporting convention: `(-180, 180]`, 0 = facing north.
    pub heading: f64,
    pub things_in_sight: Vec<SightedThing>,
    /// The wall the zero-offset center ray hits — "the wall the bot is
    /// pointed at", not the nearest wall overall.
    pub wall_in_sight: Option<SightedWall>,
}

/// Map the raw internal heading (0 = +x, clockwise) to the reporting
/// convention where 0 = north and values lie in `(-180, 180]`.
///
/// The transform is `((raw - 90) mod 360) - 180`; the single boundary value
/// -180 (facing south) is folded to +180 so the range is half-open at the
/// negative end.
pub fn reported_heading(raw: f64) -> f64 {
    let h = (raw - 90.0).rem_euclid(360.0) - 180.0;
    if h <= -180.0 {
        h + 360.0
    } else {
        h
    }
}

/// Endpoint of the ray with angular offset `offset_deg` from the pose.
fn ray_endpoint(pose: &Pose, offset_deg: f64, len: f64) -> Point {
    let rad = (pose.heading + offset_deg).to_radians();
    Point::new(pose.x + len * rad.cos(), pose.y + len * rad.sin())
}

/// The fan's segments, origin first, for renderers.
pub fn ray_fan(pose: &Pose, cfg: &SensorConfig) -> Vec<(Point, Point)> {
    let origin = Point::new(pose.x, pose.y);
    (0..cfg.num_rays)
        .map(|i| (origin, ray_endpoint(pose, cfg.offset_deg(i), cfg.ray_len)))
        .collect()
}

/// Cast the full fan and build the perception for the current pose.
///
/// Per thing, rays are tried in fan order and the first one that crosses the
/// thing's bounding square records it — one ray/thing pair at most, distance
/// floored, scan stops there. Walls are probed with the center ray only, in
/// the arena's fixed wall order, first hit wins.
pub fn perceive(state: &mut SimState, cfg: &SensorConfig) -> Perception {
    let pose = state.pose;
    let origin = Point::new(pose.x, pose.y);

    let mut things_in_sight = Vec::new();
    for thing in &mut state.things {
        thing.hit = false;
        let bounds = thing.bounds();
        for i in 0..cfg.num_rays {
            let end = ray_endpoint(&pose, cfg.offset_deg(i), cfg.ray_len);
            if let Some((_, point)) = segment_rect_hits(origin, end, &bounds).first() {
                things_in_sight.push(SightedThing {
                    name: thing.name.clone(),
                    distance: origin.distance_to(&point).floor() as i64,
                });
                thing.hit = true;
                break;
            }
        }
    }

    let center_end = ray_endpoint(&pose, 0.0, cfg.ray_len);
    let mut wall_in_sight = None;
    for wall in state.arena.walls() {
        if let Some((_, point)) = segment_rect_hits(origin, center_end, &wall.bounds()).first() {
            wall_in_sight = Some(SightedWall {
                name: wall.name,
                distance: origin.distance_to(&point).floor() as i64,
            });
            break;
        }
    }

    Perception {
        x: pose.x.floor() as i64,
        y: pose.y.floor() as i64,
        heading: reported_heading(pose.heading),
        things_in_sight,
        wall_in_sight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::arena::Arena;
    use crate::world::sim::Thing;

    fn sim_with_things(things: Vec<(f64, f64)>) -> SimState {
        let mut sim = SimState::new(Arena::default());
        sim.things = things
            .into_iter()
            .enumerate()
            .map(|(i, (x, y))| Thing {
                name: format!("thing{i}"),
                x,
                y,
                hit: false,
            })
            .collect();
        sim
    }

    #[test]
    fn reported_heading_is_in_half_open_range() {
        // Facing north (raw 270) reports 0.
        assert_eq!(reported_heading(270.0), 0.0);
        // Facing east (raw 0) reports 90.
        assert_eq!(reported_heading(0.0), 90.0);
        // Facing west (raw 180) reports -90.
        assert_eq!(reported_heading(180.0), -90.0);
        // Facing south (raw 90) folds the -180 boundary to +180.
        assert_eq!(reported_heading(90.0), 180.0);

        let mut raw: f64 = 0.0;
        for _ in 0..720 {
            raw += 7.3;
            let h = reported_heading(raw.rem_euclid(360.0));
            assert!(h > -180.0 && h <= 180.0, "heading {h} out of range");
        }
    }

    #[test]
    fn perception_is_deterministic() {
        let mut sim = sim_with_things(vec![(250.0, 100.0), (40.0, 470.0)]);
        let cfg = SensorConfig::default();
        let first = perceive(&mut sim, &cfg);
        let second = perceive(&mut sim, &cfg);
        assert_eq!(first, second);
    }

    #[test]
    fn center_ray_reports_the_faced_wall() {
        // Centered, facing north: the center ray crosses the north wall; side
        // priority picks the wall's far (top) edge at y = -5, 255 units away.
        let mut sim = sim_with_things(vec![]);
        let p = perceive(&mut sim, &SensorConfig::default());
        let wall = p.wall_in_sight.expect("enclosed arena");
        assert_eq!(wall.name, WallName::North);
        assert_eq!(wall.distance, 255);
        assert_eq!((p.x, p.y), (250, 250));
        assert_eq!(p.heading, 0.0);
    }

    #[test]
    fn single_ray_distance_is_floored_euclidean() {
        // One ray, no spread: the fan degenerates to the heading line. Facing
        // east from (100, 250) toward a thing at (300, 250): the thing's near
        // (left) edge sits at x = 294.5, so the true distance is 194.5.
        let mut sim = sim_with_things(vec![(300.0, 250.0)]);
        sim.pose.x = 100.0;
        sim.pose.heading = 0.0;
        let cfg = SensorConfig {
            num_rays: 1,
            spread_deg: 0.0,
            ray_len: 800.0,
        };

        let p = perceive(&mut sim, &cfg);
        assert_eq!(p.things_in_sight.len(), 1);
        assert_eq!(p.things_in_sight[0].name, "thing0");
        assert_eq!(p.things_in_sight[0].distance, 194);
        assert!(sim.things[0].hit);
    }

    #[test]
    fn things_outside_the_fan_are_omitted() {
        // Directly behind the bot (facing north, thing due south).
        let mut sim = sim_with_things(vec![(250.0, 400.0)]);
        let p = perceive(&mut sim, &SensorConfig::default());
        assert!(p.things_in_sight.is_empty());
        assert!(!sim.things[0].hit);
    }

    #[test]
    fn one_entry_per_thing_even_when_many_rays_hit() {
        // Dead ahead and large enough that several rays cross it.
        let mut sim = sim_with_things(vec![(250.0, 150.0)]);
        let p = perceive(&mut sim, &SensorConfig::default());
        assert_eq!(p.things_in_sight.len(), 1);
    }

    #[test]
    fn ray_fan_has_one_segment_per_ray() {
        let sim = SimState::default();
        let cfg = SensorConfig::default();
        let fan = ray_fan(&sim.pose, &cfg);
        assert_eq!(fan.len(), cfg.num_rays);
        for (origin, _) in &fan {
            assert_eq!((origin.x, origin.y), (250.0, 250.0));
        }
    }
}
