//! Core primitives for the room bot: geometry, sensor model, simulation
//! state, prompt protocol, agent loop, and the completion-service client.
//!
//! Rendering and input are external collaborators: they consume read-only
//! snapshots ([`sensor::Perception`], [`sensor::ray_fan`]) and share the
//! actuation surface on [`world::sim::SimState`].

pub mod agent;
pub mod geom;
pub mod llm;
pub mod sensor;
pub mod world;
