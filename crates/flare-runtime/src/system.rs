//! Runtime system trait

use crate::event::GameEvent;
use flare_core::Result;
use flare_ecs::FlareWorld;

/// A system that can be ticked by the game loop
///
/// Systems are updated in registration order. Events drained from the bus
/// are handed to every system before its per-frame `update`.
pub trait RuntimeSystem {
    /// Called once when the system is first registered
    fn initialize(&mut self, world: &mut FlareWorld) -> Result<()>;

    /// Called at a fixed rate (e.g. 60Hz) for deterministic simulation
    fn fixed_update(&mut self, world: &mut FlareWorld, dt: f64) -> Result<()>;

    /// React to the events raised since the previous frame
    fn handle_events(&mut self, world: &mut FlareWorld, events: &[GameEvent]) -> Result<()>;

    /// Called once per frame for variable-rate logic
    fn update(&mut self, world: &mut FlareWorld, dt: f64) -> Result<()>;

    /// Called when the system is being shut down
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
