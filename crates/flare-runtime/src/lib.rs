//! Flare Runtime - Game loop infrastructure
//!
//! Provides the building blocks the effect layers plug into:
//! - `GameClock`: frame timing with a fixed-timestep accumulator
//! - `GameEvent` / `EventBus`: typed event queue for gameplay triggers
//! - `TimerQueue`: delayed and repeating callbacks advanced by frame time
//! - `RuntimeSystem`: trait for systems ticked by the game loop

mod clock;
mod event;
mod event_bus;
mod system;
mod timer;

pub use clock::GameClock;
pub use event::GameEvent;
pub use event_bus::EventBus;
pub use system::RuntimeSystem;
pub use timer::{Fired, TimerId, TimerQueue};
