//! Flare ECS - hecs storage with stable ids
//!
//! Effect layers read the player's transform from here and mirror their
//! cosmetic state back as TOML components.

mod component;
mod world;

pub use component::ComponentTable;
pub use world::FlareWorld;
