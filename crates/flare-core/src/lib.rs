//! Flare Core - Foundational types for the Flare effect layers
//!
//! This crate provides the core types that all other Flare crates depend on:
//! - `EntityId` - Stable entity identifiers
//! - `Transform`, `Vec3`, `Color` - Spatial and colour types
//! - Error types and Result alias

mod error;
mod id;
mod types;

pub use error::{FlareError, Result};
pub use id::EntityId;
pub use types::{Color, Transform, Vec3};
