//! Graviton Core - Shared types for the Graviton controller
//!
//! This crate provides the foundational types used by every other crate:
//! - Mathematical primitives (re-exported from glam)
//! - Transform used for bodies, anchors and the player view
//! - Frame timing with a fixed-timestep accumulator

pub mod time;
pub mod types;

pub use glam::{Quat, Vec2, Vec3};
pub use time::{GameTime, TimeConfig};
pub use types::Transform;
