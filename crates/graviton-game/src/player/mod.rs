//! Player module
//!
//! Movement for the kinematic capsule plus the first-person character that
//! carries the camera and the weapon.

mod character;
mod controller;

pub use character::{FirstPersonCharacter, PlayerConfig, WeaponActions};
pub use controller::{MovementConfig, PlayerController, Traction};
