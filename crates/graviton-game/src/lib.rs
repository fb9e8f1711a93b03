//! Graviton Game - First-person character and weapon logic
//!
//! Provides the input layer, the first-person camera, player movement, and the
//! two-mode weapon (projectile launcher and gravity gun).

pub mod camera;
pub mod input;
pub mod player;
pub mod weapon;

pub use camera::{CameraConfig, FirstPersonCamera};
pub use input::{BindingTarget, InputAction, InputAxis, InputBinding, InputBindings, InputHandler, InputState};
pub use player::{
    FirstPersonCharacter, MovementConfig, PlayerConfig, PlayerController, Traction, WeaponActions,
};
pub use weapon::{
    AttachmentTarget, FeedbackSink, FireContext, FireFeedback, FireOutcome, GrabController,
    GrabError, GrabState, GrabbedObjectSlot, LogFeedback, NoTargetReason, ProjectileSpawner,
    WeaponConfig, WeaponMode, WeaponModeSelector,
};
