//! First-person weapon: projectile launcher and gravity gun

mod config;
mod feedback;
pub mod grab;
mod mode;
mod spawner;

pub use config::WeaponConfig;
pub use feedback::{FeedbackSink, FireFeedback, LogFeedback};
pub use grab::{
    AttachmentTarget, GrabController, GrabError, GrabState, GrabbedObjectSlot, NoTargetReason,
};
pub use mode::{FireContext, FireOutcome, WeaponMode, WeaponModeSelector};
pub use spawner::ProjectileSpawner;
