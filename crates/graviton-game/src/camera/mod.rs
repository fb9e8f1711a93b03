//! First-person camera with mouse and stick look

mod config;
mod controller;

pub use config::CameraConfig;
pub use controller::FirstPersonCamera;
