//! Camera system for volume viewing.
//!
//! Provides a single concrete controller combining first-person fly
//! navigation, mouse-look, and arcball rotation about the volume origin.

/// Fly/look/arcball camera controller.
pub mod controller;
/// Core camera struct and view/projection matrix derivation.
pub mod core;

pub use controller::{CameraController, FlyDirection};
pub use core::Camera;
