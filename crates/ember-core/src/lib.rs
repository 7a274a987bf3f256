//! Ember Core - Plain-data component payloads for the Ember engine
//!
//! This crate provides the component values the renderer and gameplay code
//! hand to the ECS:
//! - Mathematical primitives (re-exported from glam)
//! - Transform component for object positioning
//! - Disney-BRDF material parameter block with indexed field access

pub mod material;
pub mod types;

pub use glam::{EulerRot, Mat4, Quat, Vec2, Vec3, Vec4};
pub use material::{Material, MaterialError, MaterialField};
pub use types::Transform;
