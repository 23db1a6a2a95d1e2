//! Core engine types shared by the hoverboard workspace.
//!
//! This crate provides the foundational types used across all systems:
//! - Transform and spatial helpers
//! - Time management
//! - Common body components

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
