//! trigon engine crate.
//!
//! Platform + GPU runtime pieces for drawing a single triangle with wgpu:
//! device acquisition, a winit runtime loop, and the triangle renderer.

pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod window;
