//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (shader module, pipeline, buffers) and
//! build them lazily the first time they see a given target format.
//!
//! Convention: triangle geometry is specified directly in clip space
//! (x right, y up, both in `[-1, 1]`).

mod ctx;
pub mod offscreen;
pub mod triangle;
pub mod vertex;

pub use ctx::{RenderCtx, RenderTarget};
pub use triangle::{TriangleRenderer, TriangleSource};
pub use vertex::{Position, TriangleMesh, VertexColor};
