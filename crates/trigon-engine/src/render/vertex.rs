//! Vertex data for the triangle, split into one buffer per attribute.

use bytemuck::{Pod, Zeroable};

use crate::paint::Color;

/// Clip-space vertex position (buffer slot 0, shader location 0).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Position(pub [f32; 3]);

impl Position {
    pub const SLOT: u32 = 0;

    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Position>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Linear RGB vertex color (buffer slot 1, shader location 1).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct VertexColor(pub [f32; 3]);

impl VertexColor {
    pub const SLOT: u32 = 1;

    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexColor>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

impl From<Color> for VertexColor {
    fn from(c: Color) -> Self {
        Self(c.to_rgb_array())
    }
}

/// The three vertices of the triangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TriangleMesh {
    pub positions: [Position; 3],
    pub colors: [VertexColor; 3],
}

impl TriangleMesh {
    pub const VERTEX_COUNT: u32 = 3;

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
}

impl Default for TriangleMesh {
    /// Bottom-right red, bottom-left green, top-center blue (clockwise).
    fn default() -> Self {
        Self {
            positions: [
                Position([1.0, -1.0, 0.0]),
                Position([-1.0, -1.0, 0.0]),
                Position([0.0, 1.0, 0.0]),
            ],
            colors: [
                VertexColor::from(Color::RED),
                VertexColor::from(Color::GREEN),
                VertexColor::from(Color::BLUE),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_use_separate_slots_and_locations() {
        let p = Position::layout();
        let c = VertexColor::layout();
        assert_eq!(p.array_stride, 12);
        assert_eq!(c.array_stride, 12);
        assert_eq!(p.attributes[0].shader_location, 0);
        assert_eq!(c.attributes[0].shader_location, 1);
        assert_eq!(p.attributes[0].offset, 0);
        assert_eq!(c.attributes[0].offset, 0);
        assert_eq!(p.attributes[0].format, wgpu::VertexFormat::Float32x3);
        assert_ne!(Position::SLOT, VertexColor::SLOT);
    }

    #[test]
    fn buffers_are_36_bytes_each() {
        let mesh = TriangleMesh::default();
        assert_eq!(mesh.position_bytes().len(), 36);
        assert_eq!(mesh.color_bytes().len(), 36);
    }

    #[test]
    fn default_mesh_winds_clockwise() {
        let [a, b, c] = TriangleMesh::default().positions.map(|p| p.0);
        let area2 = (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]);
        assert!(area2 < 0.0);
    }

    #[test]
    fn default_positions_are_in_clip_space() {
        for Position([x, y, z]) in TriangleMesh::default().positions {
            assert!((-1.0..=1.0).contains(&x));
            assert!((-1.0..=1.0).contains(&y));
            assert!((0.0..=1.0).contains(&z));
        }
    }

    #[test]
    fn position_bytes_start_with_first_x() {
        let mesh = TriangleMesh::default();
        let first = f32::from_ne_bytes(mesh.position_bytes()[0..4].try_into().unwrap());
        assert_eq!(first, 1.0);
    }
}
