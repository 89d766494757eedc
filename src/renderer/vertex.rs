//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Convert a 0xRRGGBB color to linear-ish float RGBA
pub const fn hex(rgb: u32, alpha: f32) -> [f32; 4] {
    [
        ((rgb >> 16) & 0xFF) as f32 / 255.0,
        ((rgb >> 8) & 0xFF) as f32 / 255.0,
        (rgb & 0xFF) as f32 / 255.0,
        alpha,
    ]
}

/// Colors for wheel elements
pub mod colors {
    use super::hex;

    pub const SEGMENT_EVEN: [f32; 4] = hex(0xFFFFFF, 1.0);
    pub const SEGMENT_ODD: [f32; 4] = hex(0xF3F6FF, 1.0);
    pub const SEGMENT_SELECTED: [f32; 4] = hex(0xFFE9A8, 1.0);
    pub const SEPARATOR: [f32; 4] = hex(0xE6EEFB, 1.0);
    pub const RIM: [f32; 4] = hex(0x3B5BDB, 1.0);
    pub const HUB: [f32; 4] = hex(0x3B5BDB, 1.0);
    pub const HUB_CAP: [f32; 4] = hex(0xFFFFFF, 1.0);
    pub const POINTER: [f32; 4] = hex(0xFF4D6D, 1.0);
    pub const BACKGROUND: [f32; 4] = hex(0xF7F9FF, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(hex(0xFF0000, 1.0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(hex(0x00FF00, 0.5), [0.0, 1.0, 0.0, 0.5]);
    }

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        let v = Vertex::new(1.0, 2.0, colors::POINTER);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 24);
    }
}
