//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
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

/// Face colors per die kind, plus shared chrome
pub mod colors {
    pub const D4: [f32; 4] = [0.91, 0.45, 0.32, 1.0]; // Terracotta
    pub const D6: [f32; 4] = [0.36, 0.62, 0.93, 1.0];
    pub const D8: [f32; 4] = [0.45, 0.82, 0.50, 1.0];
    pub const D10: [f32; 4] = [0.93, 0.78, 0.33, 1.0];
    pub const D12: [f32; 4] = [0.72, 0.50, 0.90, 1.0];
    pub const D20: [f32; 4] = [0.92, 0.34, 0.50, 1.0];
    pub const EDGE: [f32; 4] = [0.08, 0.09, 0.12, 1.0];
    /// Table felt behind the dice
    pub const BACKGROUND: [f32; 4] = [0.03, 0.08, 0.05, 1.0];
}
