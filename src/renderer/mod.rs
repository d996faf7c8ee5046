//! WebGPU rendering module
//!
//! Classic vertex-buffer pipeline: dice are tessellated to colored
//! triangles on the CPU each frame and drawn with a passthrough shader.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
