//! WebGPU rendering module
//!
//! Flat colored triangles only: the scene is assembled on the CPU each frame
//! and uploaded as a single vertex buffer.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::scene;
pub use vertex::Vertex;
