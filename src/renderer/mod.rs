//! WebGPU rendering module
//!
//! The wheel is tessellated on the CPU each frame (already rotated) and drawn
//! as a flat-colored triangle list.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{WheelRenderer, wheel_to_ndc};
pub use vertex::Vertex;
