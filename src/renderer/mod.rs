//! WebGPU rendering module
//!
//! Flat-colored triangles for bricks, paddle and ball; text goes to an
//! overlay owned by the front end.

pub mod canvas;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use canvas::{Canvas, VertexCanvas, draw_frame};
pub use pipeline::RenderState;
pub use vertex::Vertex;
