//! Flatshade Core Library - software geometry pipeline
//!
//! Transforms shapes into camera space, projects, culls, flat-shades and
//! clips them, then emits screen-space triangles ordered back to front for a
//! painter's-algorithm display sink.

pub mod clip;
pub mod error;
pub mod geometry;
pub mod light;
pub mod pipeline;
pub mod projection;
pub mod scene;
pub mod stl;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use clip::{clip_triangle, Plane};
pub use error::{Error, Result};
pub use geometry::{Color, Primitive, Shape, ShapeData};
pub use light::DirectionalLight;
pub use pipeline::{
    DisplaySink, DrawQueue, Frame, FrameStats, Pipeline, RasterTriangle, RenderConfig,
};
pub use projection::{Camera, FrameTransforms};
pub use scene::{Scene, ShapeId};
pub use transform::{Placement, Transform};
pub use vector::Vec4;
