/// Spin3D Core Library - Stateless mesh and transform pipeline
///
/// This library provides the pure computation behind the renderer: OBJ
/// loading, flattening indexed meshes into per-corner vertex streams, normal
/// recomputation and smoothing, and the per-frame model/view/projection
/// builders plus the uniform set the shading stage consumes.

pub mod camera;
pub mod error;
pub mod mesh;
pub mod obj;
pub mod transform;
pub mod uniforms;

// Re-export commonly used types
pub use camera::Camera;
pub use error::Error;
pub use mesh::{smooth_normals, Corner, Face, FlatMesh, RawMesh};
pub use obj::parse_obj;
pub use transform::{deg_to_rad, row_major, TransformParams};
pub use uniforms::Uniforms;
