/// The named uniform set handed to the shading stage each frame
use nalgebra::Matrix4;

use crate::camera::Camera;
use crate::error::Error;
use crate::transform::TransformParams;

/// Everything the shading stage consumes, under the names of the uniform
/// contract: `Model`, `View`, `Projection`, `PI`, `LightRGB`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniforms {
    pub model: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub pi: f32,
    pub light_rgb: [f32; 4],
}

pub const WHITE_LIGHT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

impl Uniforms {
    /// Rebuild the full set from the current animation state. Called once per
    /// frame; nothing is cached across frames.
    pub fn assemble(params: &TransformParams, camera: &Camera) -> Result<Self, Error> {
        Ok(Self {
            model: params.model_matrix(),
            view: camera.view_matrix()?,
            projection: camera.projection_matrix()?,
            pi: std::f32::consts::PI,
            light_rgb: WHITE_LIGHT,
        })
    }

    /// Combined clip-space transform, projection · view · model.
    pub fn mvp(&self) -> Matrix4<f32> {
        self.projection * self.view * self.model
    }
}
