/// Model transform construction driven by a per-frame animation counter
use nalgebra::{Matrix4, Vector3};

/// Degrees to radians with the single shared constant, the only conversion
/// site for the model transform.
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// Animation state plus the fixed object configuration. The frame counter is
/// the only per-frame mutation; everything else is authoring-time constant.
#[derive(Debug, Clone, Copy)]
pub struct TransformParams {
    /// Monotonically incrementing frame counter.
    pub frame: u32,
    pub translate: Vector3<f32>,
    pub scale: Vector3<f32>,
    /// Rotation rate per axis, in degrees per frame.
    pub spin_rates: Vector3<f32>,
}

impl TransformParams {
    pub fn new(translate: Vector3<f32>, scale: Vector3<f32>, spin_rates: Vector3<f32>) -> Self {
        Self {
            frame: 0,
            translate,
            scale,
            spin_rates,
        }
    }

    /// Advance the animation counter by one frame.
    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }

    /// Restart the animation.
    pub fn reset(&mut self) {
        self.frame = 0;
    }

    /// Current rotation angles in radians, angle = frame × rate × π/180.
    pub fn rotation_angles(&self) -> Vector3<f32> {
        let f = self.frame as f32;
        Vector3::new(
            deg_to_rad(f * self.spin_rates.x),
            deg_to_rad(f * self.spin_rates.y),
            deg_to_rad(f * self.spin_rates.z),
        )
    }

    /// Compose the model matrix: Rx·Ry·Rz·S, intrinsic rotations in that
    /// fixed order, then the translation column overwritten with the fixed
    /// translate vector. Rebuilt in full every frame; no caching.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        let angles = self.rotation_angles();
        let mut m = rotation_x(angles.x)
            * rotation_y(angles.y)
            * rotation_z(angles.z)
            * Matrix4::new_nonuniform_scaling(&self.scale);
        m[(0, 3)] = self.translate.x;
        m[(1, 3)] = self.translate.y;
        m[(2, 3)] = self.translate.z;
        m
    }
}

impl Default for TransformParams {
    fn default() -> Self {
        Self::new(
            Vector3::new(0.0, 0.0, -1.5),
            Vector3::new(0.15, 0.15, 0.15),
            Vector3::new(0.04, -0.08, 0.01),
        )
    }
}

/// Right-handed rotation about the x-axis.
pub fn rotation_x(theta: f32) -> Matrix4<f32> {
    let (sin, cos) = theta.sin_cos();
    #[rustfmt::skip]
    let m = Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, cos, -sin, 0.0,
        0.0, sin, cos, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );
    m
}

/// Right-handed rotation about the y-axis.
pub fn rotation_y(theta: f32) -> Matrix4<f32> {
    let (sin, cos) = theta.sin_cos();
    #[rustfmt::skip]
    let m = Matrix4::new(
        cos, 0.0, sin, 0.0,
        0.0, 1.0, 0.0, 0.0,
        -sin, 0.0, cos, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );
    m
}

/// Right-handed rotation about the z-axis.
pub fn rotation_z(theta: f32) -> Matrix4<f32> {
    let (sin, cos) = theta.sin_cos();
    #[rustfmt::skip]
    let m = Matrix4::new(
        cos, -sin, 0.0, 0.0,
        sin, cos, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );
    m
}

/// Matrix entries in row-major order, the layout the uniform upload contract
/// expects.
pub fn row_major(m: &Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut rows = [[0.0; 4]; 4];
    for (row, out) in rows.iter_mut().enumerate() {
        for (col, value) in out.iter_mut().enumerate() {
            *value = m[(row, col)];
        }
    }
    rows
}
