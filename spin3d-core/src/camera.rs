/// Camera configuration and the view/projection builders
use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::Error;
use crate::transform::deg_to_rad;

const EPSILON: f32 = 1e-6;

/// Camera and frustum configuration. Mutated only on resize; the matrix
/// builders are pure and recomputed in full every frame.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::origin(),
            target: Point3::new(0.0, 0.0, -1.5),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: deg_to_rad(60.0),
            near: 0.5,
            far: 5.0,
            aspect: width as f32 / height as f32,
        }
    }

    /// Record new viewport dimensions. Only the stored aspect ratio changes;
    /// the next frame's projection build picks it up.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    /// Build the right-handed look-at view matrix.
    ///
    /// W = normalize(position − target), U = normalize(up × W), V = W × U;
    /// rows are U, V, W with fourth column −dot(position, axis) and final row
    /// (0, 0, 0, 1). Fails with [`Error::DegenerateCamera`] when the eye
    /// coincides with the target or up is parallel to the view direction,
    /// before either zero-length axis can turn into NaNs.
    pub fn view_matrix(&self) -> Result<Matrix4<f32>, Error> {
        let towards = self.position - self.target;
        if towards.norm() < EPSILON {
            return Err(Error::DegenerateCamera);
        }
        let w = towards.normalize();
        let u = self.up.cross(&w);
        if u.norm() < EPSILON {
            return Err(Error::DegenerateCamera);
        }
        let u = u.normalize();
        let v = w.cross(&u);

        let eye = self.position.coords;
        #[rustfmt::skip]
        let m = Matrix4::new(
            u.x, u.y, u.z, -eye.dot(&u),
            v.x, v.y, v.z, -eye.dot(&v),
            w.x, w.y, w.z, -eye.dot(&w),
            0.0, 0.0, 0.0, 1.0,
        );
        Ok(m)
    }

    /// Build the symmetric perspective frustum from the vertical field of
    /// view, stored aspect ratio, and near/far planes. Fails with
    /// [`Error::DegenerateFrustum`] when near == far.
    pub fn projection_matrix(&self) -> Result<Matrix4<f32>, Error> {
        let depth = self.far - self.near;
        if depth.abs() < EPSILON {
            return Err(Error::DegenerateFrustum);
        }
        let tan_half_fov = (self.fov / 2.0).tan();

        #[rustfmt::skip]
        let m = Matrix4::new(
            1.0 / (self.aspect * tan_half_fov), 0.0, 0.0, 0.0,
            0.0, 1.0 / tan_half_fov, 0.0, 0.0,
            0.0, 0.0, -(self.far + self.near) / depth, -(2.0 * self.far * self.near) / depth,
            0.0, 0.0, -1.0, 0.0,
        );
        Ok(m)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_camera() -> Camera {
        let mut camera = Camera::new(800, 600);
        camera.aspect = 4.0 / 3.0;
        camera
    }

    #[test]
    fn view_basis_looking_down_negative_z() {
        let mut camera = test_camera();
        camera.position = Point3::origin();
        camera.target = Point3::new(0.0, 0.0, -1.0);
        camera.up = Vector3::new(0.0, 1.0, 0.0);

        let view = camera.view_matrix().unwrap();
        // Rows are U, V, W; the eye sits at the origin so the translation
        // column is zero.
        #[rustfmt::skip]
        let expected = Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        assert_relative_eq!(view, expected, epsilon = 1e-6);
    }

    #[test]
    fn view_translation_column_is_negated_eye_projection() {
        let mut camera = test_camera();
        camera.position = Point3::new(0.0, 0.0, 3.0);
        camera.target = Point3::origin();

        let view = camera.view_matrix().unwrap();
        assert_relative_eq!(view[(2, 3)], -3.0, epsilon = 1e-6);
        // The target lands on the negative W axis in camera space.
        let target = view.transform_point(&camera.target);
        assert_relative_eq!(target, Point3::new(0.0, 0.0, -3.0), epsilon = 1e-6);
    }

    #[test]
    fn eye_on_target_is_degenerate() {
        let mut camera = test_camera();
        camera.position = Point3::new(1.0, 2.0, 3.0);
        camera.target = camera.position;
        assert_eq!(camera.view_matrix(), Err(Error::DegenerateCamera));
    }

    #[test]
    fn up_parallel_to_view_direction_is_degenerate() {
        let mut camera = test_camera();
        camera.position = Point3::new(0.0, 1.0, 0.0);
        camera.target = Point3::origin();
        camera.up = Vector3::new(0.0, 1.0, 0.0);
        assert_eq!(camera.view_matrix(), Err(Error::DegenerateCamera));
    }

    #[test]
    fn projection_matches_reference_entries() {
        // near 0.5, far 5, vertical fov 60°, aspect 4:3; values from tan(30°).
        let camera = test_camera();
        let m = camera.projection_matrix().unwrap();

        assert_relative_eq!(m[(0, 0)], 1.299038, epsilon = 1e-6);
        assert_relative_eq!(m[(1, 1)], 1.7320508, epsilon = 1e-6);
        assert_relative_eq!(m[(2, 2)], -1.2222222, epsilon = 1e-6);
        assert_relative_eq!(m[(2, 3)], -1.1111112, epsilon = 1e-6);
        assert_relative_eq!(m[(3, 2)], -1.0);

        let zeros = [
            (0, 1), (0, 2), (0, 3),
            (1, 0), (1, 2), (1, 3),
            (2, 0), (2, 1),
            (3, 0), (3, 1), (3, 3),
        ];
        for (row, col) in zeros {
            assert_relative_eq!(m[(row, col)], 0.0);
        }
    }

    #[test]
    fn equal_near_and_far_is_degenerate() {
        let mut camera = test_camera();
        camera.near = 2.0;
        camera.far = 2.0;
        assert_eq!(camera.projection_matrix(), Err(Error::DegenerateFrustum));
    }

    #[test]
    fn resize_only_touches_aspect() {
        let mut camera = Camera::new(800, 600);
        camera.resize(1000, 500);
        assert_relative_eq!(camera.aspect, 2.0);
        assert_relative_eq!(camera.near, 0.5);
        assert_relative_eq!(camera.far, 5.0);
    }
}
