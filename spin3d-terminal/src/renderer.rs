/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use spin3d_core::{FlatMesh, Uniforms};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Depth-buffered rasterizer that draws a flattened triangle list as terminal
/// characters, shading each triangle the way the fragment stage would:
/// diffuse response against a light riding with the camera.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    /// Reallocate the buffers for a new terminal size.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.depth_buffer = vec![f32::INFINITY; width * height];
        self.char_buffer = vec![' '; width * height];
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    pub fn render_mesh(&mut self, mesh: &FlatMesh, uniforms: &Uniforms) {
        let mvp = uniforms.mvp();
        let model_view = uniforms.view * uniforms.model;
        for k in 0..mesh.triangle_count() {
            self.render_triangle(mesh, k, &mvp, &model_view, uniforms);
        }
    }

    fn render_triangle(
        &mut self,
        mesh: &FlatMesh,
        k: usize,
        mvp: &Matrix4<f32>,
        model_view: &Matrix4<f32>,
        uniforms: &Uniforms,
    ) {
        let corners = mesh.triangle(k);

        // Project corners to screen space; drop the triangle when any corner
        // leaves the clip volume.
        let mut screen = [(0.0f32, 0.0f32, 0.0f32); 3];
        for (i, corner) in corners.iter().enumerate() {
            match self.project(corner, mvp) {
                Some(coords) => screen[i] = coords,
                None => return,
            }
        }

        // Average the corner normals: flat meshes repeat one normal three
        // times, smoothed meshes blend toward the shared-vertex average.
        let normal =
            (mesh.normals[k * 3] + mesh.normals[k * 3 + 1] + mesh.normals[k * 3 + 2]) / 3.0;
        let character = shade(&corners, &normal, model_view, uniforms);

        self.rasterize_triangle(&screen, character);
    }

    fn project(&self, point: &Point3<f32>, mvp: &Matrix4<f32>) -> Option<(f32, f32, f32)> {
        let clip = mvp * point.to_homogeneous();
        if clip.w.abs() < 1e-6 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        if ndc.x < -1.0 || ndc.x > 1.0 || ndc.y < -1.0 || ndc.y > 1.0 {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * self.width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * self.height as f32;
        Some((screen_x, screen_y, ndc.z))
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box clipped to screen bounds
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = character;
                        }
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    _ => Color::Cyan,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            writer.queue(Print('\n'))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    #[cfg(test)]
    fn lit_cells(&self) -> usize {
        self.char_buffer.iter().filter(|&&c| c != ' ').count()
    }
}

/// Diffuse shading in eye space, mirroring the uniform contract: the light
/// rides with the camera, response is dot(N, V) × LightRGB / PI, normalized
/// by the brightest possible response before hitting the character ramp.
fn shade(
    corners: &[Point3<f32>; 3],
    normal: &Vector3<f32>,
    model_view: &Matrix4<f32>,
    uniforms: &Uniforms,
) -> char {
    let centroid =
        Point3::from((corners[0].coords + corners[1].coords + corners[2].coords) / 3.0);
    let eye_pos = model_view.transform_point(&centroid);
    let camera_direction = -eye_pos.coords;
    let eye_normal = model_view.transform_vector(normal);
    if camera_direction.norm() < 1e-6 || eye_normal.norm() < 1e-6 {
        return LUMINOSITY_RAMP[0];
    }

    let lambert = eye_normal
        .normalize()
        .dot(&camera_direction.normalize())
        .max(0.0);
    let luma = luminance(uniforms.light_rgb);
    let response = lambert * luma / uniforms.pi;
    let peak = luma / uniforms.pi;
    let t = if peak > 0.0 { response / peak } else { 0.0 };

    let char_index = (t * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
    LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

fn luminance(rgba: [f32; 4]) -> f32 {
    (0.2126 * rgba[0] + 0.7152 * rgba[1] + 0.0722 * rgba[2]) * rgba[3]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use spin3d_core::{Camera, RawMesh, TransformParams};

    #[test]
    fn barycentric_identifies_interior_points() {
        let (w0, w1, w2) = barycentric((0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (2.0, 2.0)).unwrap();
        assert!(w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0);
        assert_relative_eq!(w0 + w1 + w2, 1.0, epsilon = 1e-6);

        let (w0, w1, w2) = barycentric((0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (9.0, 9.0)).unwrap();
        assert!(w0 < 0.0 || w1 < 0.0 || w2 < 0.0);
    }

    #[test]
    fn degenerate_triangle_has_no_barycentric_coords() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }

    #[test]
    fn rendering_the_default_scene_marks_pixels() {
        let mesh = RawMesh::octahedron().flatten().unwrap();
        let params = TransformParams::default();
        let camera = Camera::new(80, 40);
        let uniforms = Uniforms::assemble(&params, &camera).unwrap();

        let mut renderer = AsciiRenderer::new(80, 40);
        renderer.render_mesh(&mesh, &uniforms);
        assert!(renderer.lit_cells() > 0);
    }

    #[test]
    fn clear_resets_every_cell() {
        let mesh = RawMesh::octahedron().flatten().unwrap();
        let uniforms =
            Uniforms::assemble(&TransformParams::default(), &Camera::new(40, 20)).unwrap();
        let mut renderer = AsciiRenderer::new(40, 20);
        renderer.render_mesh(&mesh, &uniforms);
        renderer.clear();
        assert_eq!(renderer.lit_cells(), 0);
    }

    #[test]
    fn resize_reallocates_buffers() {
        let mut renderer = AsciiRenderer::new(10, 5);
        renderer.resize(20, 8);
        assert_eq!(renderer.char_buffer.len(), 160);
        assert_eq!(renderer.depth_buffer.len(), 160);
    }
}
