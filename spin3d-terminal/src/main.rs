/// Spin3D Terminal Demo - Spinning Mesh
///
/// Renders a spinning mesh as ASCII art. With no arguments a built-in
/// octahedron spins; pass an OBJ path to load a mesh from disk.
///
/// Usage: spin3d-terminal [mesh.obj] [--smooth]
///
/// Controls:
///   - Space: Pause/resume the animation counter
///   - R: Restart the animation
///   - Q/ESC: Quit

use anyhow::Context;
use spin3d_core::{parse_obj, smooth_normals, FlatMesh, RawMesh};
use spin3d_terminal::TerminalApp;
use std::env;
use std::fs;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut obj_path = None;
    let mut smooth = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--smooth" => smooth = true,
            path => obj_path = Some(path.to_string()),
        }
    }

    let mesh = load_mesh(obj_path.as_deref(), smooth)?;
    log::info!(
        "mesh ready: {} triangles, smoothing {}",
        mesh.triangle_count(),
        if smooth { "on" } else { "off" }
    );

    let mut app = TerminalApp::new(mesh)?;
    app.run()
}

fn load_mesh(obj_path: Option<&str>, smooth: bool) -> anyhow::Result<FlatMesh> {
    let raw = match obj_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read OBJ file {path}"))?;
            parse_obj(&text).with_context(|| format!("failed to parse OBJ file {path}"))?
        }
        None => {
            log::info!("no OBJ file given, using the built-in octahedron");
            RawMesh::octahedron()
        }
    };

    let mut mesh = raw.flatten().context("failed to flatten mesh")?;
    if smooth {
        mesh.recompute_face_normals();
        mesh.normals = smooth_normals(&mesh.normals, &raw.position_adjacency())
            .context("failed to smooth normals")?;
    }
    Ok(mesh)
}
