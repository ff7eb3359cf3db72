/// Example: render one frame of an OBJ mesh to stdout, no event loop
///
/// Usage: cargo run --example single_frame -- path/to/mesh.obj

use anyhow::Context;
use spin3d_core::{parse_obj, Camera, RawMesh, TransformParams, Uniforms};
use spin3d_terminal::AsciiRenderer;
use std::env;
use std::fs;
use std::io::stdout;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let raw = match args.get(1) {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read OBJ file {path}"))?;
            parse_obj(&text)?
        }
        None => {
            eprintln!("no OBJ file given, rendering the built-in octahedron");
            RawMesh::octahedron()
        }
    };
    let mesh = raw.flatten()?;

    // A mid-spin frame so all three rotation axes contribute.
    let mut params = TransformParams::default();
    for _ in 0..600 {
        params.tick();
    }
    let camera = Camera::new(80, 40);
    let uniforms = Uniforms::assemble(&params, &camera)?;

    let mut renderer = AsciiRenderer::new(80, 40);
    renderer.render_mesh(&mesh, &uniforms);
    renderer.draw(&mut stdout())?;
    Ok(())
}
