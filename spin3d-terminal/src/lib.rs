/// Terminal-based ASCII front-end for the spin3d pipeline
use anyhow::Context;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use spin3d_core::{Camera, FlatMesh, TransformParams, Uniforms};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Frame-driven terminal application: the mesh is flattened once before
/// construction, then every frame recomputes the uniform set from the
/// animation counter and rasterizes from scratch.
pub struct TerminalApp {
    mesh: FlatMesh,
    params: TransformParams,
    camera: Camera,
    renderer: AsciiRenderer,
    running: bool,
    paused: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: FlatMesh) -> anyhow::Result<Self> {
        let (width, height) = terminal::size().context("failed to query terminal size")?;

        Ok(Self {
            mesh,
            params: TransformParams::default(),
            camera: Camera::new(width as u32, height as u32),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            paused: false,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            if event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            if !self.paused {
                self.params.tick();
            }

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, .. }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char(' ') => {
                    self.paused = !self.paused;
                }
                KeyCode::Char('r') => {
                    self.params.reset();
                }
                _ => {}
            },
            Event::Resize(width, height) => {
                log::debug!("terminal resized to {width}x{height}");
                self.camera.resize(width as u32, height as u32);
                self.renderer.resize(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn render(&mut self) -> anyhow::Result<()> {
        let uniforms = Uniforms::assemble(&self.params, &self.camera)
            .context("failed to build frame uniforms")?;

        self.renderer.clear();
        self.renderer.render_mesh(&self.mesh, &uniforms);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let state = if self.paused { "paused" } else { "running" };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Spin3D | frame {} ({state}) | FPS: {:.1} | Space=Pause R=Reset Q=Quit",
                self.params.frame, self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
