/// Terminal front end: camera controls, frame loop and half-block display
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self},
};
use flatshade_core::{Camera, Color, DirectionalLight, FrameStats, Pipeline, RenderConfig, Scene};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::Canvas;

/// Fills the canvas before each frame
pub const BACKGROUND: Color = Color::GREY;

/// Step sizes applied per key press
#[derive(Debug, Clone, Copy)]
pub struct Controls {
    pub move_step: f64,
    pub turn_step: f64,
}

impl Controls {
    /// Move or turn `camera` for one key press. Returns false for keys that
    /// have no camera binding.
    pub fn apply(&self, code: KeyCode, camera: &mut Camera) -> bool {
        let Controls {
            move_step,
            turn_step,
        } = *self;
        match code {
            KeyCode::Char('w') => camera.advance(move_step),
            KeyCode::Char('s') => camera.advance(-move_step),
            KeyCode::Char('a') => camera.strafe(-move_step),
            KeyCode::Char('d') => camera.strafe(move_step),
            KeyCode::Char('e') => camera.ascend(move_step),
            KeyCode::Char('q') => camera.ascend(-move_step),
            KeyCode::Left => camera.turn(turn_step, 0.0),
            KeyCode::Right => camera.turn(-turn_step, 0.0),
            KeyCode::Up => camera.turn(0.0, -turn_step),
            KeyCode::Down => camera.turn(0.0, turn_step),
            _ => return false,
        }
        true
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            move_step: 0.5,
            turn_step: 0.05,
        }
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    camera: Camera,
    pipeline: Pipeline,
    canvas: Canvas,
    controls: Controls,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    stats: FrameStats,
}

impl TerminalApp {
    pub fn new(scene: Scene, camera: Camera) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let mut camera = camera;
        camera.viewport_width = u32::from(cols);
        camera.viewport_height = u32::from(rows) * 2;
        camera
            .validate()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        // Terminal cells are far coarser than window pixels.
        let config = RenderConfig {
            screen_scale: 25.0,
            ..RenderConfig::default()
        };

        Ok(Self {
            scene,
            camera,
            pipeline: Pipeline::new(config, DirectionalLight::default()),
            canvas: Canvas::for_terminal(cols, rows, BACKGROUND),
            controls: Controls::default(),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            stats: FrameStats::default(),
        })
    }

    pub fn with_controls(mut self, controls: Controls) -> Self {
        self.controls = controls;
        self
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

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
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => self.handle_key(code),
            Event::Resize(cols, rows) => {
                log::info!("terminal resized to {}x{}", cols, rows);
                self.camera.viewport_width = u32::from(cols);
                self.camera.viewport_height = u32::from(rows) * 2;
                self.canvas = Canvas::for_terminal(cols, rows, BACKGROUND);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        if code == KeyCode::Esc {
            self.running = false;
        } else {
            self.controls.apply(code, &mut self.camera);
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.canvas.clear();

        let frame = self.pipeline.render(self.scene.shapes(), &self.camera);
        frame.draw(&mut self.canvas);
        self.stats = frame.stats;

        // Output to terminal
        let mut stdout = stdout();
        self.canvas.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(TermColor::Yellow),
            SetBackgroundColor(TermColor::Black),
            Print(format!(
                "Flatshade | FPS: {:.1} | tris {}/{} | WASD=Move E/Q=Up/Down Arrows=Look Esc=Quit",
                self.fps, self.stats.triangles_out, self.stats.triangles_in
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
