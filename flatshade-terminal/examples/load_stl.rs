/// Example: Load and render an STL file in the terminal
///
/// Usage: cargo run --example load_stl -- path/to/file.stl
use anyhow::Context;
use flatshade_core::{stl, Camera, Color, Primitive, Scene, Shape};
use flatshade_terminal::TerminalApp;
use nalgebra::Vector3;
use std::env;
use std::fs;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let shape = match args.get(1) {
        Some(path) => {
            println!("Loading STL file: {}", path);
            let data = fs::read(path).with_context(|| format!("failed to read {}", path))?;
            let mesh = stl::parse_stl(&data).context("failed to parse STL")?;
            println!("Loaded {} triangles", mesh.triangle_count());
            Shape::new(path.as_str(), mesh, Color::YELLOW)?
        }
        None => {
            eprintln!("Usage: {} <stl-file>", args[0]);
            eprintln!("\nNo STL file provided, using default cube...");
            Shape::from_primitive("cube", Primitive::Cube, Color::YELLOW)
        }
    };

    let mut scene = Scene::new();
    scene.add(shape.placed(Vector3::new(0.0, 0.0, 10.0), 2.0));

    println!("Starting terminal renderer (press ESC to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(scene, Camera::default())?;
    app.run()?;

    println!("Thank you for using the Flatshade terminal renderer!");
    Ok(())
}
