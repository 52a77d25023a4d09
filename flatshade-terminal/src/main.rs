/// Flatshade Terminal Demo - a small scene of primitives
///
/// Controls:
///   - W/S: Move forward / back
///   - A/D: Strafe
///   - E/Q: Move up / down
///   - Arrow Keys: Look around
///   - ESC: Quit
use flatshade_core::{Camera, Color, Primitive, Scene, Shape};
use flatshade_terminal::{Controls, TerminalApp};
use nalgebra::Vector3;

fn demo_scene() -> Scene {
    let mut scene = Scene::new();
    scene.add(
        Shape::from_primitive("cube", Primitive::Cube, Color::YELLOW)
            .placed(Vector3::new(0.0, 0.0, 10.0), 1.5),
    );
    scene.add(
        Shape::from_primitive("pyramid", Primitive::Pyramid, Color::rgb(220, 60, 60))
            .placed(Vector3::new(-5.0, 0.0, 14.0), 1.5),
    );
    scene.add(
        Shape::from_primitive("floor", Primitive::Quad, Color::rgb(60, 160, 90))
            .placed(Vector3::new(0.0, -1.5, 12.0), 12.0),
    );
    scene
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let scene = demo_scene();
    log::info!("demo scene ready: {} triangles", scene.triangle_count());

    // The floor spans 24 units; a larger step crosses it in a few presses.
    let controls = Controls {
        move_step: 1.0,
        ..Controls::default()
    };
    let mut app = TerminalApp::new(scene, Camera::default())?.with_controls(controls);
    app.run()?;

    println!("Thank you for using the Flatshade terminal renderer!");
    Ok(())
}
