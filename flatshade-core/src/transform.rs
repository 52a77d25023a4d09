/// Rotation matrices and per-shape placement
use nalgebra::{Matrix4, Point3, Vector3};

/// Uniform scale followed by translation, applied to a shape's local vertices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vector3<f64>,
    pub scale: f64,
}

impl Placement {
    pub fn new(position: Vector3<f64>, scale: f64) -> Self {
        Self { position, scale }
    }

    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            scale: 1.0,
        }
    }

    pub fn apply(&self, local: &Point3<f64>) -> Point3<f64> {
        Point3::from(local.coords * self.scale + self.position)
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

/// Transform builder for camera rotations
pub struct Transform;

impl Transform {
    /// Rotation about the X axis (pitch)
    pub fn rotation_x(angle: f64) -> Matrix4<f64> {
        let (s, c) = angle.sin_cos();
        #[rustfmt::skip]
        let m = Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0,   c,  -s, 0.0,
            0.0,   s,   c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        m
    }

    /// Rotation about the Y axis (yaw)
    pub fn rotation_y(angle: f64) -> Matrix4<f64> {
        let (s, c) = angle.sin_cos();
        #[rustfmt::skip]
        let m = Matrix4::new(
              c, 0.0,   s, 0.0,
            0.0, 1.0, 0.0, 0.0,
             -s, 0.0,   c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        m
    }
}
