/// Camera state and perspective projection
use nalgebra::{Matrix4, Point3};

use crate::error::{Error, Result};
use crate::transform::Transform;

/// Camera configuration, read fresh by the pipeline every frame.
///
/// At `yaw = 0` the camera looks down +z; at `yaw = PI` it looks down -z.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f64>,
    /// Rotation about the Y axis, in radians
    pub yaw: f64,
    /// Rotation about the X axis, in radians
    pub pitch: f64,
    pub fov_degrees: f64,
    pub near: f64,
    pub far: f64,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::origin(),
            yaw: 0.0,
            pitch: 0.0,
            fov_degrees: 28.0,
            near: 2.0,
            far: 80.0,
            viewport_width: width,
            viewport_height: height,
        }
    }

    /// Check the projection parameters once at setup
    pub fn validate(&self) -> Result<()> {
        if !(self.near > 0.0 && self.near.is_finite()) {
            return Err(Error::InvalidCamera(format!("near plane {} must be positive", self.near)));
        }
        if !(self.far > self.near && self.far.is_finite()) {
            return Err(Error::InvalidCamera(format!(
                "far plane {} must lie beyond near plane {}",
                self.far, self.near
            )));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(Error::InvalidCamera(format!(
                "field of view {} must be within (0, 180) degrees",
                self.fov_degrees
            )));
        }
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(Error::InvalidCamera("viewport has zero area".to_string()));
        }
        Ok(())
    }

    /// Move along the horizontal heading
    pub fn advance(&mut self, distance: f64) {
        self.position.x += (-self.yaw).sin() * distance;
        self.position.z += (-self.yaw).cos() * distance;
    }

    /// Move sideways, perpendicular to the heading
    pub fn strafe(&mut self, distance: f64) {
        let heading = -self.yaw + std::f64::consts::FRAC_PI_2;
        self.position.x += heading.sin() * distance;
        self.position.z += heading.cos() * distance;
    }

    /// Move up. Camera y is measured in the flipped view axis, so up is -y.
    pub fn ascend(&mut self, distance: f64) {
        self.position.y -= distance;
    }

    pub fn turn(&mut self, d_yaw: f64, d_pitch: f64) {
        self.yaw += d_yaw;
        self.pitch += d_pitch;
    }

    /// Create the perspective matrix.
    ///
    /// Row 3 copies view-space depth into `w`.
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        let f = 1.0 / (self.fov_degrees.to_radians() / 2.0).tan();
        let normalization = self.far / (self.far - self.near);
        let lambda = (-self.far * self.near) / (self.far - self.near);
        #[rustfmt::skip]
        let m = Matrix4::new(
              f, 0.0,           0.0,    0.0,
            0.0,   f,           0.0,    0.0,
            0.0, 0.0, normalization, lambda,
            0.0, 0.0,           1.0,    0.0,
        );
        m
    }

    /// Matrices the pipeline needs for one frame
    pub fn frame_transforms(&self) -> FrameTransforms {
        FrameTransforms {
            yaw: Transform::rotation_y(self.yaw),
            pitch: Transform::rotation_x(self.pitch),
            projection: self.projection_matrix(),
        }
    }

    pub fn half_viewport(&self) -> (f64, f64) {
        (
            f64::from(self.viewport_width) / 2.0,
            f64::from(self.viewport_height) / 2.0,
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1200, 800)
    }
}

/// Per-frame rotation and projection matrices
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTransforms {
    pub yaw: Matrix4<f64>,
    pub pitch: Matrix4<f64>,
    pub projection: Matrix4<f64>,
}
