/// Single directional light used for flat shading
use crate::error::Result;
use crate::geometry::Color;
use crate::vector::Vec4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    direction: Vec4,
}

impl DirectionalLight {
    /// Fails on a zero-length direction
    pub fn new(direction: Vec4) -> Result<Self> {
        Ok(Self {
            direction: direction.try_normalize()?,
        })
    }

    /// Unit direction
    pub fn direction(&self) -> Vec4 {
        self.direction
    }

    /// Map the angle between `normal` and the light into [0, 1].
    ///
    /// Opposite directions give 0, aligned ones give 1.
    pub fn intensity(&self, normal: &Vec4) -> f64 {
        ((normal.dot(&self.direction) + 1.0) / 2.0).clamp(0.0, 1.0)
    }

    pub fn shade(&self, normal: &Vec4, base: Color) -> Color {
        base.shade(self.intensity(normal))
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec4::new(0.0, 1.0, -1.0).normalize(),
        }
    }
}
