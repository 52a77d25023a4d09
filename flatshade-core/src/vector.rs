/// Homogeneous 4-component vector used throughout the pipeline
use nalgebra::{Matrix4, Point3, Vector4};
use std::ops::{Add, Mul, Neg, Sub};

use crate::error::{Error, Result};

/// Lengths below this are treated as zero by [`Vec4::try_normalize`]
pub const NORMALIZE_EPSILON: f64 = 1e-12;

/// A point or direction with an explicit homogeneous `w`.
///
/// Arithmetic operators act on `x`, `y` and `z` only and produce a vector
/// with `w = 1`. Only [`Vec4::transform`] and [`Vec4::lerp`] touch `w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vec4 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    pub const fn with_w(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn dot(&self, other: &Vec4) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vec4) -> Vec4 {
        Vec4::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Scale to unit length, failing on a zero-length vector
    pub fn try_normalize(&self) -> Result<Vec4> {
        let len = self.length();
        if len < NORMALIZE_EPSILON || !len.is_finite() {
            return Err(Error::DegenerateGeometry("cannot normalize a zero-length vector"));
        }
        Ok(Vec4::new(self.x / len, self.y / len, self.z / len))
    }

    /// Scale to unit length; a zero-length vector normalizes to zero
    pub fn normalize(&self) -> Vec4 {
        self.try_normalize().unwrap_or_else(|_| Vec4::zero())
    }

    /// Apply a 4x4 matrix to all four components (column-vector convention).
    ///
    /// No perspective divide happens here.
    pub fn transform(&self, m: &Matrix4<f64>) -> Vec4 {
        let v = m * Vector4::new(self.x, self.y, self.z, self.w);
        Vec4::with_w(v.x, v.y, v.z, v.w)
    }

    /// Linear interpolation of all four components
    pub fn lerp(&self, other: &Vec4, t: f64) -> Vec4 {
        Vec4::with_w(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
            self.w + (other.w - self.w) * t,
        )
    }

    /// Arithmetic mean of three points
    pub fn midpoint(a: &Vec4, b: &Vec4, c: &Vec4) -> Vec4 {
        Vec4::new(
            (a.x + b.x + c.x) / 3.0,
            (a.y + b.y + c.y) / 3.0,
            (a.z + b.z + c.z) / 3.0,
        )
    }
}

impl Default for Vec4 {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Point3<f64>> for Vec4 {
    fn from(p: Point3<f64>) -> Self {
        Vec4::new(p.x, p.y, p.z)
    }
}

impl From<&Point3<f64>> for Vec4 {
    fn from(p: &Point3<f64>) -> Self {
        Vec4::new(p.x, p.y, p.z)
    }
}

impl Add for Vec4 {
    type Output = Vec4;

    fn add(self, rhs: Vec4) -> Vec4 {
        Vec4::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec4 {
    type Output = Vec4;

    fn sub(self, rhs: Vec4) -> Vec4 {
        Vec4::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec4 {
    type Output = Vec4;

    fn mul(self, rhs: f64) -> Vec4 {
        Vec4::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec4 {
    type Output = Vec4;

    fn neg(self) -> Vec4 {
        self * -1.0
    }
}
