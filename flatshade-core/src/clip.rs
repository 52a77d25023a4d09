//! Clipping triangles against a single plane.
//!
//! A vertex is inside when its signed distance `normal · (v - point)` is
//! non-negative. Clipping a triangle yields zero, one or two triangles, all
//! wound the same way as the input. Intersections interpolate all four
//! components, so `w` stays usable for the perspective divide.

use crate::vector::Vec4;

/// Plane through `point` whose `normal` points toward the kept half-space.
/// The normal need not be unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vec4,
    pub normal: Vec4,
}

impl Plane {
    pub const fn new(point: Vec4, normal: Vec4) -> Self {
        Self { point, normal }
    }

    /// The near plane in clip space
    pub const fn near() -> Self {
        Self::new(Vec4::new(0.0, 0.0, 0.1), Vec4::new(0.0, 0.0, 1.0))
    }

    pub fn signed_distance(&self, v: &Vec4) -> f64 {
        self.normal.dot(&(*v - self.point))
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self::near()
    }
}

/// Output storage for one clipped triangle
pub type ClipBuffer = [[Vec4; 3]; 2];

/// Clip `tri` against `plane`, writing the results into `out` and returning
/// how many of its slots were filled.
pub fn clip_triangle(plane: &Plane, tri: &[Vec4; 3], out: &mut ClipBuffer) -> usize {
    let d = [
        plane.signed_distance(&tri[0]),
        plane.signed_distance(&tri[1]),
        plane.signed_distance(&tri[2]),
    ];
    let inside = d.iter().filter(|&&di| di >= 0.0).count();

    match inside {
        3 => {
            out[0] = *tri;
            1
        }
        0 => 0,
        1 => {
            // Keep cyclic order starting from the inside vertex.
            let i = (0..3).find(|&k| d[k] >= 0.0).unwrap_or(0);
            let a = (i + 1) % 3;
            let b = (i + 2) % 3;
            out[0] = [
                tri[i],
                intersect(&tri[i], d[i], &tri[a], d[a]),
                intersect(&tri[i], d[i], &tri[b], d[b]),
            ];
            1
        }
        _ => {
            // Quad a, b, (b->o), (o->a), split along the a diagonal.
            let o = (0..3).find(|&k| !(d[k] >= 0.0)).unwrap_or(0);
            let a = (o + 1) % 3;
            let b = (o + 2) % 3;
            let bo = intersect(&tri[b], d[b], &tri[o], d[o]);
            let ao = intersect(&tri[a], d[a], &tri[o], d[o]);
            out[0] = [tri[a], tri[b], bo];
            out[1] = [tri[a], bo, ao];
            2
        }
    }
}

/// Point where the edge from an inside vertex to an outside one crosses the plane
fn intersect(inside: &Vec4, d_inside: f64, outside: &Vec4, d_outside: f64) -> Vec4 {
    let t = d_inside / (d_inside - d_outside);
    inside.lerp(outside, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn ground() -> Plane {
        Plane::new(Vec4::zero(), Vec4::new(0.0, 0.0, 1.0))
    }

    fn area_vector(tri: &[Vec4; 3]) -> Vec4 {
        (tri[1] - tri[0]).cross(&(tri[2] - tri[0])) * 0.5
    }

    fn empty() -> ClipBuffer {
        [[Vec4::zero(); 3]; 2]
    }

    #[test]
    fn test_all_inside_is_unchanged() {
        let tri = [
            Vec4::with_w(0.0, 0.0, 1.0, 2.0),
            Vec4::with_w(1.0, 0.0, 0.5, 3.0),
            Vec4::with_w(0.0, 1.0, 0.0, 4.0),
        ];
        let mut out = empty();
        assert_eq!(clip_triangle(&ground(), &tri, &mut out), 1);
        assert_eq!(out[0], tri);
    }

    #[test]
    fn test_all_outside_is_dropped() {
        let tri = [
            Vec4::new(0.0, 0.0, -1.0),
            Vec4::new(1.0, 0.0, -0.5),
            Vec4::new(0.0, 1.0, -2.0),
        ];
        let mut out = empty();
        assert_eq!(clip_triangle(&ground(), &tri, &mut out), 0);
    }

    #[test]
    fn test_one_inside() {
        let tri = [
            Vec4::with_w(0.0, 0.0, 1.0, 1.0),
            Vec4::with_w(2.0, 0.0, -1.0, 3.0),
            Vec4::with_w(0.0, 0.0, -1.0, 5.0),
        ];
        let mut out = empty();
        assert_eq!(clip_triangle(&ground(), &tri, &mut out), 1);

        let clipped = out[0];
        assert_eq!(clipped[0], tri[0]);
        assert_eq!(clipped[1], Vec4::with_w(1.0, 0.0, 0.0, 2.0));
        assert_eq!(clipped[2], Vec4::with_w(0.0, 0.0, 0.0, 3.0));

        let before = area_vector(&tri);
        let after = area_vector(&clipped);
        assert!((after.length() - 0.5).abs() < EPS);
        assert!(before.dot(&after) > 0.0, "winding flipped");
    }

    #[test]
    fn test_two_inside_splits_quad() {
        let tri = [
            Vec4::new(0.0, 0.0, 1.0),
            Vec4::new(2.0, 0.0, 1.0),
            Vec4::new(0.0, 0.0, -1.0),
        ];
        let mut out = empty();
        assert_eq!(clip_triangle(&ground(), &tri, &mut out), 2);

        let before = area_vector(&tri);
        let mut total = 0.0;
        for clipped in &out {
            let a = area_vector(clipped);
            assert!(before.dot(&a) > 0.0, "winding flipped");
            assert!(clipped.iter().all(|v| v.z >= -EPS));
            total += a.length();
        }
        // Whole triangle has area 2; the cut-off corner has area 0.5.
        assert!((total - 1.5).abs() < EPS);
    }

    #[test]
    fn test_vertex_on_plane_counts_as_inside() {
        let tri = [
            Vec4::new(0.0, 0.0, 0.0),
            Vec4::new(1.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0),
        ];
        let mut out = empty();
        assert_eq!(clip_triangle(&ground(), &tri, &mut out), 1);
        assert_eq!(out[0], tri);
    }

    #[test]
    fn test_nan_vertex_is_outside() {
        let tri = [
            Vec4::new(0.0, 0.0, 1.0),
            Vec4::new(f64::NAN, 0.0, f64::NAN),
            Vec4::new(2.0, 0.0, 1.0),
        ];
        let mut out = empty();
        assert_eq!(clip_triangle(&ground(), &tri, &mut out), 2);
        // The finite corners lead both halves, in their original cyclic order.
        assert_eq!(out[0][0], tri[2]);
        assert_eq!(out[0][1], tri[0]);
        assert_eq!(out[1][0], tri[2]);
    }

    #[test]
    fn test_near_plane_offset() {
        let plane = Plane::near();
        assert!((plane.signed_distance(&Vec4::new(5.0, 5.0, 0.1))).abs() < EPS);
        assert!(plane.signed_distance(&Vec4::new(0.0, 0.0, 0.0)) < 0.0);
    }
}
