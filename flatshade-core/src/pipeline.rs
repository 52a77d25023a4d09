//! Per-frame geometry pipeline.
//!
//! Every triangle of every shape goes through view transform, projection,
//! back-face culling, flat lighting, near-plane clipping and screen mapping.
//! Survivors are collected into a [`DrawQueue`] and handed to a
//! [`DisplaySink`] farthest first. There is no depth buffer: occlusion relies
//! entirely on that ordering.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use log::{debug, trace};
use nalgebra::Point2;

use crate::clip::{clip_triangle, ClipBuffer, Plane};
use crate::geometry::{Color, Shape};
use crate::light::DirectionalLight;
use crate::projection::{Camera, FrameTransforms};
use crate::vector::Vec4;

/// Tunables of the screen-mapping and clipping stages
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Apparent object size; x and y are divided by `w / screen_scale`
    pub screen_scale: f64,
    /// Clip-space plane triangles are clipped against
    pub near_plane: Plane,
    /// Vertices with a smaller `w` are never divided by
    pub min_w: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            screen_scale: 100.0,
            near_plane: Plane::near(),
            min_w: 1e-6,
        }
    }
}

/// Where triangles went during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub shapes: usize,
    pub triangles_in: usize,
    pub culled: usize,
    /// Zero-area triangles with no usable normal
    pub degenerate: usize,
    /// Entirely on the far side of the near plane
    pub clipped_away: usize,
    /// Clipped triangles dropped for a near-zero or negative `w`
    pub behind_camera: usize,
    pub triangles_out: usize,
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} shapes, {} tris in, {} culled, {} degenerate, {} clipped, {} behind, {} out",
            self.shapes,
            self.triangles_in,
            self.culled,
            self.degenerate,
            self.clipped_away,
            self.behind_camera,
            self.triangles_out
        )
    }
}

/// A screen-space triangle ready to fill
#[derive(Debug, Clone, Copy)]
pub struct RasterTriangle {
    /// Squared distance from the camera to the midpoint, before rotation
    pub depth: f64,
    pub points: [Point2<f64>; 3],
    pub color: Color,
}

impl Ord for RasterTriangle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.depth.total_cmp(&other.depth)
    }
}

impl PartialOrd for RasterTriangle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RasterTriangle {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RasterTriangle {}

/// Max-heap on depth: the farthest triangle pops first
#[derive(Debug, Clone, Default)]
pub struct DrawQueue {
    heap: BinaryHeap<RasterTriangle>,
}

impl DrawQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, triangle: RasterTriangle) {
        self.heap.push(triangle);
    }

    pub fn pop(&mut self) -> Option<RasterTriangle> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drain into a list with non-increasing depth
    pub fn into_back_to_front(self) -> Vec<RasterTriangle> {
        let mut triangles = self.heap.into_sorted_vec();
        triangles.reverse();
        triangles
    }
}

/// Receives filled triangles in draw order
pub trait DisplaySink {
    fn fill_triangle(&mut self, points: &[Point2<f64>; 3], color: Color);
}

/// Output of one pipeline run
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Farthest first
    pub triangles: Vec<RasterTriangle>,
    pub stats: FrameStats,
}

impl Frame {
    /// Hand every triangle to `sink` in back-to-front order
    pub fn draw<S: DisplaySink + ?Sized>(&self, sink: &mut S) {
        for tri in &self.triangles {
            sink.fill_triangle(&tri.points, tri.color);
        }
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Compute the negated unit normal of a projected triangle
pub fn face_normal(projected: &[Vec4; 3]) -> Option<Vec4> {
    let edge1 = projected[1] - projected[0];
    let edge2 = projected[2] - projected[0];
    edge1.cross(&edge2).try_normalize().ok().map(|n| -n)
}

/// A face points away from the camera when its normal has a positive
/// component along its first vertex
pub fn is_back_facing(normal: &Vec4, projected: &[Vec4; 3]) -> bool {
    normal.dot(&projected[0]) > 0.0
}

/// Renders shapes into an ordered [`Frame`]
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub config: RenderConfig,
    pub light: DirectionalLight,
}

impl Pipeline {
    pub fn new(config: RenderConfig, light: DirectionalLight) -> Self {
        Self { config, light }
    }

    pub fn render(&self, shapes: &[Shape], camera: &Camera) -> Frame {
        let transforms = camera.frame_transforms();
        let eye = Vec4::from(camera.position);
        let half = camera.half_viewport();

        let mut stats = FrameStats {
            shapes: shapes.len(),
            ..FrameStats::default()
        };
        let mut queue = DrawQueue::new();
        let mut clipped: ClipBuffer = [[Vec4::zero(); 3]; 2];

        for shape in shapes {
            for corners in shape.triangles() {
                stats.triangles_in += 1;

                let mut translated = [Vec4::zero(); 3];
                let mut projected = [Vec4::zero(); 3];
                for (k, corner) in corners.iter().enumerate() {
                    let (t, p) = to_clip_space(corner.x, corner.y, corner.z, &eye, &transforms);
                    translated[k] = t;
                    projected[k] = p;
                }

                let Some(normal) = face_normal(&projected) else {
                    trace!("skipping degenerate triangle in '{}'", shape.name());
                    stats.degenerate += 1;
                    continue;
                };
                if is_back_facing(&normal, &projected) {
                    stats.culled += 1;
                    continue;
                }

                let color = self.light.shade(&normal, shape.color());
                let depth =
                    Vec4::midpoint(&translated[0], &translated[1], &translated[2]).length_squared();

                let count = clip_triangle(&self.config.near_plane, &projected, &mut clipped);
                if count == 0 {
                    stats.clipped_away += 1;
                }
                for tri in &clipped[..count] {
                    match self.to_screen(tri, half) {
                        Some(points) => {
                            queue.push(RasterTriangle {
                                depth,
                                points,
                                color,
                            });
                        }
                        None => {
                            trace!("dropping clipped triangle with w below {}", self.config.min_w);
                            stats.behind_camera += 1;
                        }
                    }
                }
            }
        }

        stats.triangles_out = queue.len();
        debug!("frame: {}", stats);

        Frame {
            triangles: queue.into_back_to_front(),
            stats,
        }
    }

    /// Perspective divide and viewport offset
    fn to_screen(&self, tri: &[Vec4; 3], half: (f64, f64)) -> Option<[Point2<f64>; 3]> {
        if tri.iter().any(|v| !(v.w >= self.config.min_w)) {
            return None;
        }
        Some((*tri).map(|v| {
            let divisor = v.w / self.config.screen_scale;
            Point2::new(v.x / divisor + half.0, v.y / divisor + half.1)
        }))
    }
}

/// View-transform a world-space point: flip y, translate by the eye, yaw,
/// pitch, then project. Returns the translated point and the clip-space one.
fn to_clip_space(x: f64, y: f64, z: f64, eye: &Vec4, t: &FrameTransforms) -> (Vec4, Vec4) {
    let translated = Vec4::new(x, -y, z) - *eye;
    let projected = translated
        .transform(&t.yaw)
        .transform(&t.pitch)
        .transform(&t.projection);
    (translated, projected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(depth: f64) -> RasterTriangle {
        RasterTriangle {
            depth,
            points: [Point2::origin(); 3],
            color: Color::YELLOW,
        }
    }

    #[test]
    fn test_queue_pops_farthest_first() {
        let mut queue = DrawQueue::new();
        for d in [3.0, 10.0, 1.0, 7.5, 7.5] {
            queue.push(tri(d));
        }
        assert_eq!(queue.pop().map(|t| t.depth), Some(10.0));
        let rest: Vec<f64> = queue.into_back_to_front().iter().map(|t| t.depth).collect();
        assert_eq!(rest, vec![7.5, 7.5, 3.0, 1.0]);
    }

    #[test]
    fn test_face_normal_of_degenerate_triangle() {
        let p = Vec4::new(1.0, 2.0, 3.0);
        assert!(face_normal(&[p, p, p]).is_none());
        let collinear = [
            Vec4::new(0.0, 0.0, 1.0),
            Vec4::new(1.0, 0.0, 1.0),
            Vec4::new(2.0, 0.0, 1.0),
        ];
        assert!(face_normal(&collinear).is_none());
    }

    #[test]
    fn test_culling_ignores_lighting() {
        let facing = [
            Vec4::new(0.0, 0.0, 3.0),
            Vec4::new(-4.0, 0.0, 3.0),
            Vec4::new(0.0, -4.0, 3.0),
        ];
        let n = face_normal(&facing).unwrap();
        assert!(!is_back_facing(&n, &facing));

        let away = [facing[0], facing[2], facing[1]];
        let n = face_normal(&away).unwrap();
        assert!(is_back_facing(&n, &away));
    }

    #[test]
    fn test_to_screen_rejects_small_w() {
        let pipeline = Pipeline::default();
        let tri = [
            Vec4::with_w(0.0, 0.0, 0.5, 2.0),
            Vec4::with_w(1.0, 0.0, 0.5, 0.0),
            Vec4::with_w(0.0, 1.0, 0.5, 2.0),
        ];
        assert!(pipeline.to_screen(&tri, (600.0, 400.0)).is_none());

        let tri = [
            Vec4::with_w(0.0, 0.0, 0.5, 2.0),
            Vec4::with_w(1.0, 0.0, 0.5, 2.0),
            Vec4::with_w(0.0, 1.0, 0.5, 2.0),
        ];
        let points = pipeline.to_screen(&tri, (600.0, 400.0)).unwrap();
        let expected = [
            Point2::new(600.0, 400.0),
            Point2::new(650.0, 400.0),
            Point2::new(600.0, 450.0),
        ];
        for (p, e) in points.iter().zip(&expected) {
            assert!((p - e).norm() < 1e-9, "{} != {}", p, e);
        }
    }

    #[test]
    fn test_frame_draws_in_order() {
        struct Recorder(Vec<Color>);
        impl DisplaySink for Recorder {
            fn fill_triangle(&mut self, _points: &[Point2<f64>; 3], color: Color) {
                self.0.push(color);
            }
        }

        let mut far = tri(9.0);
        far.color = Color::GREY;
        let frame = Frame {
            triangles: vec![far, tri(1.0)],
            stats: FrameStats::default(),
        };
        let mut sink = Recorder(Vec::new());
        frame.draw(&mut sink);
        assert_eq!(sink.0, vec![Color::GREY, Color::YELLOW]);
    }
}
