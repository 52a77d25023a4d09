/// Mesh data, built-in primitives and shapes
use nalgebra::{Point3, Vector3};

use crate::error::{Error, Result};
use crate::transform::Placement;

/// An 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const GREY: Color = Color::rgb(105, 105, 105);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel by `intensity`, truncating toward zero
    pub fn shade(&self, intensity: f64) -> Color {
        let scale = |c: u8| (f64::from(c) * intensity) as u8;
        Color::rgb(scale(self.r), scale(self.g), scale(self.b))
    }
}

/// Built-in meshes, centred on the origin and spanning [-1, 1].
///
/// Triangles are wound so that `(b - a) x (c - a)` points out of the solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Cube,
    Pyramid,
    /// Flat square in the XZ plane facing +y
    Quad,
}

/// Indexed triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeData {
    pub vertices: Vec<Point3<f64>>,
    pub indices: Vec<u32>,
}

impl ShapeData {
    pub fn new(vertices: Vec<Point3<f64>>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn primitive(kind: Primitive) -> Self {
        match kind {
            Primitive::Cube => Self::cube(),
            Primitive::Pyramid => Self::pyramid(),
            Primitive::Quad => Self::quad(),
        }
    }

    fn cube() -> Self {
        let vertices = vec![
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(1.0, 1.0, -1.0),
            Point3::new(-1.0, 1.0, -1.0),
            Point3::new(-1.0, -1.0, 1.0),
            Point3::new(1.0, -1.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-1.0, 1.0, 1.0),
        ];
        #[rustfmt::skip]
        let indices = vec![
            4, 5, 6,  4, 6, 7, // front
            0, 3, 2,  0, 2, 1, // back
            3, 7, 6,  3, 6, 2, // top
            0, 1, 5,  0, 5, 4, // bottom
            1, 2, 6,  1, 6, 5, // right
            0, 4, 7,  0, 7, 3, // left
        ];
        Self::new(vertices, indices)
    }

    fn pyramid() -> Self {
        let vertices = vec![
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(1.0, -1.0, 1.0),
            Point3::new(-1.0, -1.0, 1.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 1, 2,  0, 2, 3, // base
            0, 4, 1,
            1, 4, 2,
            2, 4, 3,
            3, 4, 0,
        ];
        Self::new(vertices, indices)
    }

    fn quad() -> Self {
        let vertices = vec![
            Point3::new(-1.0, 0.0, -1.0),
            Point3::new(1.0, 0.0, -1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(-1.0, 0.0, 1.0),
        ];
        Self::new(vertices, vec![0, 2, 1, 0, 3, 2])
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check topology: whole triangles, every index in range
    pub fn validate(&self) -> Result<()> {
        if self.vertices.is_empty() || self.indices.is_empty() {
            return Err(Error::EmptyMesh);
        }
        if self.indices.len() % 3 != 0 {
            return Err(Error::IndexCountNotTriangles {
                len: self.indices.len(),
            });
        }
        let vertex_count = self.vertices.len();
        if let Some((position, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|(_, index)| **index as usize >= vertex_count)
        {
            return Err(Error::IndexOutOfRange {
                position,
                index,
                vertex_count,
            });
        }
        Ok(())
    }
}

/// A mesh placed in the world with a base color.
///
/// Topology is fixed at construction; only placement and color change.
#[derive(Debug, Clone)]
pub struct Shape {
    name: String,
    local: Vec<Point3<f64>>,
    world: Vec<Point3<f64>>,
    indices: Vec<u32>,
    color: Color,
    placement: Placement,
}

impl Shape {
    pub fn new(name: impl Into<String>, data: ShapeData, color: Color) -> Result<Self> {
        data.validate()?;
        let ShapeData { vertices, indices } = data;
        let mut shape = Self {
            name: name.into(),
            world: Vec::with_capacity(vertices.len()),
            local: vertices,
            indices,
            color,
            placement: Placement::identity(),
        };
        shape.update_world();
        Ok(shape)
    }

    pub fn from_primitive(name: impl Into<String>, kind: Primitive, color: Color) -> Self {
        let data = ShapeData::primitive(kind);
        let local = data.vertices;
        Self {
            name: name.into(),
            world: local.clone(),
            local,
            indices: data.indices,
            color,
            placement: Placement::identity(),
        }
    }

    /// Builder-style placement, for scene setup
    pub fn placed(mut self, position: Vector3<f64>, scale: f64) -> Self {
        self.set_placement(Placement::new(position, scale));
        self
    }

    pub fn set_position(&mut self, position: Vector3<f64>) {
        self.set_placement(Placement::new(position, self.placement.scale));
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.set_placement(Placement::new(self.placement.position, scale));
    }

    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
        self.update_world();
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn update_world(&mut self) {
        let placement = self.placement;
        self.world.clear();
        let world = self.local.iter().map(|p| placement.apply(p));
        self.world.extend(world);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// World-space vertices
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.world
    }

    pub fn triangle_indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when every triangle has zero area, so nothing can ever be drawn
    pub fn is_degenerate(&self) -> bool {
        self.indices.chunks_exact(3).all(|t| {
            let [a, b, c] = [t[0], t[1], t[2]].map(|i| self.local[i as usize]);
            (b - a).cross(&(c - a)).norm_squared() == 0.0
        })
    }

    /// World-space corners of every triangle
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |t| {
            [
                self.world[t[0] as usize],
                self.world[t[1] as usize],
                self.world[t[2] as usize],
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outward_winding(data: &ShapeData) -> bool {
        let centroid = data
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords)
            / data.vertices.len() as f64;
        data.indices.chunks_exact(3).all(|t| {
            let [a, b, c] = [t[0], t[1], t[2]].map(|i| data.vertices[i as usize]);
            let normal = (b - a).cross(&(c - a));
            let mid = (a.coords + b.coords + c.coords) / 3.0;
            normal.dot(&(mid - centroid)) > 0.0
        })
    }

    #[test]
    fn test_primitives_are_valid_and_outward() {
        for kind in [Primitive::Cube, Primitive::Pyramid] {
            let data = ShapeData::primitive(kind);
            assert!(data.validate().is_ok());
            assert!(outward_winding(&data), "{:?} has inward faces", kind);
        }
        assert_eq!(ShapeData::primitive(Primitive::Cube).triangle_count(), 12);
        assert_eq!(ShapeData::primitive(Primitive::Pyramid).triangle_count(), 6);
    }

    #[test]
    fn test_quad_faces_up() {
        let data = ShapeData::primitive(Primitive::Quad);
        for t in data.indices.chunks_exact(3) {
            let [a, b, c] = [t[0], t[1], t[2]].map(|i| data.vertices[i as usize]);
            assert!((b - a).cross(&(c - a)).y > 0.0);
        }
    }

    #[test]
    fn test_rejects_partial_triangle() {
        let data = ShapeData::new(vec![Point3::origin(); 3], vec![0, 1, 2, 0]);
        assert_eq!(
            Shape::new("bad", data, Color::YELLOW).unwrap_err(),
            Error::IndexCountNotTriangles { len: 4 }
        );
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let data = ShapeData::new(vec![Point3::origin(); 3], vec![0, 1, 3]);
        assert_eq!(
            Shape::new("bad", data, Color::YELLOW).unwrap_err(),
            Error::IndexOutOfRange {
                position: 2,
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn test_rejects_empty_mesh() {
        let data = ShapeData::default();
        assert_eq!(
            Shape::new("empty", data, Color::YELLOW).unwrap_err(),
            Error::EmptyMesh
        );
    }

    #[test]
    fn test_placement_recomputes_world_vertices() {
        let mut shape = Shape::from_primitive("cube", Primitive::Cube, Color::YELLOW);
        assert_eq!(shape.vertices()[0], Point3::new(-1.0, -1.0, -1.0));

        shape.set_scale(3.0);
        shape.set_position(Vector3::new(0.0, 0.0, 10.0));
        assert_eq!(shape.vertices()[0], Point3::new(-3.0, -3.0, 7.0));
        assert_eq!(shape.vertices()[6], Point3::new(3.0, 3.0, 13.0));
        assert_eq!(shape.triangles().count(), 12);
    }

    #[test]
    fn test_degenerate_shape_detection() {
        let collinear = ShapeData::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(3.0, 0.0, 0.0),
            ],
            vec![0, 1, 2, 1, 2, 3],
        );
        let sliver = Shape::new("sliver", collinear, Color::YELLOW).unwrap();
        assert!(sliver.is_degenerate());

        let mixed = ShapeData::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2, 0, 1, 3],
        );
        assert!(!Shape::new("mixed", mixed, Color::YELLOW).unwrap().is_degenerate());

        for kind in [Primitive::Cube, Primitive::Pyramid, Primitive::Quad] {
            assert!(!Shape::from_primitive("solid", kind, Color::YELLOW).is_degenerate());
        }
    }

    #[test]
    fn test_shade_truncates() {
        let c = Color::rgb(255, 100, 0).shade(0.5);
        assert_eq!(c, Color::rgb(127, 50, 0));
        assert_eq!(Color::YELLOW.shade(1.0), Color::YELLOW);
        assert_eq!(Color::YELLOW.shade(0.0), Color::rgb(0, 0, 0));
    }
}
