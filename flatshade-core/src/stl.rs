/// STL reader producing indexed shape data
use std::collections::HashMap;

use nalgebra::Point3;
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{multispace0, multispace1},
    multi::many0,
    number::complete::float,
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::ShapeData;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

type Facet = [[f32; 3]; 3];

/// Merges identical corner positions into shared vertices
#[derive(Default)]
struct IndexBuilder {
    lookup: HashMap<[u32; 3], u32>,
    data: ShapeData,
}

impl IndexBuilder {
    fn with_capacity(facets: usize) -> Self {
        Self {
            lookup: HashMap::with_capacity(facets * 3),
            data: ShapeData::new(Vec::with_capacity(facets), Vec::with_capacity(facets * 3)),
        }
    }

    fn push_facet(&mut self, facet: &Facet) {
        for corner in facet {
            let key = corner.map(f32::to_bits);
            let vertices = &mut self.data.vertices;
            let index = *self.lookup.entry(key).or_insert_with(|| {
                vertices.push(Point3::new(
                    f64::from(corner[0]),
                    f64::from(corner[1]),
                    f64::from(corner[2]),
                ));
                (vertices.len() - 1) as u32
            });
            self.data.indices.push(index);
        }
    }

    fn finish(self) -> ShapeData {
        self.data
    }
}

fn read_f32(data: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<ShapeData> {
    if data.len() < HEADER_LEN + 4 {
        return Err(Error::Parse("file too small to be a valid STL".to_string()));
    }
    let body = &data[HEADER_LEN..];
    let facet_count = u32::from_le_bytes([body[0], body[1], body[2], body[3]]) as usize;
    let expected = 4 + facet_count * FACET_LEN;
    if body.len() < expected {
        return Err(Error::Parse(format!(
            "unexpected end of file: {} facets need {} bytes, found {}",
            facet_count,
            expected,
            body.len()
        )));
    }

    let mut builder = IndexBuilder::with_capacity(facet_count);
    for facet in body[4..expected].chunks_exact(FACET_LEN) {
        // Skip the stored normal; winding decides facing.
        let mut corners: Facet = [[0.0; 3]; 3];
        for (i, corner) in corners.iter_mut().enumerate() {
            let base = 12 + i * 12;
            *corner = [
                read_f32(facet, base),
                read_f32(facet, base + 4),
                read_f32(facet, base + 8),
            ];
        }
        builder.push_facet(&corners);
    }
    Ok(builder.finish())
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<ShapeData> {
    match ascii_solid(input) {
        Ok((_, facets)) => {
            let mut builder = IndexBuilder::with_capacity(facets.len());
            for facet in &facets {
                builder.push_facet(facet);
            }
            Ok(builder.finish())
        }
        Err(e) => Err(Error::Parse(format!("failed to parse ASCII STL: {:?}", e))),
    }
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<Facet>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = take_till(|c| c == '\n')(input)?; // optional name
    let (input, facets) = many0(facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    Ok((input, facets))
}

fn facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _) = triple(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v0) = vertex(input)?;
    let (input, v1) = vertex(input)?;
    let (input, v2) = vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, [v0, v1, v2]))
}

fn vertex(input: &str) -> IResult<&str, [f32; 3]> {
    preceded(preceded(multispace0, tag("vertex")), triple)(input)
}

fn triple(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, (x, y, z)) = tuple((
        preceded(multispace0, float),
        preceded(multispace1, float),
        preceded(multispace1, float),
    ))(input)?;
    Ok((input, [x, y, z]))
}

/// Detect and parse STL data (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<ShapeData> {
    if data.starts_with(b"solid") {
        // Binary files may also start with "solid"; fall through on failure.
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(shape) = parse_ascii_stl(text) {
                log::info!(
                    "parsed ASCII STL: {} vertices, {} triangles",
                    shape.vertices.len(),
                    shape.triangle_count()
                );
                return Ok(shape);
            }
        }
    }

    let shape = parse_binary_stl(data)?;
    log::info!(
        "parsed binary STL: {} vertices, {} triangles",
        shape.vertices.len(),
        shape.triangle_count()
    );
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRA: &str = "solid tetra
  facet normal 0 0 -1
    outer loop
      vertex 0 0 0
      vertex 0 1 0
      vertex 1 0 0
    endloop
  endfacet
  facet normal 0 -1 0
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 0 1
    endloop
  endfacet
endsolid tetra
";

    fn binary(facets: &[Facet]) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_LEN];
        data.extend_from_slice(&(facets.len() as u32).to_le_bytes());
        for facet in facets {
            data.extend_from_slice(&[0u8; 12]);
            for corner in facet {
                for c in corner {
                    data.extend_from_slice(&c.to_le_bytes());
                }
            }
            data.extend_from_slice(&[0u8; 2]);
        }
        data
    }

    #[test]
    fn test_parse_binary_header() {
        let data = binary(&[]);
        let shape = parse_binary_stl(&data).unwrap();
        assert_eq!(shape.triangle_count(), 0);
    }

    #[test]
    fn test_binary_shares_vertices() {
        let quad = [
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
            [[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        ];
        let shape = parse_binary_stl(&binary(&quad)).unwrap();
        assert_eq!(shape.vertices.len(), 4);
        assert_eq!(shape.indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(shape.validate().is_ok());
    }

    #[test]
    fn test_binary_truncated() {
        let mut data = binary(&[[[0.0; 3]; 3]]);
        data.truncate(data.len() - 10);
        assert!(matches!(parse_binary_stl(&data), Err(Error::Parse(_))));
    }

    #[test]
    fn test_ascii_preserves_winding() {
        let shape = parse_stl(TETRA.as_bytes()).unwrap();
        assert_eq!(shape.triangle_count(), 2);
        assert_eq!(shape.vertices.len(), 4);
        assert_eq!(shape.vertices[1], Point3::new(0.0, 1.0, 0.0));
        assert_eq!(shape.indices, vec![0, 1, 2, 0, 2, 3]);
    }
}
