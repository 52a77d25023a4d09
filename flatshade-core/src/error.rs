/// Errors raised while setting up a scene
use std::fmt;

/// Setup-time failures. Per-frame numeric edge cases are never errors; the
/// pipeline skips and counts them instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Triangle index list length is not a multiple of three
    IndexCountNotTriangles {
        len: usize,
    },
    /// A triangle index points past the end of the vertex list
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: usize,
    },
    /// Mesh has no vertices or no triangles
    EmptyMesh,
    /// A direction that must be normalized has zero length
    DegenerateGeometry(&'static str),
    InvalidCamera(String),
    /// Mesh file could not be parsed
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IndexCountNotTriangles { len } => {
                write!(f, "triangle index count {} is not a multiple of 3", len)
            }
            Error::IndexOutOfRange {
                position,
                index,
                vertex_count,
            } => write!(
                f,
                "triangle index {} at position {} is out of range for {} vertices",
                index, position, vertex_count
            ),
            Error::EmptyMesh => write!(f, "mesh has no vertices or no triangles"),
            Error::DegenerateGeometry(what) => write!(f, "degenerate geometry: {}", what),
            Error::InvalidCamera(reason) => write!(f, "invalid camera: {}", reason),
            Error::Parse(reason) => write!(f, "parse error: {}", reason),
        }
    }
}

impl std::error::Error for Error {}
