//! Hexahedral blocks and the edge grading table.

use std::fmt;

/// Corner pairs forming the 12 edges of a hexahedron.
///
/// Positions 0..4 run along the i axis, 4..8 along j and 8..12 along k. The
/// first edge of each group supplies the cell count for its axis.
pub const HEX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (3, 2),
    (7, 6),
    (4, 5),
    (0, 3),
    (1, 2),
    (5, 6),
    (4, 7),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Template positions whose edges define the (i, j, k) resolution.
pub const AXIS_EDGES: [usize; 3] = [0, 4, 8];

/// An unordered pair of vertex indices.
///
/// The pair is normalized on construction, so `EdgeKey::new(a, b)` and
/// `EdgeKey::new(b, a)` compare and hash equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(usize, usize);

impl EdgeKey {
    /// Create a canonical edge key.
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            EdgeKey(a, b)
        } else {
            EdgeKey(b, a)
        }
    }

    /// Smaller vertex index.
    #[inline]
    pub fn v0(self) -> usize {
        self.0
    }

    /// Larger vertex index.
    #[inline]
    pub fn v1(self) -> usize {
        self.1
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Cell distribution along one edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeGrading {
    /// Ratio of the last cell size to the first.
    pub ratio: f64,
    /// Number of cells along the edge.
    pub cells: u32,
}

impl EdgeGrading {
    /// Create a grading entry.
    pub fn new(ratio: f64, cells: u32) -> Self {
        Self { ratio, cells }
    }

    /// Uniform spacing with the given cell count.
    pub fn uniform(cells: u32) -> Self {
        Self { ratio: 1.0, cells }
    }
}

/// A hexahedral block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Corner vertex indices in hexahedron order: bottom face loop, then top
    /// face loop.
    pub vertices: [usize; 8],
    /// Region (cell zone) name.
    pub name: String,
}

impl Block {
    /// Create a block.
    pub fn new(vertices: [usize; 8], name: impl Into<String>) -> Self {
        Self {
            vertices,
            name: name.into(),
        }
    }

    /// The 12 edges of this block in template order.
    pub fn edges(&self) -> [EdgeKey; 12] {
        HEX_EDGES.map(|(a, b)| EdgeKey::new(self.vertices[a], self.vertices[b]))
    }
}
