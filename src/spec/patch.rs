//! Boundary patches and snap projections.

use std::fmt;

/// Boundary condition type of a patch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatchType {
    /// Solid wall.
    Wall,
    /// Generic patch (inlet, outlet, ...).
    Patch,
    /// Symmetry.
    Symmetry,
    /// Planar symmetry.
    SymmetryPlane,
    /// Empty direction of a 2D case.
    Empty,
    /// Axisymmetric wedge.
    Wedge,
    /// Cyclic coupling.
    Cyclic,
    /// Any other type word, kept verbatim.
    Other(String),
}

impl PatchType {
    /// The dictionary keyword for this type.
    pub fn as_str(&self) -> &str {
        match self {
            PatchType::Wall => "wall",
            PatchType::Patch => "patch",
            PatchType::Symmetry => "symmetry",
            PatchType::SymmetryPlane => "symmetryPlane",
            PatchType::Empty => "empty",
            PatchType::Wedge => "wedge",
            PatchType::Cyclic => "cyclic",
            PatchType::Other(word) => word,
        }
    }
}

impl From<&str> for PatchType {
    fn from(word: &str) -> Self {
        match word {
            "wall" => PatchType::Wall,
            "patch" => PatchType::Patch,
            "symmetry" => PatchType::Symmetry,
            "symmetryPlane" => PatchType::SymmetryPlane,
            "empty" => PatchType::Empty,
            "wedge" => PatchType::Wedge,
            "cyclic" => PatchType::Cyclic,
            other => PatchType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named group of quadrilateral block faces sharing a boundary type.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPatch {
    /// Patch name.
    pub name: String,
    /// Boundary type.
    pub kind: PatchType,
    /// Faces as 4 vertex indices each.
    pub faces: Vec<[usize; 4]>,
}

impl BoundaryPatch {
    /// Create a patch.
    pub fn new(name: impl Into<String>, kind: PatchType, faces: Vec<[usize; 4]>) -> Self {
        Self {
            name: name.into(),
            kind,
            faces,
        }
    }
}

/// A block face snapped onto a named target surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// Face as 4 vertex indices.
    pub face: [usize; 4],
    /// Target surface name, without the `.stl` extension.
    pub surface: String,
}

impl Projection {
    /// Create a projection.
    pub fn new(face: [usize; 4], surface: impl Into<String>) -> Self {
        Self {
            face,
            surface: surface.into(),
        }
    }
}
