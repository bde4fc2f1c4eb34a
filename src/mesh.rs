//! Compact polygon mesh returned to the host for preview rendering.

use nalgebra::Point3;

use crate::error::{BlockFitError, Result};

/// Points plus polygon faces indexing into them.
///
/// Faces keep the arity they had in the meshing tool's output (normally
/// quadrilaterals for a hex mesh).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewMesh {
    /// Point positions.
    pub points: Vec<Point3<f64>>,
    /// Faces as point indices.
    pub faces: Vec<Vec<usize>>,
    /// Cell count predicted by the dictionary writer, when it ran in the same
    /// pipeline.
    pub cell_count: Option<u64>,
}

impl PreviewMesh {
    /// Create a mesh from points and faces.
    pub fn new(points: Vec<Point3<f64>>, faces: Vec<Vec<usize>>) -> Self {
        Self {
            points,
            faces,
            cell_count: None,
        }
    }

    /// Number of points.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Check that every face index refers to an existing point.
    pub fn validate(&self) -> Result<()> {
        for (fi, face) in self.faces.iter().enumerate() {
            if let Some(&v) = face.iter().find(|&&v| v >= self.points.len()) {
                return Err(BlockFitError::InvalidVertexIndex {
                    element: format!("face {}", fi),
                    vertex: v,
                    count: self.points.len(),
                });
            }
        }
        Ok(())
    }

    /// Fan-triangulate every face.
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        let mut out = Vec::with_capacity(self.faces.len() * 2);
        for face in &self.faces {
            for i in 1..face.len().saturating_sub(1) {
                out.push([face[0], face[i], face[i + 1]]);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangles_fan_quads() {
        let mesh = PreviewMesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2, 3]],
        );
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.triangles(), vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_validate_catches_dangling_index() {
        let mesh = PreviewMesh::new(vec![Point3::origin()], vec![vec![0, 3, 0]]);
        assert!(matches!(
            mesh.validate(),
            Err(BlockFitError::InvalidVertexIndex { vertex: 3, .. })
        ));
    }
}
