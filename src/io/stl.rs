//! Snap target surfaces.
//!
//! Faces listed under `snapFaces` are projected onto triangulated surfaces
//! that the tool loads from `constant/triSurface/<name>.stl`. This module
//! writes such a surface from a triangle soup.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::Point3;

use crate::error::{BlockFitError, Result};

/// Save triangles as a binary STL file.
///
/// Degenerate triangles get a zero normal; the tool recomputes normals
/// anyway.
///
/// # Example
///
/// ```no_run
/// use blockfit::io::stl;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// stl::save_surface(&vertices, &[[0, 1, 2]], "hull.stl").unwrap();
/// ```
pub fn save_surface<P: AsRef<Path>>(
    vertices: &[Point3<f64>],
    triangles: &[[usize; 3]],
    path: P,
) -> Result<()> {
    let path = path.as_ref();

    for (ti, tri) in triangles.iter().enumerate() {
        if let Some(&v) = tri.iter().find(|&&v| v >= vertices.len()) {
            return Err(BlockFitError::InvalidVertexIndex {
                element: format!("surface triangle {}", ti),
                vertex: v,
                count: vertices.len(),
            });
        }
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let stl_triangles: Vec<stl_io::Triangle> = triangles
        .iter()
        .map(|t| {
            let p0 = &vertices[t[0]];
            let p1 = &vertices[t[1]];
            let p2 = &vertices[t[2]];

            let n = (p1 - p0).cross(&(p2 - p0));
            let n = n.try_normalize(f64::EPSILON).unwrap_or_else(nalgebra::Vector3::zeros);

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    stl_io::Vertex::new([p0.x as f32, p0.y as f32, p0.z as f32]),
                    stl_io::Vertex::new([p1.x as f32, p1.y as f32, p1.z as f32]),
                    stl_io::Vertex::new([p2.x as f32, p2.y as f32, p2.z as f32]),
                ],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, stl_triangles.iter())?;
    Ok(())
}
