//! Preview mesh export.
//!
//! Writes a [`PreviewMesh`] so the boundary mesh can be inspected outside the
//! host application. PLY and OBJ keep the original face arity; STL output is
//! fan-triangulated.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{BlockFitError, Result};
use crate::io::stl;
use crate::mesh::PreviewMesh;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// PLY (Stanford polygon) format.
    Ply,
    /// Binary STL, triangulated.
    Stl,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "ply" => Some(Format::Ply),
            "stl" => Some(Format::Stl),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

/// Save a preview mesh with automatic format detection.
///
/// # Example
///
/// ```no_run
/// use blockfit::io::{export, poly_mesh};
///
/// let mesh = poly_mesh::load("cases/duct", false).unwrap();
/// export::save(&mesh, "duct.ply").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &PreviewMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| {
        BlockFitError::invalid_param(
            "output",
            path.display(),
            "extension must be .ply, .obj or .stl",
        )
    })?;
    mesh.validate()?;

    match format {
        Format::Stl => stl::save_surface(&mesh.points, &mesh.triangles(), path),
        Format::Ply => write_file(path, |w| write_ply(mesh, w)),
        Format::Obj => write_file(path, |w| write_obj(mesh, w)),
    }
}

fn write_file<F>(path: &Path, body: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    body(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write an ASCII PLY file.
pub fn write_ply<W: Write>(mesh: &PreviewMesh, writer: &mut W) -> Result<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by blockfit")?;
    writeln!(writer, "element vertex {}", mesh.points.len())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "element face {}", mesh.faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for p in &mesh.points {
        writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
    }
    for f in &mesh.faces {
        write!(writer, "{}", f.len())?;
        for v in f {
            write!(writer, " {}", v)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write a Wavefront OBJ file.
pub fn write_obj<W: Write>(mesh: &PreviewMesh, writer: &mut W) -> Result<()> {
    writeln!(writer, "# Generated by blockfit")?;
    for p in &mesh.points {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for f in &mesh.faces {
        write!(writer, "f")?;
        // OBJ indices are 1-based
        for v in f {
            write!(writer, " {}", v + 1)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn quad() -> PreviewMesh {
        PreviewMesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2, 3]],
        )
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b.PLY"), Some(Format::Ply));
        assert_eq!(Format::from_path("mesh.obj"), Some(Format::Obj));
        assert_eq!(Format::from_path("mesh.stl"), Some(Format::Stl));
        assert_eq!(Format::from_path("mesh"), None);
    }

    #[test]
    fn test_ply_keeps_polygon_arity() {
        let mut buf = Vec::new();
        write_ply(&quad(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("element vertex 4\n"));
        assert!(text.ends_with("end_header\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 0 1 2 3\n"));
    }

    #[test]
    fn test_obj_is_one_based() {
        let mut buf = Vec::new();
        write_obj(&quad(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("f 1 2 3 4\n"));
    }

    #[test]
    fn test_stl_is_triangulated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.stl");
        save(&quad(), &path).unwrap();
        let mut file = File::open(&path).unwrap();
        let stl = stl_io::read_stl(&mut file).unwrap();
        assert_eq!(stl.faces.len(), 2);
    }

    #[test]
    fn test_save_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let err = save(&quad(), dir.path().join("mesh.vtk")).unwrap_err();
        assert!(matches!(err, BlockFitError::InvalidParameter { name: "output", .. }));
        assert!(!dir.path().join("mesh.vtk").exists());
    }
}
