//! Reader for the tool's `constant/polyMesh` output.
//!
//! Three files are consumed:
//!
//! - `points`: one `(x y z)` per line
//! - `faces`: one `N(i0 i1 ... iN-1)` per line
//! - `boundary`: patch records naming a contiguous face range each
//!
//! For previews only the boundary faces matter. [`read_boundary_faces`]
//! selects them patch by patch and renumbers their point indices into a dense
//! local range; [`read_points`] with the same faces keeps exactly the points
//! those faces use, in ascending index order, so the two stay aligned.

use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::Point3;
use tracing::debug;

use crate::error::{BlockFitError, Result};
use crate::io::foam::{read_boundaries, read_header, BoundaryRecord};
use crate::mesh::PreviewMesh;

/// Location of the mesh files relative to the case directory.
pub const POLY_MESH_DIR: &str = "constant/polyMesh";

/// Paths of the three mesh files of a case.
#[derive(Debug, Clone)]
pub struct PolyMeshFiles {
    /// `points` file.
    pub points: PathBuf,
    /// `faces` file.
    pub faces: PathBuf,
    /// `boundary` file.
    pub boundary: PathBuf,
}

impl PolyMeshFiles {
    /// Mesh files of the case rooted at `case_dir`.
    pub fn in_case<P: AsRef<Path>>(case_dir: P) -> Self {
        let dir = case_dir.as_ref().join(POLY_MESH_DIR);
        Self {
            points: dir.join("points"),
            faces: dir.join("faces"),
            boundary: dir.join("boundary"),
        }
    }

    /// Fail with [`BlockFitError::MissingOutput`] unless all three files exist.
    pub fn check_present(&self) -> Result<()> {
        for path in [&self.points, &self.faces, &self.boundary] {
            if !path.is_file() {
                return Err(BlockFitError::MissingOutput { path: path.clone() });
            }
        }
        Ok(())
    }
}

/// Faces selected for output, before and after renumbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFaces {
    /// Faces with their original point indices.
    pub global: Vec<Vec<usize>>,
    /// The same faces indexing into the reduced point list.
    pub local: Vec<Vec<usize>>,
}

fn read_lines(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => BlockFitError::MissingOutput {
            path: path.to_path_buf(),
        },
        _ => BlockFitError::Io(e),
    })
}

/// Lines `header.start .. header.start + header.count`, failing if the file
/// is shorter than announced.
fn records<'a>(path: &Path, lines: &'a [&'a str]) -> Result<(usize, &'a [&'a str])> {
    let header = read_header(lines);
    let end = header.start.saturating_add(header.count);
    if end > lines.len() {
        return Err(BlockFitError::format(
            path,
            lines.len(),
            format!(
                "expected {} records after line {}, file ends after {}",
                header.count,
                header.start,
                lines.len().saturating_sub(header.start)
            ),
        ));
    }
    Ok((header.start, &lines[header.start..end]))
}

fn parse_point(line: &str) -> std::result::Result<Point3<f64>, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 3 {
        return Err(format!("expected 3 coordinates, found {} tokens", tokens.len()));
    }
    let x = tokens[0]
        .strip_prefix('(')
        .ok_or_else(|| format!("'{}' does not start with '('", tokens[0]))?;
    let z = tokens[2]
        .strip_suffix(')')
        .ok_or_else(|| format!("'{}' does not end with ')'", tokens[2]))?;
    let parse = |t: &str| t.parse::<f64>().map_err(|_| format!("invalid coordinate '{}'", t));
    Ok(Point3::new(parse(x)?, parse(tokens[1])?, parse(z)?))
}

fn parse_face(line: &str) -> std::result::Result<Vec<usize>, String> {
    let line = line.trim();
    let open = line.find('(').ok_or("missing '('")?;
    let inner = line[open + 1..].strip_suffix(')').ok_or("missing closing ')'")?;
    let prefix = line[..open].trim();
    let arity: usize = prefix
        .parse()
        .map_err(|_| format!("invalid vertex count '{}'", prefix))?;
    let face = inner
        .split_whitespace()
        .map(|t| t.parse::<usize>().map_err(|_| format!("invalid point index '{}'", t)))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if face.len() != arity {
        return Err(format!("face declares {} points but lists {}", arity, face.len()));
    }
    Ok(face)
}

/// Sorted distinct point indices used by `faces`.
pub fn referenced_points(faces: &[Vec<usize>]) -> Vec<usize> {
    let mut used: Vec<usize> = faces.iter().flatten().copied().collect();
    used.sort_unstable();
    used.dedup();
    used
}

/// Read all points, or only those referenced by `faces` when given.
pub fn read_points<P: AsRef<Path>>(
    path: P,
    faces: Option<&[Vec<usize>]>,
) -> Result<Vec<Point3<f64>>> {
    let path = path.as_ref();
    let text = read_lines(path)?;
    let lines: Vec<&str> = text.lines().collect();
    let (start, body) = records(path, &lines)?;

    let points = body
        .iter()
        .enumerate()
        .map(|(i, line)| {
            parse_point(line).map_err(|m| BlockFitError::format(path, start + i + 1, m))
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(path = %path.display(), count = points.len(), "read points");

    let Some(faces) = faces else {
        return Ok(points);
    };
    referenced_points(faces)
        .into_iter()
        .map(|idx| {
            points.get(idx).copied().ok_or_else(|| {
                BlockFitError::format(
                    path,
                    0,
                    format!("faces reference point {} but only {} exist", idx, points.len()),
                )
            })
        })
        .collect()
}

/// Read every face of the `faces` file.
pub fn read_faces<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<usize>>> {
    let path = path.as_ref();
    let text = read_lines(path)?;
    let lines: Vec<&str> = text.lines().collect();
    let (start, body) = records(path, &lines)?;

    let faces = body
        .iter()
        .enumerate()
        .map(|(i, line)| {
            parse_face(line).map_err(|m| BlockFitError::format(path, start + i + 1, m))
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(path = %path.display(), count = faces.len(), "read faces");
    Ok(faces)
}

/// Read the patch records of a `boundary` file.
pub fn read_boundary<P: AsRef<Path>>(path: P) -> Result<Vec<BoundaryRecord>> {
    let path = path.as_ref();
    let text = read_lines(path)?;
    let lines: Vec<&str> = text.lines().collect();
    let header = read_header(&lines);
    let patches = read_boundaries(path, &lines, header.start)?;
    debug!(path = %path.display(), count = patches.len(), "read boundary");
    Ok(patches)
}

/// Concatenate the face ranges of `patches` in ascending `start_face` order.
///
/// `boundary_path` is used for error context when a patch range runs past the
/// end of `faces`.
pub fn select_patch_faces(
    faces: &[Vec<usize>],
    patches: &[BoundaryRecord],
    boundary_path: &Path,
) -> Result<Vec<Vec<usize>>> {
    let mut ordered: Vec<&BoundaryRecord> = patches.iter().collect();
    ordered.sort_by_key(|p| p.start_face);

    let mut selected = Vec::new();
    for patch in ordered {
        let slice = patch
            .face_range()
            .and_then(|range| faces.get(range))
            .ok_or_else(|| {
                BlockFitError::format(
                    boundary_path,
                    0,
                    format!(
                        "patch '{}' covers {} faces from face {} but only {} faces exist",
                        patch.name,
                        patch.n_faces,
                        patch.start_face,
                        faces.len()
                    ),
                )
            })?;
        selected.extend_from_slice(slice);
    }
    Ok(selected)
}

/// Map point indices of `faces` onto `0..referenced_points(faces).len()`.
///
/// Each index is replaced by its rank among the distinct indices used, which
/// matches the order [`read_points`] returns filtered points in.
pub fn renumber(faces: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let used = referenced_points(faces);
    // Every index is present in `used`, so the search always hits.
    let rank = |v: usize| used.binary_search(&v).unwrap_or_else(|at| at);
    faces
        .iter()
        .map(|face| face.iter().map(|&v| rank(v)).collect())
        .collect()
}

/// Read the faces of a case, limited to boundary patches unless
/// `internal_cells` is set.
///
/// With `internal_cells` the raw face list is returned for both outputs and
/// no renumbering takes place.
pub fn read_boundary_faces(files: &PolyMeshFiles, internal_cells: bool) -> Result<SelectedFaces> {
    let faces = read_faces(&files.faces)?;
    if internal_cells {
        return Ok(SelectedFaces {
            local: faces.clone(),
            global: faces,
        });
    }

    let patches = read_boundary(&files.boundary)?;
    let global = select_patch_faces(&faces, &patches, &files.boundary)?;
    let local = renumber(&global);
    Ok(SelectedFaces { global, local })
}

/// Read the preview mesh of the case rooted at `case_dir`.
///
/// # Example
///
/// ```no_run
/// use blockfit::io::poly_mesh;
///
/// let mesh = poly_mesh::load("cases/duct", false).unwrap();
/// println!("{} points, {} faces", mesh.num_points(), mesh.num_faces());
/// ```
pub fn load<P: AsRef<Path>>(case_dir: P, internal_cells: bool) -> Result<PreviewMesh> {
    let files = PolyMeshFiles::in_case(case_dir);
    files.check_present()?;

    let faces = read_boundary_faces(&files, internal_cells)?;
    let points = read_points(&files.points, Some(faces.global.as_slice()))?;
    Ok(PreviewMesh::new(points, faces.local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::PatchType;
    use std::io::Write;

    const POINTS: &str = "\
FoamFile
{
    class       vectorField;
    object      points;
}

3
(
(0 0 0)
(1 0 0)
(2 0 0)
)
";

    fn write_file(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(text.as_bytes()).unwrap();
        path
    }

    fn record(name: &str, start_face: usize, n_faces: usize) -> BoundaryRecord {
        BoundaryRecord {
            name: name.into(),
            kind: PatchType::Patch,
            n_faces,
            start_face,
        }
    }

    #[test]
    fn test_parse_face_line() {
        assert_eq!(parse_face("4(0 1 12 11)").unwrap(), vec![0, 1, 12, 11]);
        assert_eq!(parse_face("  3(7 8 9)  ").unwrap(), vec![7, 8, 9]);
        assert_eq!(parse_face("12(0 1 2 3 4 5 6 7 8 9 10 11)").unwrap().len(), 12);
    }

    #[test]
    fn test_malformed_face_lines() {
        assert!(parse_face("4(0 1 2)").is_err());
        assert!(parse_face("4(0 1 2 3").is_err());
        assert!(parse_face("4 0 1 2 3").is_err());
        assert!(parse_face("x(0 1 2 3)").is_err());
        assert!(parse_face("4(0 1 -2 3)").is_err());
    }

    #[test]
    fn test_parse_point_line() {
        assert_eq!(parse_point("(0.5 -1 2e-3)").unwrap(), Point3::new(0.5, -1.0, 0.002));
        assert!(parse_point("(0 0)").is_err());
        assert!(parse_point("0 0 0)").is_err());
        assert!(parse_point("(0 a 0)").is_err());
    }

    #[test]
    fn test_read_points_filtered_in_index_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "points", POINTS);

        let all = read_points(&path, None).unwrap();
        assert_eq!(all.len(), 3);

        let faces = vec![vec![2, 0, 2]];
        let some = read_points(&path, Some(faces.as_slice())).unwrap();
        assert_eq!(some, vec![Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_truncated_points_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "points", "4\n(\n(0 0 0)\n(1 0 0)\n");
        assert!(matches!(
            read_points(&path, None),
            Err(BlockFitError::Format { .. })
        ));
    }

    #[test]
    fn test_huge_list_count_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "faces", "18446744073709551615\n(\n3(0 1 2)\n)\n");
        assert!(matches!(read_faces(&path), Err(BlockFitError::Format { .. })));
    }

    #[test]
    fn test_malformed_face_file_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "faces", "3\n(\n4(0 1 2 3)\n4(1 2 3)\n4(2 3 4 5)\n)\n");
        match read_faces(&path) {
            Err(BlockFitError::Format { line, message, .. }) => {
                assert_eq!(line, 4);
                assert!(message.contains("declares 4"));
            }
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_boundary_selection_and_renumbering() {
        let faces = vec![
            vec![10, 11, 12, 13],
            vec![12, 13, 14, 15],
            vec![0, 1, 2, 3],
            vec![4, 5, 6, 7],
            vec![20, 10, 15],
        ];
        // Listed out of order on purpose; selection follows start_face.
        let patches = vec![record("outlet", 4, 1), record("inlet", 0, 2)];

        let global = select_patch_faces(&faces, &patches, Path::new("boundary")).unwrap();
        assert_eq!(global, vec![faces[0].clone(), faces[1].clone(), faces[4].clone()]);

        let local = renumber(&global);
        let distinct = referenced_points(&global).len();
        assert_eq!(distinct, 7);
        assert_eq!(local, vec![vec![0, 1, 2, 3], vec![2, 3, 4, 5], vec![6, 0, 5]]);
        for (g, l) in global.iter().zip(&local) {
            assert_eq!(g.len(), l.len());
            assert!(l.iter().all(|&v| v < distinct));
        }
    }

    #[test]
    fn test_patch_range_past_end() {
        let faces = vec![vec![0, 1, 2, 3]];
        let patches = vec![record("walls", 0, 2)];
        assert!(matches!(
            select_patch_faces(&faces, &patches, Path::new("boundary")),
            Err(BlockFitError::Format { .. })
        ));
    }

    #[test]
    fn test_patch_range_overflow() {
        let faces = vec![vec![0, 1, 2, 3]];
        for patches in [
            vec![record("walls", 0, 1 << 62)],
            vec![record("walls", usize::MAX, 1)],
        ] {
            assert!(matches!(
                select_patch_faces(&faces, &patches, Path::new("boundary")),
                Err(BlockFitError::Format { .. })
            ));
        }
    }

    #[test]
    fn test_renumber_sparse_indices() {
        let faces = vec![vec![usize::MAX - 1, 3, 1 << 62], vec![3, 7]];
        assert_eq!(renumber(&faces), vec![vec![3, 0, 2], vec![0, 1]]);
    }

    #[test]
    fn test_load_rejects_huge_boundary_counts() {
        let dir = tempfile::tempdir().unwrap();
        let mesh_dir = dir.path().join(POLY_MESH_DIR);
        fs::create_dir_all(&mesh_dir).unwrap();
        write_file(&mesh_dir, "points", "3\n(\n(0 0 0)\n(1 0 0)\n(1 1 0)\n)\n");
        write_file(&mesh_dir, "faces", "1\n(\n3(0 1 2)\n)\n");

        for (n_faces, start_face) in [("4611686018427387904", "0"), ("1", "18446744073709551615")] {
            write_file(
                &mesh_dir,
                "boundary",
                &format!(
                    "1\n(\nwalls\n{{\n    type wall;\n    nFaces {};\n    startFace {};\n}}\n)\n",
                    n_faces, start_face
                ),
            );
            assert!(matches!(
                load(dir.path(), false),
                Err(BlockFitError::Format { .. })
            ));
        }
    }

    #[test]
    fn test_load_rejects_out_of_range_point_index() {
        let dir = tempfile::tempdir().unwrap();
        let mesh_dir = dir.path().join(POLY_MESH_DIR);
        fs::create_dir_all(&mesh_dir).unwrap();
        write_file(&mesh_dir, "points", "2\n(\n(0 0 0)\n(1 0 0)\n)\n");
        write_file(&mesh_dir, "faces", "1\n(\n3(0 1 4611686018427387904)\n)\n");
        write_file(
            &mesh_dir,
            "boundary",
            "1\n(\nwalls\n{\n    type wall;\n    nFaces 1;\n    startFace 0;\n}\n)\n",
        );

        for internal_cells in [false, true] {
            match load(dir.path(), internal_cells) {
                Err(BlockFitError::Format { path, message, .. }) => {
                    assert!(path.ends_with("points"));
                    assert!(message.contains("4611686018427387904"));
                }
                other => panic!("expected format error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_load_missing_case_is_tool_failure() {
        let dir = tempfile::tempdir().unwrap();
        match load(dir.path(), false) {
            Err(BlockFitError::MissingOutput { path }) => assert!(path.ends_with("points")),
            other => panic!("expected missing output, got {:?}", other),
        }
    }

    #[test]
    fn test_load_case() {
        let dir = tempfile::tempdir().unwrap();
        let mesh_dir = dir.path().join(POLY_MESH_DIR);
        fs::create_dir_all(&mesh_dir).unwrap();
        write_file(
            &mesh_dir,
            "points",
            "5\n(\n(0 0 0)\n(1 0 0)\n(1 1 0)\n(0 1 0)\n(9 9 9)\n)\n",
        );
        write_file(&mesh_dir, "faces", "2\n(\n4(0 1 4 3)\n4(0 3 2 1)\n)\n");
        write_file(
            &mesh_dir,
            "boundary",
            "1\n(\nbottom\n{\n    type wall;\n    nFaces 1;\n    startFace 1;\n}\n)\n",
        );

        let mesh = load(dir.path(), false).unwrap();
        assert_eq!(mesh.faces, vec![vec![0, 3, 2, 1]]);
        assert_eq!(mesh.points.len(), 4);
        assert_eq!(mesh.points[3], Point3::new(0.0, 1.0, 0.0));
        assert!(mesh.validate().is_ok());

        let all = load(dir.path(), true).unwrap();
        assert_eq!(all.faces.len(), 2);
        assert_eq!(all.points.len(), 5);
    }
}
