//! End-to-end runs of the preview pipeline against a stand-in mesher.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use blockfit::case::CaseLocation;
use blockfit::error::{BlockFitError, ErrorCategory};
use blockfit::preview::{PreviewMesher, RunOptions};
use blockfit::runner::FixedExecutable;
use blockfit::spec::{Block, BoundaryPatch, EdgeGrading, MeshSpec, PatchType, HEX_EDGES};
use nalgebra::Point3;

/// Writes a unit cube polyMesh: one internal face touching the stray point 8,
/// then two patches covering the six cube faces.
const FAKE_MESHER: &str = r#"#!/bin/sh
[ "$1" = "-case" ] || exit 2
[ -f "$2/constant/polyMesh/blockMeshDict" ] || [ -f "$2/system/blockMeshDict" ] || exit 3
mesh="$2/constant/polyMesh"
mkdir -p "$mesh"
cat > "$mesh/points" <<'END'
9
(
(0 0 0)
(1 0 0)
(1 1 0)
(0 1 0)
(0 0 1)
(1 0 1)
(1 1 1)
(0 1 1)
(0.5 0.5 0.5)
)
END
cat > "$mesh/faces" <<'END'
7
(
4(0 1 8 3)
4(0 3 2 1)
4(4 5 6 7)
4(0 1 5 4)
4(1 2 6 5)
4(2 3 7 6)
4(3 0 4 7)
)
END
cat > "$mesh/boundary" <<'END'
2
(
bottom
{
    type            wall;
    inGroups        1(wall);
    nFaces          1;
    startFace       1;
}
sides
{
    type            patch;
    nFaces          5;
    startFace       2;
}
)
END
echo "End"
"#;

fn script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("blockMeshBodyFit");
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn unit_cube(cells: u32) -> MeshSpec {
    let mut spec = MeshSpec::new();
    for p in [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ] {
        spec.add_vertex(Point3::from(p));
    }
    spec.add_block(Block::new([0, 1, 2, 3, 4, 5, 6, 7], "cube"));
    for (a, b) in HEX_EDGES {
        spec.set_grading(a, b, EdgeGrading::uniform(cells));
    }
    spec.add_patch(BoundaryPatch::new("bottom", PatchType::Wall, vec![[0, 3, 2, 1]]));
    spec
}

#[test]
fn test_generate_boundary_mesh() {
    let tools = tempfile::tempdir().unwrap();
    let resolver = FixedExecutable::new(script(tools.path(), FAKE_MESHER));

    let mut mesher = PreviewMesher::new(&resolver, &CaseLocation::Temporary).unwrap();
    let root = mesher.case().root().to_path_buf();
    let mesh = mesher.generate(&unit_cube(2), &RunOptions::default()).unwrap();

    assert_eq!(mesh.cell_count, Some(8));
    assert_eq!(mesh.num_faces(), 6);
    assert_eq!(mesh.num_points(), 8);
    assert!(!mesh.points.contains(&Point3::new(0.5, 0.5, 0.5)));
    assert_eq!(mesh.faces[0], vec![0, 3, 2, 1]);
    assert!(mesh.validate().is_ok());

    let dict = fs::read_to_string(root.join("constant/polyMesh/blockMeshDict")).unwrap();
    assert!(dict.contains("hex (0 1 2 3 4 5 6 7) cube (2 2 2)"));

    drop(mesher);
    assert!(!root.exists());
}

#[test]
fn test_generate_with_internal_cells() {
    let tools = tempfile::tempdir().unwrap();
    let resolver = FixedExecutable::new(script(tools.path(), FAKE_MESHER));

    let mut mesher = PreviewMesher::new(&resolver, &CaseLocation::Temporary).unwrap();
    let options = RunOptions::default().with_internal_cells(true);
    let mesh = mesher.generate(&unit_cube(1), &options).unwrap();

    assert_eq!(mesh.num_faces(), 7);
    assert_eq!(mesh.num_points(), 9);
    assert_eq!(mesh.faces[0], vec![0, 1, 8, 3]);
}

#[test]
fn test_persistent_case_is_reused() {
    let tools = tempfile::tempdir().unwrap();
    let case_dir = tempfile::tempdir().unwrap();
    let location = CaseLocation::Persistent(case_dir.path().to_path_buf());

    let resolver = FixedExecutable::new(script(tools.path(), FAKE_MESHER));
    let mut mesher = PreviewMesher::new(&resolver, &location).unwrap();
    mesher.generate(&unit_cube(1), &RunOptions::default()).unwrap();
    drop(mesher);
    assert!(case_dir.path().join("system/blockMeshDict").is_file());
    assert!(case_dir.path().join("constant/polyMesh/faces").is_file());

    // A mesher that would fail is never started when the mesh is reused.
    let failing = FixedExecutable::new(script(tools.path(), "#!/bin/sh\nexit 1\n"));
    let mut mesher = PreviewMesher::new(&failing, &location).unwrap();
    let options = RunOptions::default().reuse_existing_mesh();
    let mesh = mesher.run_mesh(&options).unwrap();
    assert_eq!(mesh.num_faces(), 6);
    assert_eq!(mesh.cell_count, None);

    let case = mesher.into_case();
    assert!(!case.is_temporary());
    assert_eq!(case.root(), case_dir.path());
}

#[test]
fn test_keep_workspace() {
    let tools = tempfile::tempdir().unwrap();
    let resolver = FixedExecutable::new(script(tools.path(), FAKE_MESHER));

    let mut mesher = PreviewMesher::new(&resolver, &CaseLocation::Temporary).unwrap();
    let options = RunOptions::default().with_keep_workspace(true);
    mesher.generate(&unit_cube(1), &options).unwrap();
    let root = mesher.case().root().to_path_buf();
    drop(mesher);

    assert!(root.join("constant/polyMesh/points").is_file());
    fs::remove_dir_all(root).unwrap();
}

#[test]
fn test_failing_mesher() {
    let tools = tempfile::tempdir().unwrap();
    let body = "#!/bin/sh\necho 'Cannot find patch' >&2\nexit 1\n";
    let resolver = FixedExecutable::new(script(tools.path(), body));

    let mut mesher = PreviewMesher::new(&resolver, &CaseLocation::Temporary).unwrap();
    let err = mesher
        .generate(&unit_cube(1), &RunOptions::default())
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ExternalTool);
    match err {
        BlockFitError::ToolFailed { stderr, .. } => assert_eq!(stderr, "Cannot find patch"),
        other => panic!("expected tool failure, got {:?}", other),
    }
}

#[test]
fn test_mesher_without_output() {
    let tools = tempfile::tempdir().unwrap();
    let resolver = FixedExecutable::new(script(tools.path(), "#!/bin/sh\nexit 0\n"));

    let mut mesher = PreviewMesher::new(&resolver, &CaseLocation::Temporary).unwrap();
    let err = mesher
        .generate(&unit_cube(1), &RunOptions::default())
        .unwrap_err();
    assert!(matches!(err, BlockFitError::MissingOutput { .. }));
    assert_eq!(err.category(), ErrorCategory::ExternalTool);
}

#[test]
fn test_missing_grading_writes_nothing() {
    let tools = tempfile::tempdir().unwrap();
    let resolver = FixedExecutable::new(script(tools.path(), FAKE_MESHER));

    let mut spec = unit_cube(1);
    spec.edges.remove(&blockfit::spec::EdgeKey::new(4, 0));

    let mut mesher = PreviewMesher::new(&resolver, &CaseLocation::Temporary).unwrap();
    let err = mesher.generate(&spec, &RunOptions::default()).unwrap_err();
    assert!(matches!(err, BlockFitError::MissingEdgeGrading { .. }));
    assert_eq!(err.category(), ErrorCategory::Specification);
    assert!(!mesher.case().dict_path().exists());
}
