//! The preview pipeline: write the dictionary, run the tool, read the mesh.
//!
//! # Example
//!
//! ```no_run
//! use blockfit::case::CaseLocation;
//! use blockfit::preview::{PreviewMesher, RunOptions};
//! use blockfit::runner::SearchPath;
//! use blockfit::spec::MeshSpec;
//!
//! let spec = MeshSpec::new();
//! let resolver = SearchPath::from_env();
//! let mut mesher = PreviewMesher::new(&resolver, &CaseLocation::Temporary).unwrap();
//! let mesh = mesher.generate(&spec, &RunOptions::default()).unwrap();
//! println!("{} boundary faces", mesh.num_faces());
//! ```

use tracing::info;

use crate::case::{CaseDir, CaseLocation};
use crate::error::Result;
use crate::io::{block_mesh_dict, poly_mesh};
use crate::mesh::PreviewMesh;
use crate::runner::{ExecutableResolver, MeshTool};
use crate::spec::MeshSpec;

/// Options of one preview run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Return every face of the mesh instead of only boundary faces.
    ///
    /// Faces are then returned exactly as read: their indices are not
    /// renumbered even though the point list is still reduced to referenced
    /// points.
    pub internal_cells: bool,
    /// Run the tool; when false, an existing mesh in the case is read.
    pub run_tool: bool,
    /// Keep a temporary case on disk after the mesher is dropped.
    pub keep_workspace: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            internal_cells: false,
            run_tool: true,
            keep_workspace: false,
        }
    }
}

impl RunOptions {
    /// Return every face instead of only boundary faces.
    pub fn with_internal_cells(mut self, internal_cells: bool) -> Self {
        self.internal_cells = internal_cells;
        self
    }

    /// Read the existing mesh instead of running the tool.
    pub fn reuse_existing_mesh(mut self) -> Self {
        self.run_tool = false;
        self
    }

    /// Keep a temporary case on disk.
    pub fn with_keep_workspace(mut self, keep: bool) -> Self {
        self.keep_workspace = keep;
        self
    }
}

/// Owns the case directory and the resolved tool for a preview run.
#[derive(Debug)]
pub struct PreviewMesher {
    tool: MeshTool,
    case: CaseDir,
    cell_count: Option<u64>,
}

impl PreviewMesher {
    /// Resolve the tool and prepare the case directory.
    ///
    /// The tool is resolved first: when it is missing this fails with
    /// [`crate::error::BlockFitError::ExecutableNotFound`] before anything is
    /// created on disk.
    pub fn new(resolver: &dyn ExecutableResolver, location: &CaseLocation) -> Result<Self> {
        let tool = MeshTool::locate(resolver)?;
        Self::with_tool(tool, location)
    }

    /// Prepare the case directory for an already resolved tool.
    pub fn with_tool(tool: MeshTool, location: &CaseLocation) -> Result<Self> {
        let case = CaseDir::create(location)?;
        Ok(Self {
            tool,
            case,
            cell_count: None,
        })
    }

    /// The case directory.
    pub fn case(&self) -> &CaseDir {
        &self.case
    }

    /// The resolved tool.
    pub fn tool(&self) -> &MeshTool {
        &self.tool
    }

    /// Cell count predicted by the last [`write_dict`](Self::write_dict).
    pub fn cell_count(&self) -> Option<u64> {
        self.cell_count
    }

    /// Write the dictionary for `spec` into the case.
    pub fn write_dict(&mut self, spec: &MeshSpec) -> Result<u64> {
        let cells = block_mesh_dict::save(spec, self.case.dict_path())?;
        info!(
            path = %self.case.dict_path().display(),
            cells,
            "wrote blockMeshDict"
        );
        self.cell_count = Some(cells);
        Ok(cells)
    }

    /// Run the tool and read back the preview mesh.
    pub fn run_mesh(&mut self, options: &RunOptions) -> Result<PreviewMesh> {
        if options.keep_workspace {
            self.case.persist();
        }
        if options.run_tool {
            self.tool.run(self.case.root())?;
        }

        let mut mesh = poly_mesh::load(self.case.root(), options.internal_cells)?;
        mesh.cell_count = self.cell_count;
        info!(
            points = mesh.num_points(),
            faces = mesh.num_faces(),
            "read preview mesh"
        );
        Ok(mesh)
    }

    /// Write, run and read in one go.
    pub fn generate(&mut self, spec: &MeshSpec, options: &RunOptions) -> Result<PreviewMesh> {
        self.write_dict(spec)?;
        self.run_mesh(options)
    }

    /// Give up the pipeline and take ownership of the case directory.
    pub fn into_case(self) -> CaseDir {
        self.case
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlockFitError;
    use crate::runner::{FixedExecutable, SearchPath, EXECUTABLE_NAMES};
    use std::fs;

    #[test]
    fn test_missing_executable_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("case");
        let location = CaseLocation::Persistent(target.join("system"));
        let resolver = SearchPath::from_path_var(EXECUTABLE_NAMES, None);

        let err = PreviewMesher::new(&resolver, &location).unwrap_err();
        assert!(matches!(err, BlockFitError::ExecutableNotFound { .. }));
        assert!(!target.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_fixed_executable() {
        let resolver = FixedExecutable::new("/nonexistent/blockMeshBodyFit");
        assert!(matches!(
            PreviewMesher::new(&resolver, &CaseLocation::Temporary),
            Err(BlockFitError::ExecutableNotFound { .. })
        ));
    }

    #[test]
    fn test_run_options_builders() {
        let options = RunOptions::default()
            .with_internal_cells(true)
            .reuse_existing_mesh()
            .with_keep_workspace(true);
        assert!(options.internal_cells);
        assert!(!options.run_tool);
        assert!(options.keep_workspace);
    }
}
