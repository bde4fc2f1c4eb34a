//! Case directory layout.
//!
//! The meshing tool works on an OpenFOAM-style case directory. A case is
//! either persistent, at a path chosen by the caller, or temporary, created
//! under the system temp directory and removed when the [`CaseDir`] is
//! dropped.
//!
//! | | Persistent | Temporary |
//! |---|---|---|
//! | dictionary | `system/blockMeshDict` | `constant/polyMesh/blockMeshDict` |
//! | extra directories | `constant/triSurface` | `constant/triSurface`, `0` |
//! | `system/controlDict` | written if absent | always written |

use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::Point3;
use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::{BlockFitError, Result};
use crate::io::foam;
use crate::io::poly_mesh::POLY_MESH_DIR;
use crate::io::stl;

/// Where a case directory lives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CaseLocation {
    /// A fresh directory under the system temp directory.
    #[default]
    Temporary,
    /// A caller-chosen directory. A path naming a file, or a path that does
    /// not exist yet, is taken to mean its parent directory.
    Persistent(PathBuf),
}

/// A case directory prepared for the meshing tool.
#[derive(Debug)]
pub struct CaseDir {
    root: PathBuf,
    dict_path: PathBuf,
    tri_surface: PathBuf,
    temp: Option<TempDir>,
}

fn control_dict() -> String {
    let mut text = foam::banner("dictionary", "controlDict");
    text.push_str("\n\ndeltaT          1;\n\nwriteInterval   1;\n\n");
    text.push_str("// ************************************************************************* //\n");
    text
}

impl CaseDir {
    /// Create the directory layout for `location`.
    pub fn create(location: &CaseLocation) -> Result<Self> {
        match location {
            CaseLocation::Temporary => Self::temporary(),
            CaseLocation::Persistent(path) => Self::persistent(path),
        }
    }

    /// Create a temporary case.
    pub fn temporary() -> Result<Self> {
        let temp = tempfile::Builder::new().prefix("blockfit-").tempdir()?;
        let root = temp.path().to_path_buf();

        let poly_mesh = root.join(POLY_MESH_DIR);
        let tri_surface = root.join("constant").join("triSurface");
        fs::create_dir_all(&poly_mesh)?;
        fs::create_dir_all(&tri_surface)?;
        fs::create_dir_all(root.join("system"))?;
        fs::create_dir_all(root.join("0"))?;
        fs::write(root.join("system").join("controlDict"), control_dict())?;

        info!(dir = %root.display(), "created temporary case");
        Ok(Self {
            dict_path: poly_mesh.join("blockMeshDict"),
            root,
            tri_surface,
            temp: Some(temp),
        })
    }

    /// Create (or reuse) a persistent case at `path`.
    pub fn persistent<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let root = if path.is_file() || !path.exists() {
            match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            }
        } else {
            path.to_path_buf()
        };

        let tri_surface = root.join("constant").join("triSurface");
        let system = root.join("system");
        fs::create_dir_all(&tri_surface)?;
        fs::create_dir_all(&system)?;
        let control = system.join("controlDict");
        if !control.exists() {
            fs::write(&control, control_dict())?;
        }

        info!(dir = %root.display(), "exporting to case directory");
        Ok(Self {
            dict_path: system.join("blockMeshDict"),
            root,
            tri_surface,
            temp: None,
        })
    }

    /// Root of the case.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the dictionary is written.
    pub fn dict_path(&self) -> &Path {
        &self.dict_path
    }

    /// Directory holding snap target surfaces.
    pub fn tri_surface_dir(&self) -> &Path {
        &self.tri_surface
    }

    /// Whether the case is removed on drop.
    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }

    /// Keep a temporary case on disk after drop. No effect on persistent cases.
    pub fn persist(&mut self) -> &Path {
        if let Some(temp) = self.temp.take() {
            let _ = temp.keep();
            info!(dir = %self.root.display(), "keeping temporary case");
        }
        &self.root
    }

    fn surface_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(BlockFitError::invalid_param(
                "surface",
                name,
                "must be a plain file name",
            ));
        }
        Ok(self.tri_surface.join(format!("{}.stl", name)))
    }

    /// Write snap target surface `name` from a triangle soup.
    pub fn write_surface(
        &self,
        name: &str,
        vertices: &[Point3<f64>],
        triangles: &[[usize; 3]],
    ) -> Result<PathBuf> {
        let path = self.surface_path(name)?;
        stl::save_surface(vertices, triangles, &path)?;
        debug!(surface = name, triangles = triangles.len(), "wrote snap surface");
        Ok(path)
    }

    /// Copy an existing STL file in as snap target surface `name`.
    pub fn copy_surface<P: AsRef<Path>>(&self, name: &str, source: P) -> Result<PathBuf> {
        let path = self.surface_path(name)?;
        fs::copy(source.as_ref(), &path)?;
        debug!(surface = name, from = %source.as_ref().display(), "copied snap surface");
        Ok(path)
    }
}
