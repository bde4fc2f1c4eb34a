//! # Blockfit
//!
//! Driver library for the `blockMeshBodyFit` hexahedral mesher.
//!
//! Blockfit turns a block description (vertices, hexahedral blocks, per-edge
//! cell gradings, boundary patches and snap projections) into a
//! `blockMeshDict`, runs the external mesher on a case directory and reads the
//! resulting `polyMesh` back as a lightweight surface mesh for previewing.
//!
//! ## Features
//!
//! - **Typed mesh specification**: blocks, gradings keyed by unordered edge,
//!   patches, projections and curved edges
//! - **Dictionary writer**: deterministic `blockMeshDict` output with a
//!   predicted cell count
//! - **polyMesh reader**: boundary face selection with dense point renumbering
//! - **Pluggable tool discovery** through [`runner::ExecutableResolver`]
//! - **Case layouts**: temporary (cleaned up on drop) or persistent
//! - **Exports**: PLY and OBJ previews, STL snap surfaces
//!
//! ## Quick Start
//!
//! ```no_run
//! use blockfit::prelude::*;
//! use nalgebra::Point3;
//!
//! let mut spec = MeshSpec::new().with_convert_to_meters(0.001);
//! for p in [
//!     [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0],
//!     [0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0],
//! ] {
//!     spec.add_vertex(Point3::from(p));
//! }
//! spec.add_block(Block::new([0, 1, 2, 3, 4, 5, 6, 7], "fluid"));
//! for (a, b) in HEX_EDGES {
//!     spec.set_grading(a, b, EdgeGrading::uniform(10));
//! }
//! spec.add_patch(BoundaryPatch::new("walls", PatchType::Wall, vec![[0, 3, 2, 1]]));
//!
//! let resolver = SearchPath::from_env();
//! let mut mesher = PreviewMesher::new(&resolver, &CaseLocation::Temporary).unwrap();
//! let mesh = mesher.generate(&spec, &RunOptions::default()).unwrap();
//! println!("{} boundary faces", mesh.num_faces());
//! ```
//!
//! ## Writing a Dictionary Only
//!
//! ```
//! use blockfit::prelude::*;
//! use nalgebra::Point3;
//!
//! let mut spec = MeshSpec::new();
//! for p in [
//!     [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0],
//!     [0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0],
//! ] {
//!     spec.add_vertex(Point3::from(p));
//! }
//! spec.add_block(Block::new([0, 1, 2, 3, 4, 5, 6, 7], "fluid"));
//! for (a, b) in HEX_EDGES {
//!     spec.set_grading(a, b, EdgeGrading::uniform(4));
//! }
//!
//! let mut text = Vec::new();
//! let cells = blockfit::io::block_mesh_dict::write(&spec, &mut text).unwrap();
//! assert_eq!(cells, 64);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod case;
pub mod config;
pub mod error;
pub mod io;
pub mod mesh;
pub mod preview;
pub mod runner;
pub mod spec;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use blockfit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::case::{CaseDir, CaseLocation};
    pub use crate::error::{BlockFitError, ErrorCategory, Result};
    pub use crate::mesh::PreviewMesh;
    pub use crate::preview::{PreviewMesher, RunOptions};
    pub use crate::runner::{ExecutableResolver, FixedExecutable, MeshTool, SearchPath};
    pub use crate::spec::{
        Block, BoundaryPatch, EdgeGrading, EdgeKey, MeshSpec, PatchType, HEX_EDGES,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
